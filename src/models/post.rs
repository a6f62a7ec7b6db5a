use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{
    NewPost as DomainNewPost, Post as DomainPost, UpdatePost as DomainUpdatePost,
};
use crate::domain::types::{PostText, PostTitle, TypeConstraintError};
use crate::models::category::Category;
use crate::models::location::Location;
use crate::models::user::User;

/// Diesel model representing the `posts` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub author_id: i32,
    pub location_id: Option<i32>,
    pub category_id: i32,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// A post row joined with its author, category and optional location.
pub type PostRow = (Post, User, Category, Option<Location>);

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub author_id: i32,
    pub location_id: Option<i32>,
    pub category_id: i32,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Author-editable columns. `location_id` is always written so that clearing
/// the location persists as `NULL`.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::posts, treat_none_as_null = true)]
pub struct UpdatePost {
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub location_id: Option<i32>,
    pub category_id: i32,
}

impl TryFrom<PostRow> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from((post, author, category, location): PostRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: post.id.try_into()?,
            title: PostTitle::new(post.title)?,
            text: PostText::new(post.text)?,
            pub_date: post.pub_date,
            author: author.try_into()?,
            category: category.try_into()?,
            location: location.map(TryInto::try_into).transpose()?,
            is_published: post.is_published,
            created_at: post.created_at,
        })
    }
}

impl From<DomainNewPost> for NewPost {
    fn from(post: DomainNewPost) -> Self {
        Self {
            title: post.title.into_inner(),
            text: post.text.into_inner(),
            pub_date: post.pub_date,
            author_id: post.author_id.get(),
            location_id: post.location_id.map(|id| id.get()),
            category_id: post.category_id.get(),
            is_published: post.is_published,
            created_at: post.created_at,
        }
    }
}

impl From<DomainUpdatePost> for UpdatePost {
    fn from(post: DomainUpdatePost) -> Self {
        Self {
            title: post.title.into_inner(),
            text: post.text.into_inner(),
            pub_date: post.pub_date,
            location_id: post.location_id.map(|id| id.get()),
            category_id: post.category_id.get(),
        }
    }
}
