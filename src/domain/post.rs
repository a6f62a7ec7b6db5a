use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::auth::Authorizable;
use crate::domain::category::Category;
use crate::domain::location::Location;
use crate::domain::types::{CategoryId, LocationId, PostId, PostText, PostTitle, UserId};
use crate::domain::user::Author;

/// Blog post together with the records it references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub text: PostText,
    /// Moment the post becomes visible to the general audience.
    pub pub_date: NaiveDateTime,
    pub author: Author,
    pub category: Category,
    pub location: Option<Location>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

impl Post {
    /// Listing order: newest `pub_date` first, ties in insertion order.
    pub fn listing_cmp(&self, other: &Self) -> Ordering {
        other
            .pub_date
            .cmp(&self.pub_date)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl Authorizable for Post {
    fn author_id(&self) -> UserId {
        self.author.id
    }
}

/// A post annotated with the number of comments it had when the listing was
/// assembled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostCard {
    #[serde(flatten)]
    pub post: Post,
    pub comment_count: usize,
}

/// Data required to insert a new [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    pub title: PostTitle,
    pub text: PostText,
    pub pub_date: NaiveDateTime,
    pub author_id: UserId,
    pub category_id: CategoryId,
    pub location_id: Option<LocationId>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Author-editable fields of a [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdatePost {
    pub title: PostTitle,
    pub text: PostText,
    pub pub_date: NaiveDateTime,
    pub category_id: CategoryId,
    pub location_id: Option<LocationId>,
}
