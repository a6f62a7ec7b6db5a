use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comment::{Comment as DomainComment, NewComment as DomainNewComment};
use crate::domain::types::{CommentText, TypeConstraintError};
use crate::models::user::User;

/// Diesel model representing the `comments` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::comments)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

/// A comment row joined with its author.
pub type CommentRow = (Comment, User);

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

impl TryFrom<CommentRow> for DomainComment {
    type Error = TypeConstraintError;

    fn try_from((comment, author): CommentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: comment.id.try_into()?,
            text: CommentText::new(comment.text)?,
            post_id: comment.post_id.try_into()?,
            author: author.try_into()?,
            created_at: comment.created_at,
        })
    }
}

impl From<DomainNewComment> for NewComment {
    fn from(comment: DomainNewComment) -> Self {
        Self {
            text: comment.text.into_inner(),
            post_id: comment.post_id.get(),
            author_id: comment.author_id.get(),
            created_at: comment.created_at,
        }
    }
}
