use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::auth::Authorizable;
use crate::domain::types::{CommentId, CommentText, PostId, UserId};
use crate::domain::user::Author;

/// Reader comment attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub text: CommentText,
    pub post_id: PostId,
    pub author: Author,
    pub created_at: NaiveDateTime,
}

impl Authorizable for Comment {
    fn author_id(&self) -> UserId {
        self.author.id
    }
}

/// Data required to insert a new [`Comment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub text: CommentText,
    pub post_id: PostId,
    pub author_id: UserId,
    pub created_at: NaiveDateTime,
}
