use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::comment::NewComment;
use crate::domain::types::{CommentText, PostId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1))]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentFormPayload {
    pub text: CommentText,
}

impl CommentFormPayload {
    pub fn into_new_comment(
        self,
        post_id: PostId,
        author_id: UserId,
        now: NaiveDateTime,
    ) -> NewComment {
        NewComment {
            text: self.text,
            post_id,
            author_id,
            created_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum CommentFormError {
    #[error("Comment form validation failed: {0}")]
    Validation(String),
    #[error("Comment form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CommentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CommentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CommentForm> for CommentFormPayload {
    type Error = CommentFormError;

    fn try_from(value: CommentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            text: CommentText::new(value.text)?,
        })
    }
}
