use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::post::{NewPost, Post, UpdatePost};
use crate::domain::types::{
    CategoryId, LocationId, PostText, PostTitle, TITLE_MAX_LENGTH, TypeConstraintError, UserId,
};

const TITLE_MAX: u64 = TITLE_MAX_LENGTH as u64;

/// Formats accepted for the publication date field, most specific first.
const PUB_DATE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

fn parse_pub_date(value: &str) -> Result<NaiveDateTime, PostFormError> {
    let value = value.trim();
    for format in PUB_DATE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| PostFormError::InvalidDate(value.to_string()))
}

fn parse_optional_id(value: &str) -> Result<Option<i32>, PostFormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| PostFormError::InvalidChoice(value.to_string()))
}

/// Post create/edit form. Select fields arrive as strings; an empty location
/// means "no location".
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, max = TITLE_MAX))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 1))]
    pub pub_date: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[serde(default)]
    pub location: String,
}

impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.to_string(),
            text: post.text.to_string(),
            pub_date: post.pub_date.format("%Y-%m-%dT%H:%M").to_string(),
            category: post.category.id.to_string(),
            location: post
                .location
                .as_ref()
                .map(|location| location.id.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostFormPayload {
    pub title: PostTitle,
    pub text: PostText,
    pub pub_date: NaiveDateTime,
    pub category_id: CategoryId,
    pub location_id: Option<LocationId>,
}

impl PostFormPayload {
    /// New posts are published unless an administrator hides them later.
    pub fn into_new_post(self, author_id: UserId, now: NaiveDateTime) -> NewPost {
        NewPost {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            author_id,
            category_id: self.category_id,
            location_id: self.location_id,
            is_published: true,
            created_at: now,
        }
    }

    pub fn into_update_post(self) -> UpdatePost {
        UpdatePost {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            category_id: self.category_id,
            location_id: self.location_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum PostFormError {
    #[error("Post form validation failed: {0}")]
    Validation(String),
    #[error("Post form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Enter a valid date: {0}")]
    InvalidDate(String),
    #[error("Select a valid choice: {0}")]
    InvalidChoice(String),
}

impl From<ValidationErrors> for PostFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<PostForm> for PostFormPayload {
    type Error = PostFormError;

    fn try_from(value: PostForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let category = parse_optional_id(&value.category)?
            .ok_or_else(|| PostFormError::InvalidChoice(value.category.clone()))?;
        let location_id = parse_optional_id(&value.location)?
            .map(LocationId::new)
            .transpose()?;

        Ok(Self {
            title: PostTitle::new(value.title)?,
            text: PostText::new(value.text)?,
            pub_date: parse_pub_date(&value.pub_date)?,
            category_id: CategoryId::new(category)?,
            location_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    fn form() -> PostForm {
        PostForm {
            title: " Trip ".to_string(),
            text: "Went to the mountains".to_string(),
            pub_date: "2024-05-01".to_string(),
            category: "2".to_string(),
            location: String::new(),
        }
    }

    #[test]
    fn date_only_means_midnight() {
        let payload: PostFormPayload = form().try_into().unwrap();
        assert_eq!(payload.title.as_str(), "Trip");
        assert_eq!(payload.pub_date.hour(), 0);
        assert_eq!(payload.category_id.get(), 2);
        assert_eq!(payload.location_id, None);
    }

    #[test]
    fn accepts_datetime_local_input() {
        let mut form = form();
        form.pub_date = "2024-05-01T18:30".to_string();
        form.location = "3".to_string();

        let payload: PostFormPayload = form.try_into().unwrap();
        assert_eq!(payload.pub_date.hour(), 18);
        assert_eq!(payload.location_id.map(LocationId::get), Some(3));
    }

    #[test]
    fn rejects_garbage_date() {
        let mut form = form();
        form.pub_date = "yesterday".to_string();

        let payload: Result<PostFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(PostFormError::InvalidDate(_))));
    }

    #[test]
    fn rejects_non_numeric_category() {
        let mut form = form();
        form.category = "travel".to_string();

        let payload: Result<PostFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(PostFormError::InvalidChoice(_))));
    }

    #[test]
    fn rejects_blank_text() {
        let mut form = form();
        form.text = "   ".to_string();

        let payload: Result<PostFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(PostFormError::TypeConstraint(_))));
    }

    #[test]
    fn new_posts_are_published() {
        let payload: PostFormPayload = form().try_into().unwrap();
        let now = payload.pub_date;
        let post = payload.into_new_post(UserId::new(1).unwrap(), now);
        assert!(post.is_published);
    }
}
