//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and slugs are enforced at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::ValidateEmail;

/// Maximum length accepted for usernames.
pub const USERNAME_MAX_LENGTH: usize = 150;
/// Maximum length accepted for post titles, category titles and location names.
pub const TITLE_MAX_LENGTH: usize = 256;
/// Maximum length accepted for category slugs.
pub const SLUG_MAX_LENGTH: usize = 64;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A string exceeded its maximum length.
    #[error("{0} must be at most {1} characters long")]
    TooLong(&'static str, usize),
    /// A slug contained characters other than latin letters, digits, `-` or `_`.
    #[error("{0} may only contain latin letters, digits, hyphens and underscores")]
    InvalidSlug(&'static str),
    /// A username contained characters outside the allowed set.
    #[error("username may only contain letters, digits and @/./+/-/_")]
    InvalidUsername,
    /// Email validation failed.
    #[error("{0} must be a valid email address")]
    InvalidEmail(&'static str),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

fn require_max_length(
    value: String,
    field: &'static str,
    max: usize,
) -> Result<String, TypeConstraintError> {
    if value.chars().count() > max {
        Err(TypeConstraintError::TooLong(field, max))
    } else {
        Ok(value)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

/// Shared accessors and conversions for string-backed newtypes.
macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        non_empty_string_newtype!($name, $doc, $field, usize::MAX);
    };
    ($name:ident, $doc:expr, $field:expr, $max:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                Ok(Self(require_max_length(trimmed, $field, $max)?))
            }
        }

        string_newtype_impls!($name);
    };
}

id_newtype!(UserId, "Unique identifier for a user.", "user_id");
id_newtype!(PostId, "Unique identifier for a post.", "post_id");
id_newtype!(
    CommentId,
    "Unique identifier for a comment.",
    "comment_id"
);
id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(
    LocationId,
    "Unique identifier for a location.",
    "location_id"
);

non_empty_string_newtype!(
    PostTitle,
    "Post headline enforcing non-empty values.",
    "title",
    TITLE_MAX_LENGTH
);
non_empty_string_newtype!(PostText, "Post body enforcing non-empty values.", "text");
non_empty_string_newtype!(
    CommentText,
    "Comment body enforcing non-empty values.",
    "comment"
);
non_empty_string_newtype!(
    CategoryTitle,
    "Category display title enforcing non-empty values.",
    "category title",
    TITLE_MAX_LENGTH
);
non_empty_string_newtype!(
    LocationName,
    "Location name enforcing non-empty values.",
    "location name",
    TITLE_MAX_LENGTH
);

/// URL-safe category identifier made of latin letters, digits, `-` and `_`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CategorySlug(String);

impl CategorySlug {
    /// Constructs a slug, rejecting characters that cannot appear in a URL path segment.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "slug")?;
        let trimmed = require_max_length(trimmed, "slug", SLUG_MAX_LENGTH)?;
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TypeConstraintError::InvalidSlug("slug"));
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(CategorySlug);

/// Login name of a user.
///
/// Mirrors the usual web-framework rule: letters, digits and `@.+-_`, up to
/// [`USERNAME_MAX_LENGTH`] characters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "username")?;
        let trimmed = require_max_length(trimmed, "username", USERNAME_MAX_LENGTH)?;
        if !trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(TypeConstraintError::InvalidUsername);
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(Username);

/// Optional contact email. An empty string is a valid "not provided" value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_lowercase();
        if !trimmed.is_empty() && !trimmed.as_str().validate_email() {
            return Err(TypeConstraintError::InvalidEmail("email"));
        }
        Ok(Self(trimmed))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

string_newtype_impls!(Email);
