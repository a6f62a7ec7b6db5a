use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, UserId, Username};

/// Registered account. Acts both as a viewer identity and as an owner of posts
/// and comments.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password_hash: String,
    pub date_joined: NaiveDateTime,
}

impl User {
    /// Full name when provided, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.to_string()
        } else {
            full.to_string()
        }
    }
}

/// Data required to insert a new [`User`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
    pub date_joined: NaiveDateTime,
}

/// Editable profile fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateUser {
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
}

/// Owner reference carried by posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub username: Username,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
