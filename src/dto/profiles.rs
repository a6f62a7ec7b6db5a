use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::user::User;

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDto {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub display_name: String,
    pub date_joined: NaiveDateTime,
}

impl From<User> for ProfileDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            display_name: value.display_name(),
            username: value.username.into_inner(),
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email.into_inner(),
            date_joined: value.date_joined,
        }
    }
}
