use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{Email, TypeConstraintError, Username};
use crate::domain::user::{
    Author, NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub date_joined: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub date_joined: NaiveDateTime,
}

/// Profile fields a user may change.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            username: Username::new(user.username)?,
            first_name: user.first_name,
            last_name: user.last_name,
            email: Email::new(user.email)?,
            password_hash: user.password_hash,
            date_joined: user.date_joined,
        })
    }
}

impl TryFrom<User> for Author {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            username: Username::new(user.username)?,
        })
    }
}

impl From<DomainNewUser> for NewUser {
    fn from(user: DomainNewUser) -> Self {
        Self {
            username: user.username.into_inner(),
            password_hash: user.password_hash,
            date_joined: user.date_joined,
        }
    }
}

impl From<DomainUpdateUser> for UpdateUser {
    fn from(user: DomainUpdateUser) -> Self {
        Self {
            username: user.username.into_inner(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email.into_inner(),
        }
    }
}
