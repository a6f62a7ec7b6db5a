//! Account registration and password login.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::NewUser;
use crate::forms::users::{LoginFormPayload, RegistrationFormPayload};
use crate::repository::{RepositoryError, UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Failed to hash password: {e}");
            ServiceError::Internal
        })
}

/// `false` for a wrong password and for a hash that cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash is malformed: {e}");
            false
        }
    }
}

pub fn register<R>(payload: RegistrationFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserWriter,
{
    let new_user = NewUser {
        username: payload.username,
        password_hash: hash_password(&payload.password)?,
        date_joined: Utc::now().naive_utc(),
    };

    match repo.create_user(&new_user) {
        Ok(id) => Ok(AuthenticatedUser {
            id,
            username: new_user.username,
        }),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict(
            "A user with that username already exists.".to_string(),
        )),
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Check credentials. Unknown users and wrong passwords are indistinguishable.
pub fn login<R>(payload: &LoginFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader,
{
    let user = match repo.get_user_by_username(&payload.username) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to get user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(AuthenticatedUser {
        id: user.id,
        username: user.username,
    })
}
