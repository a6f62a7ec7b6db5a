//! Request extractors for the current viewer.
//!
//! The session identity holds the JSON-serialized [`AuthenticatedUser`].
//! [`Viewer`] never fails to extract; [`AuthenticatedUser`] redirects
//! anonymous requests to the login page.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, dev::Payload};
use thiserror::Error;

use crate::domain::auth::{AuthenticatedUser, Viewer};

pub const LOGIN_URL: &str = "/auth/login/";

/// Raised when a login-only page is requested anonymously.
#[derive(Debug, Error)]
#[error("login required")]
pub struct LoginRequired {
    /// Path and query string to return to after logging in.
    pub next: String,
}

impl LoginRequired {
    /// Login page URL carrying `next` as an encoded query parameter.
    pub fn login_url(&self) -> String {
        match serde_urlencoded::to_string([("next", self.next.as_str())]) {
            Ok(query) => format!("{LOGIN_URL}?{query}"),
            Err(e) => {
                log::warn!("Failed to encode login redirect: {e}");
                LOGIN_URL.to_string()
            }
        }
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, self.login_url()))
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to serialize identity: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to attach identity: {0}")]
    Login(String),
}

fn current_user(req: &HttpRequest) -> Option<AuthenticatedUser> {
    let identity = req.get_identity().ok()?;
    let id = identity.id().ok()?;
    match serde_json::from_str(&id) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Discarding malformed session identity: {e}");
            None
        }
    }
}

/// Attach `user` to the session of `req`, replacing any previous identity.
pub fn remember(req: &HttpRequest, user: &AuthenticatedUser) -> Result<(), IdentityError> {
    let id = serde_json::to_string(user)?;
    Identity::login(&req.extensions(), id).map_err(|e| IdentityError::Login(e.to_string()))?;
    Ok(())
}

/// Drop the identity from the session of `req`, if any.
pub fn forget(req: &HttpRequest) {
    if let Ok(identity) = req.get_identity() {
        identity.logout();
    }
}

impl FromRequest for Viewer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Viewer::from(current_user(req))))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(current_user(req).ok_or_else(|| LoginRequired {
            next: req
                .uri()
                .path_and_query()
                .map_or_else(|| req.path().to_string(), |pq| pq.as_str().to_string()),
        }))
    }
}
