//! Viewer identity and the ownership capability used by authorization checks.

use serde::{Deserialize, Serialize};

use crate::domain::types::{UserId, Username};

/// Identity stored in the session once a user has logged in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: Username,
}

/// Whoever issued the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Viewer {
    #[default]
    Anonymous,
    User(AuthenticatedUser),
}

impl Viewer {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user().map(|user| user.id)
    }

    /// Returns `true` when the viewer is the given user.
    pub fn is(&self, user_id: UserId) -> bool {
        self.user_id() == Some(user_id)
    }
}

impl From<AuthenticatedUser> for Viewer {
    fn from(user: AuthenticatedUser) -> Self {
        Self::User(user)
    }
}

impl From<Option<AuthenticatedUser>> for Viewer {
    fn from(user: Option<AuthenticatedUser>) -> Self {
        user.map_or(Self::Anonymous, Self::User)
    }
}

/// Entities that belong to a single user who alone may change them.
pub trait Authorizable {
    fn author_id(&self) -> UserId;

    fn is_authored_by(&self, viewer: &Viewer) -> bool {
        viewer.is(self.author_id())
    }
}
