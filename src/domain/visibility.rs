//! Rules deciding which posts a viewer may see.
//!
//! [`PostVisibility::admits`] is the single source of truth. Listings pass a
//! [`PostVisibility`] to the store, which translates the same rule into its
//! query language so that filtering happens before pagination; detail pages
//! evaluate [`PostVisibility::admits`] directly on the loaded post.

use chrono::NaiveDateTime;

use crate::domain::auth::{Authorizable, Viewer};
use crate::domain::post::Post;
use crate::domain::types::UserId;

/// Returns `true` when a post may be shown to the general audience.
///
/// A post is public only if it is published, its category is published and
/// its publication date is not in the future.
pub fn is_publicly_visible(
    is_published: bool,
    category_is_published: bool,
    pub_date: NaiveDateTime,
    now: NaiveDateTime,
) -> bool {
    is_published && category_is_published && pub_date <= now
}

/// Visibility scope of one request: who is looking, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostVisibility {
    /// Posts authored by this user are always visible.
    pub viewer: Option<UserId>,
    pub now: NaiveDateTime,
}

impl PostVisibility {
    pub fn new(viewer: &Viewer, now: NaiveDateTime) -> Self {
        Self {
            viewer: viewer.user_id(),
            now,
        }
    }

    /// Scope of a visitor who owns nothing.
    pub fn public(now: NaiveDateTime) -> Self {
        Self { viewer: None, now }
    }

    pub fn admits(&self, post: &Post) -> bool {
        if self.viewer == Some(post.author_id()) {
            return true;
        }
        is_publicly_visible(
            post.is_published,
            post.category.is_published,
            post.pub_date,
            self.now,
        )
    }

    /// Keeps only the admitted posts, preserving input order.
    pub fn filter<I>(&self, posts: I) -> Vec<Post>
    where
        I: IntoIterator<Item = Post>,
    {
        posts.into_iter().filter(|post| self.admits(post)).collect()
    }
}
