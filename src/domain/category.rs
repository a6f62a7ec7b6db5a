use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategorySlug, CategoryTitle};

/// Thematic section posts are published under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub title: CategoryTitle,
    pub description: String,
    pub slug: CategorySlug,
    /// Unpublished categories hide every post filed under them from non-authors.
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub title: CategoryTitle,
    pub description: String,
    pub slug: CategorySlug,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}
