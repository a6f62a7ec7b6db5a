use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::location::{Location, NewLocation};
use crate::domain::post::{NewPost, Post, PostCard, UpdatePost};
use crate::domain::types::{
    CategoryId, CategorySlug, CommentId, CommentText, LocationId, PostId, UserId, Username,
};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::domain::visibility::PostVisibility;
use crate::pagination::Pagination;

pub mod category;
pub mod comment;
pub mod errors;
pub mod location;
pub mod post;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing posts.
///
/// The visibility scope is mandatory: every listing is filtered for the
/// viewer before it is paginated.
#[derive(Debug, Clone)]
pub struct PostListQuery {
    pub visibility: PostVisibility,
    /// Restrict to posts filed under a category.
    pub category_id: Option<CategoryId>,
    /// Restrict to posts written by a user.
    pub author_id: Option<UserId>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn new(visibility: PostVisibility) -> Self {
        Self {
            visibility,
            category_id: None,
            author_id: None,
            pagination: None,
        }
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// Read-only operations for user accounts.
pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    /// Persist a new user. Fails with [`RepositoryError::Conflict`] when the
    /// username is taken.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<UserId>;
    /// Update profile fields. Fails with [`RepositoryError::Conflict`] when
    /// the new username is taken.
    fn update_user(&self, id: UserId, user: &UpdateUser) -> RepositoryResult<usize>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>>;
    /// List categories ordered by title.
    fn list_categories(&self, published_only: bool) -> RepositoryResult<Vec<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<CategoryId>;
}

/// Read-only operations for location entities.
pub trait LocationReader {
    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>>;
    /// List locations ordered by name.
    fn list_locations(&self, published_only: bool) -> RepositoryResult<Vec<Location>>;
}

/// Write operations for location entities.
pub trait LocationWriter {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<LocationId>;
}

/// Read-only operations for posts.
pub trait PostReader {
    /// Posts matching the query, newest `pub_date` first, each annotated with
    /// its current comment count. Returns the total number of matching posts
    /// (ignoring pagination) alongside the requested window.
    fn list_posts(&self, query: &PostListQuery) -> RepositoryResult<(usize, Vec<PostCard>)>;
    /// Retrieve a post by id without applying any visibility rule.
    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>>;
}

/// Write operations for posts.
pub trait PostWriter {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<PostId>;
    fn update_post(&self, id: PostId, post: &UpdatePost) -> RepositoryResult<usize>;
    /// Delete a post together with its comments.
    fn delete_post(&self, id: PostId) -> RepositoryResult<usize>;
}

/// Read-only operations for comments.
pub trait CommentReader {
    /// Comments of a post in creation order.
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>>;
    /// Retrieve a comment only if it belongs to the given post.
    fn get_comment(&self, post_id: PostId, id: CommentId) -> RepositoryResult<Option<Comment>>;
}

/// Write operations for comments.
pub trait CommentWriter {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<CommentId>;
    fn update_comment(&self, id: CommentId, text: &CommentText) -> RepositoryResult<usize>;
    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize>;
}
