use chrono::Utc;
use serde::Serialize;

use crate::domain::auth::{AuthenticatedUser, Authorizable, Viewer};
use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::location::Location;
use crate::domain::post::{Post, PostCard};
use crate::domain::types::{CategorySlug, PostId};
use crate::domain::visibility::PostVisibility;
use crate::forms::posts::PostFormPayload;
use crate::models::config::ListingConfig;
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{
    CategoryReader, CommentReader, LocationReader, PostListQuery, PostReader, PostWriter,
};
use crate::services::listing::assemble_listing;
use crate::services::ownership::{Ownership, authorize_post};

use super::{ServiceError, ServiceResult};

/// Everything the post detail page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub post: Post,
    /// Comments in creation order.
    pub comments: Vec<Comment>,
    /// Whether the viewer wrote the post.
    pub is_author: bool,
}

/// Published categories and locations offered by the post form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostFormChoices {
    pub categories: Vec<Category>,
    pub locations: Vec<Location>,
}

/// Index page: every post the viewer may see, newest first.
pub fn list_visible_posts<R>(
    viewer: &Viewer,
    page: PageRequest,
    config: &ListingConfig,
    repo: &R,
) -> ServiceResult<Paginated<PostCard>>
where
    R: PostReader,
{
    let visibility = PostVisibility::new(viewer, Utc::now().naive_utc());
    assemble_listing(PostListQuery::new(visibility), page, config, repo)
}

/// Load a post for the detail page.
///
/// Posts the viewer may not see are reported as [`ServiceError::NotFound`],
/// exactly like posts that do not exist.
pub fn get_post_or_deny<R>(post_id: PostId, viewer: &Viewer, repo: &R) -> ServiceResult<PostDetail>
where
    R: PostReader + CommentReader,
{
    let post = match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !PostVisibility::new(viewer, Utc::now().naive_utc()).admits(&post) {
        return Err(ServiceError::NotFound);
    }

    let comments = repo.list_comments(post.id).map_err(|e| {
        log::error!("Failed to list comments: {e}");
        ServiceError::Internal
    })?;

    Ok(PostDetail {
        is_author: post.is_authored_by(viewer),
        post,
        comments,
    })
}

/// Category page. Unknown and unpublished categories are not found.
pub fn list_category_posts<R>(
    slug: &str,
    viewer: &Viewer,
    page: PageRequest,
    config: &ListingConfig,
    repo: &R,
) -> ServiceResult<(Category, Paginated<PostCard>)>
where
    R: CategoryReader + PostReader,
{
    let slug = CategorySlug::new(slug).map_err(|_| ServiceError::NotFound)?;

    let category = match repo.get_category_by_slug(&slug) {
        Ok(Some(category)) if category.is_published => category,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let visibility = PostVisibility::new(viewer, Utc::now().naive_utc());
    let query = PostListQuery::new(visibility).category(category.id);
    let posts = assemble_listing(query, page, config, repo)?;
    Ok((category, posts))
}

pub fn post_form_choices<R>(repo: &R) -> ServiceResult<PostFormChoices>
where
    R: CategoryReader + LocationReader,
{
    let categories = repo.list_categories(true).map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;
    let locations = repo.list_locations(true).map_err(|e| {
        log::error!("Failed to list locations: {e}");
        ServiceError::Internal
    })?;
    Ok(PostFormChoices {
        categories,
        locations,
    })
}

/// Reject category or location ids that the form does not offer.
fn ensure_valid_choices<R>(payload: &PostFormPayload, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + LocationReader,
{
    let choices = post_form_choices(repo)?;
    if !choices
        .categories
        .iter()
        .any(|category| category.id == payload.category_id)
    {
        return Err(ServiceError::Form("Select a valid category.".to_string()));
    }
    let location_offered = payload.location_id.is_none_or(|location_id| {
        choices
            .locations
            .iter()
            .any(|location| location.id == location_id)
    });
    if !location_offered {
        return Err(ServiceError::Form("Select a valid location.".to_string()));
    }
    Ok(())
}

pub fn create_post<R>(
    payload: PostFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PostId>
where
    R: CategoryReader + LocationReader + PostWriter,
{
    ensure_valid_choices(&payload, repo)?;

    let post = payload.into_new_post(user.id, Utc::now().naive_utc());
    repo.create_post(&post).map_err(|e| {
        log::error!("Failed to create post: {e}");
        ServiceError::Internal
    })
}

/// Load a post for its edit form; only the author gets it.
pub fn get_post_for_edit<R>(
    post_id: PostId,
    viewer: &Viewer,
    repo: &R,
) -> ServiceResult<Ownership<Post>>
where
    R: PostReader,
{
    authorize_post(post_id, viewer, repo)
}

/// Apply an edit submitted by `viewer`.
///
/// Ownership is decided before the submitted form is looked at: a missing
/// post is `NotFound` and a non-owner is redirected even when `payload`
/// failed validation.
pub fn update_post<R>(
    post_id: PostId,
    payload: ServiceResult<PostFormPayload>,
    viewer: &Viewer,
    repo: &R,
) -> ServiceResult<Ownership<PostId>>
where
    R: CategoryReader + LocationReader + PostReader + PostWriter,
{
    authorize_post(post_id, viewer, repo)?.and_then(|post| {
        let payload = payload?;
        ensure_valid_choices(&payload, repo)?;
        repo.update_post(post.id, &payload.into_update_post())
            .map_err(|e| {
                log::error!("Failed to update post: {e}");
                ServiceError::Internal
            })?;
        Ok(post.id)
    })
}

/// Delete a post and its comments.
pub fn delete_post<R>(post_id: PostId, viewer: &Viewer, repo: &R) -> ServiceResult<Ownership<()>>
where
    R: PostReader + PostWriter,
{
    authorize_post(post_id, viewer, repo)?.and_then(|post| {
        repo.delete_post(post.id).map_err(|e| {
            log::error!("Failed to delete post: {e}");
            ServiceError::Internal
        })?;
        Ok(())
    })
}
