use chrono::Utc;

use crate::domain::auth::{AuthenticatedUser, Viewer};
use crate::domain::post::PostCard;
use crate::domain::types::Username;
use crate::domain::user::{UpdateUser, User};
use crate::domain::visibility::PostVisibility;
use crate::dto::profiles::ProfileDto;
use crate::models::config::ListingConfig;
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{PostListQuery, PostReader, RepositoryError, UserReader, UserWriter};
use crate::services::listing::assemble_listing;

use super::{ServiceError, ServiceResult};

fn find_user<R>(username: &Username, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    match repo.get_user_by_username(username) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Profile page: the user's details and their posts.
///
/// The owner sees all of their posts, everyone else only the public ones.
/// Both views share ordering, comment counts and pagination.
pub fn list_profile_posts<R>(
    username: &str,
    viewer: &Viewer,
    page: PageRequest,
    config: &ListingConfig,
    repo: &R,
) -> ServiceResult<(ProfileDto, Paginated<PostCard>)>
where
    R: UserReader + PostReader,
{
    let username = Username::new(username).map_err(|_| ServiceError::NotFound)?;
    let user = find_user(&username, repo)?;

    let visibility = PostVisibility::new(viewer, Utc::now().naive_utc());
    let query = PostListQuery::new(visibility).author(user.id);
    let posts = assemble_listing(query, page, config, repo)?;
    Ok((ProfileDto::from(user), posts))
}

/// Current account of the logged-in user.
pub fn get_own_profile<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    match repo.get_user_by_id(user.id) {
        Ok(Some(account)) => Ok(account),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Save profile changes. Returns the refreshed session identity, since the
/// username may have changed.
pub fn update_profile<R>(
    payload: UpdateUser,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + UserWriter,
{
    get_own_profile(user, repo)?;

    match repo.update_user(user.id, &payload) {
        Ok(_) => Ok(AuthenticatedUser {
            id: user.id,
            username: payload.username,
        }),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict(
            "A user with that username already exists.".to_string(),
        )),
        Err(e) => {
            log::error!("Failed to update user: {e}");
            Err(ServiceError::Internal)
        }
    }
}
