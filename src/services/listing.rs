//! Paginated post listings shared by the index, category and profile pages.

use crate::domain::post::PostCard;
use crate::models::config::ListingConfig;
use crate::pagination::{PageRequest, Paginated, Pagination, Paginator};
use crate::repository::{PostListQuery, PostReader};

use super::{ServiceError, ServiceResult};

/// Fetch one page of posts matching `query`.
///
/// The store filters and orders the whole collection for the viewer before
/// slicing it. A page outside the available range is replaced by the last page.
pub fn assemble_listing<R>(
    query: PostListQuery,
    page: PageRequest,
    config: &ListingConfig,
    repo: &R,
) -> ServiceResult<Paginated<PostCard>>
where
    R: PostReader,
{
    let per_page = config.posts_per_page.max(1);

    let fetch = |page: usize| {
        repo.list_posts(&query.clone().paginate(Pagination { page, per_page }))
            .map_err(|e| {
                log::error!("Failed to list posts: {e}");
                ServiceError::Internal
            })
    };

    // The requested number is only trusted once the total is known.
    let (total, items) = fetch(1)?;
    let paginator = Paginator::new(total, per_page);
    let resolved = paginator.resolve(page);

    if resolved == 1 {
        return Ok(Paginated::new(items, resolved, &paginator));
    }

    let (_total, items) = fetch(resolved)?;
    Ok(Paginated::new(items, resolved, &paginator))
}
