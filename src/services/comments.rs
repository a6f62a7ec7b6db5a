use chrono::Utc;

use crate::domain::auth::{AuthenticatedUser, Viewer};
use crate::domain::comment::Comment;
use crate::domain::types::{CommentId, PostId};
use crate::domain::user::Author;
use crate::forms::comments::CommentFormPayload;
use crate::repository::{CommentReader, CommentWriter, PostReader};
use crate::services::ownership::{Ownership, authorize_comment};

use super::{ServiceError, ServiceResult};

/// Add a comment to a post on behalf of `user`.
///
/// The post only has to exist; its visibility is not checked.
pub fn create_comment<R>(
    post_id: PostId,
    user: &AuthenticatedUser,
    payload: CommentFormPayload,
    repo: &R,
) -> ServiceResult<Comment>
where
    R: PostReader + CommentWriter,
{
    match repo.get_post_by_id(post_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let new_comment = payload.into_new_comment(post_id, user.id, Utc::now().naive_utc());
    let id = repo.create_comment(&new_comment).map_err(|e| {
        log::error!("Failed to create comment: {e}");
        ServiceError::Internal
    })?;

    Ok(Comment {
        id,
        text: new_comment.text,
        post_id,
        author: Author {
            id: user.id,
            username: user.username.clone(),
        },
        created_at: new_comment.created_at,
    })
}

/// Load a comment for its edit form; only the author gets it.
pub fn get_comment_for_edit<R>(
    post_id: PostId,
    comment_id: CommentId,
    viewer: &Viewer,
    repo: &R,
) -> ServiceResult<Ownership<Comment>>
where
    R: CommentReader,
{
    authorize_comment(post_id, comment_id, viewer, repo)
}

/// Replace the text of a comment. The ownership check runs before `payload`
/// is inspected.
pub fn update_comment<R>(
    post_id: PostId,
    comment_id: CommentId,
    payload: ServiceResult<CommentFormPayload>,
    viewer: &Viewer,
    repo: &R,
) -> ServiceResult<Ownership<Comment>>
where
    R: CommentReader + CommentWriter,
{
    authorize_comment(post_id, comment_id, viewer, repo)?.and_then(|mut comment| {
        let payload = payload?;
        repo.update_comment(comment.id, &payload.text).map_err(|e| {
            log::error!("Failed to update comment: {e}");
            ServiceError::Internal
        })?;
        comment.text = payload.text;
        Ok(comment)
    })
}

pub fn delete_comment<R>(
    post_id: PostId,
    comment_id: CommentId,
    viewer: &Viewer,
    repo: &R,
) -> ServiceResult<Ownership<()>>
where
    R: CommentReader + CommentWriter,
{
    authorize_comment(post_id, comment_id, viewer, repo)?.and_then(|comment| {
        repo.delete_comment(comment.id).map_err(|e| {
            log::error!("Failed to delete comment: {e}");
            ServiceError::Internal
        })?;
        Ok(())
    })
}
