//! Author-only access to posts and comments.
//!
//! Every mutation of a post or comment resolves the target first (missing
//! targets are [`ServiceError::NotFound`]) and then asks [`authorize`] whether
//! the viewer wrote it. A refusal is not an error: it carries the page the
//! viewer is sent back to.

use serde::Serialize;

use crate::domain::auth::{Authorizable, Viewer};
use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::types::{CommentId, PostId};
use crate::repository::{CommentReader, PostReader};

use super::{ServiceError, ServiceResult};

/// Page a refused viewer is redirected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RedirectTarget {
    PostDetail(PostId),
}

impl RedirectTarget {
    pub fn url(&self) -> String {
        match self {
            Self::PostDetail(post_id) => format!("/posts/{post_id}/"),
        }
    }
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, PartialEq)]
pub enum Ownership<T> {
    /// The viewer wrote the entity; carries the resolved value.
    Authorized(T),
    /// Someone else wrote it, or the viewer is anonymous.
    Unauthorized { redirect_to: RedirectTarget },
}

impl<T> Ownership<T> {
    pub fn map<U, F>(self, f: F) -> Ownership<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Authorized(value) => Ownership::Authorized(f(value)),
            Self::Unauthorized { redirect_to } => Ownership::Unauthorized { redirect_to },
        }
    }

    /// Run a fallible step only when authorized.
    pub fn and_then<U, F>(self, f: F) -> ServiceResult<Ownership<U>>
    where
        F: FnOnce(T) -> ServiceResult<U>,
    {
        match self {
            Self::Authorized(value) => Ok(Ownership::Authorized(f(value)?)),
            Self::Unauthorized { redirect_to } => Ok(Ownership::Unauthorized { redirect_to }),
        }
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }
}

/// Decide whether `viewer` may change `entity`.
///
/// `None` means the lookup found nothing and yields
/// [`ServiceError::NotFound`].
pub fn authorize<T>(
    entity: Option<T>,
    viewer: &Viewer,
    fallback: RedirectTarget,
) -> ServiceResult<Ownership<T>>
where
    T: Authorizable,
{
    let entity = entity.ok_or(ServiceError::NotFound)?;
    if entity.is_authored_by(viewer) {
        Ok(Ownership::Authorized(entity))
    } else {
        Ok(Ownership::Unauthorized {
            redirect_to: fallback,
        })
    }
}

/// Entity an ownership check is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedEntity {
    Post(PostId),
    /// A comment is only found under the post it belongs to.
    Comment {
        post_id: PostId,
        comment_id: CommentId,
    },
}

/// Resolve a post and check that `viewer` wrote it.
pub fn authorize_post<R>(post_id: PostId, viewer: &Viewer, repo: &R) -> ServiceResult<Ownership<Post>>
where
    R: PostReader,
{
    let post = repo.get_post_by_id(post_id).map_err(|e| {
        log::error!("Failed to get post: {e}");
        ServiceError::Internal
    })?;
    authorize(post, viewer, RedirectTarget::PostDetail(post_id))
}

/// Resolve a comment by `(post_id, comment_id)` and check that `viewer` wrote it.
pub fn authorize_comment<R>(
    post_id: PostId,
    comment_id: CommentId,
    viewer: &Viewer,
    repo: &R,
) -> ServiceResult<Ownership<Comment>>
where
    R: CommentReader,
{
    let comment = repo.get_comment(post_id, comment_id).map_err(|e| {
        log::error!("Failed to get comment: {e}");
        ServiceError::Internal
    })?;
    authorize(comment, viewer, RedirectTarget::PostDetail(post_id))
}

/// Report whether `viewer` may change `entity` without touching it.
pub fn check_ownership<R>(
    entity: OwnedEntity,
    viewer: &Viewer,
    repo: &R,
) -> ServiceResult<Ownership<()>>
where
    R: PostReader + CommentReader,
{
    match entity {
        OwnedEntity::Post(post_id) => Ok(authorize_post(post_id, viewer, repo)?.map(|_| ())),
        OwnedEntity::Comment {
            post_id,
            comment_id,
        } => Ok(authorize_comment(post_id, comment_id, viewer, repo)?.map(|_| ())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{AUTHOR, READER, blog_with, sample_comment, sample_post, viewer};

    fn post_id(id: i32) -> PostId {
        PostId::new(id).unwrap()
    }

    fn comment_id(id: i32) -> CommentId {
        CommentId::new(id).unwrap()
    }

    #[test]
    fn author_is_authorized_for_post() {
        let repo = blog_with(vec![sample_post(1, AUTHOR, 1)]);
        let outcome = check_ownership(OwnedEntity::Post(post_id(1)), &viewer(AUTHOR), &repo);
        assert_eq!(outcome, Ok(Ownership::Authorized(())));
    }

    #[test]
    fn other_user_is_sent_to_post_detail() {
        let repo = blog_with(vec![sample_post(1, AUTHOR, 1)]);
        let outcome = check_ownership(OwnedEntity::Post(post_id(1)), &viewer(READER), &repo);
        assert_eq!(
            outcome,
            Ok(Ownership::Unauthorized {
                redirect_to: RedirectTarget::PostDetail(post_id(1))
            })
        );
    }

    #[test]
    fn anonymous_viewer_is_unauthorized() {
        let repo = blog_with(vec![sample_post(1, AUTHOR, 1)]);
        let outcome = check_ownership(OwnedEntity::Post(post_id(1)), &Viewer::Anonymous, &repo)
            .unwrap();
        assert!(!outcome.is_authorized());
    }

    #[test]
    fn missing_post_is_not_found() {
        let repo = blog_with(vec![]);
        let outcome = check_ownership(OwnedEntity::Post(post_id(9)), &viewer(AUTHOR), &repo);
        assert_eq!(outcome, Err(ServiceError::NotFound));
    }

    #[test]
    fn comment_under_other_post_is_not_found() {
        let repo = blog_with(vec![sample_post(1, AUTHOR, 1), sample_post(2, AUTHOR, 1)])
            .with_comments(vec![sample_comment(1, 1, READER)]);

        let wrong_post = OwnedEntity::Comment {
            post_id: post_id(2),
            comment_id: comment_id(1),
        };
        assert_eq!(
            check_ownership(wrong_post, &viewer(READER), &repo),
            Err(ServiceError::NotFound)
        );

        let right_post = OwnedEntity::Comment {
            post_id: post_id(1),
            comment_id: comment_id(1),
        };
        assert_eq!(
            check_ownership(right_post, &viewer(READER), &repo),
            Ok(Ownership::Authorized(()))
        );
    }

    #[test]
    fn post_author_does_not_own_readers_comment() {
        let repo = blog_with(vec![sample_post(1, AUTHOR, 1)])
            .with_comments(vec![sample_comment(1, 1, READER)]);
        let entity = OwnedEntity::Comment {
            post_id: post_id(1),
            comment_id: comment_id(1),
        };
        assert_eq!(
            check_ownership(entity, &viewer(AUTHOR), &repo),
            Ok(Ownership::Unauthorized {
                redirect_to: RedirectTarget::PostDetail(post_id(1))
            })
        );
    }
}
