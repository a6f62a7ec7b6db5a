//! Sample records shared by service unit tests.

use chrono::{Duration, NaiveDateTime, NaiveTime, Utc};

use crate::domain::auth::{AuthenticatedUser, Viewer};
use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::location::Location;
use crate::domain::post::Post;
use crate::domain::types::{
    CategoryId, CategorySlug, CategoryTitle, CommentId, CommentText, LocationId, LocationName,
    PostId, PostText, PostTitle, UserId, Username,
};
use crate::domain::user::{Author, User};
use crate::repository::test::TestRepository;

pub const AUTHOR: i32 = 1;
pub const READER: i32 = 2;
pub const PUBLIC_CATEGORY: i32 = 1;
pub const HIDDEN_CATEGORY: i32 = 2;

/// Start of the current day. Fixture dates are offsets from it so that records
/// built at different instants still compare deterministically.
pub fn today() -> NaiveDateTime {
    Utc::now().date_naive().and_time(NaiveTime::MIN)
}

pub fn sample_user(id: i32) -> User {
    User {
        id: UserId::new(id).unwrap(),
        username: Username::new(format!("user{id}")).unwrap(),
        first_name: String::new(),
        last_name: String::new(),
        email: Default::default(),
        password_hash: String::new(),
        date_joined: today() - Duration::days(30),
    }
}

pub fn authenticated(id: i32) -> AuthenticatedUser {
    let user = sample_user(id);
    AuthenticatedUser {
        id: user.id,
        username: user.username,
    }
}

pub fn viewer(id: i32) -> Viewer {
    Viewer::from(authenticated(id))
}

pub fn sample_category(id: i32, is_published: bool) -> Category {
    Category {
        id: CategoryId::new(id).unwrap(),
        title: CategoryTitle::new(format!("Category {id}")).unwrap(),
        description: String::new(),
        slug: CategorySlug::new(format!("category-{id}")).unwrap(),
        is_published,
        created_at: today() - Duration::days(30),
    }
}

pub fn sample_location(id: i32, is_published: bool) -> Location {
    Location {
        id: LocationId::new(id).unwrap(),
        name: LocationName::new(format!("Location {id}")).unwrap(),
        is_published,
        created_at: today() - Duration::days(30),
    }
}

/// Published post by `author` in the public category, dated `days_ago` days
/// in the past (negative values schedule it in the future).
pub fn sample_post(id: i32, author: i32, days_ago: i64) -> Post {
    Post {
        id: PostId::new(id).unwrap(),
        title: PostTitle::new(format!("Post {id}")).unwrap(),
        text: PostText::new("Text").unwrap(),
        pub_date: today() - Duration::days(days_ago),
        author: Author::from(&sample_user(author)),
        category: sample_category(PUBLIC_CATEGORY, true),
        location: None,
        is_published: true,
        created_at: today() - Duration::days(days_ago.max(0) + 1),
    }
}

pub fn sample_comment(id: i32, post_id: i32, author: i32) -> Comment {
    Comment {
        id: CommentId::new(id).unwrap(),
        text: CommentText::new(format!("Comment {id}")).unwrap(),
        post_id: PostId::new(post_id).unwrap(),
        author: Author::from(&sample_user(author)),
        created_at: today() - Duration::minutes(i64::from(100 - id)),
    }
}

/// Two users, a published and an unpublished category, no posts.
pub fn empty_blog() -> TestRepository {
    blog_with(vec![])
}

/// Two users, a published and an unpublished category, a published and an
/// unpublished location, and the given posts.
pub fn blog_with(posts: Vec<Post>) -> TestRepository {
    TestRepository::new(
        vec![sample_user(AUTHOR), sample_user(READER)],
        vec![
            sample_category(PUBLIC_CATEGORY, true),
            sample_category(HIDDEN_CATEGORY, false),
        ],
        posts,
    )
    .with_locations(vec![sample_location(1, true), sample_location(2, false)])
}
