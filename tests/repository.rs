use blogicum::domain::category::NewCategory;
use blogicum::domain::comment::NewComment;
use blogicum::domain::location::NewLocation;
use blogicum::domain::post::{NewPost, UpdatePost};
use blogicum::domain::types::{
    CategoryId, CategorySlug, CategoryTitle, CommentText, Email, LocationName, PostId, PostText,
    PostTitle, UserId, Username,
};
use blogicum::domain::user::{NewUser, UpdateUser};
use blogicum::domain::visibility::PostVisibility;
use blogicum::pagination::Pagination;
use blogicum::repository::{
    CategoryReader, CategoryWriter, CommentReader, CommentWriter, DieselRepository,
    LocationReader, LocationWriter, PostListQuery, PostReader, PostWriter, RepositoryError,
    UserReader, UserWriter,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

mod common;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn create_user(repo: &DieselRepository, username: &str) -> UserId {
    repo.create_user(&NewUser {
        username: Username::new(username).expect("valid username"),
        password_hash: "hash".to_string(),
        date_joined: now() - Duration::days(30),
    })
    .expect("should create user")
}

fn create_category(repo: &DieselRepository, slug: &str, is_published: bool) -> CategoryId {
    repo.create_category(&NewCategory {
        title: CategoryTitle::new(format!("Category {slug}")).expect("valid title"),
        description: "Description".to_string(),
        slug: CategorySlug::new(slug).expect("valid slug"),
        is_published,
        created_at: now() - Duration::days(30),
    })
    .expect("should create category")
}

fn create_post(
    repo: &DieselRepository,
    author_id: UserId,
    category_id: CategoryId,
    pub_date: NaiveDateTime,
    is_published: bool,
) -> PostId {
    repo.create_post(&NewPost {
        title: PostTitle::new("Post").expect("valid title"),
        text: PostText::new("Body").expect("valid text"),
        pub_date,
        author_id,
        category_id,
        location_id: None,
        is_published,
        created_at: now() - Duration::days(10),
    })
    .expect("should create post")
}

fn create_comment(repo: &DieselRepository, post_id: PostId, author_id: UserId, minute: i64) {
    repo.create_comment(&NewComment {
        text: CommentText::new(format!("Comment {minute}")).expect("valid text"),
        post_id,
        author_id,
        created_at: now() - Duration::minutes(60 - minute),
    })
    .expect("should create comment");
}

fn ids(cards: &[blogicum::domain::post::PostCard]) -> Vec<i32> {
    cards.iter().map(|card| card.post.id.get()).collect()
}

/// Two authors, a public and a hidden category, and posts covering every
/// visibility rule. Returns `(author, reader, public_category, hidden_category)`.
fn seed_blog(repo: &DieselRepository) -> (UserId, UserId, CategoryId, CategoryId) {
    let author = create_user(repo, "author");
    let reader = create_user(repo, "reader");
    let public = create_category(repo, "travel", true);
    let hidden = create_category(repo, "drafts", false);

    // 1: visible to all, 2: unpublished, 3: scheduled, 4: hidden category,
    // 5: due exactly now, 6: reader's own public post.
    create_post(repo, author, public, now() - Duration::days(2), true);
    create_post(repo, author, public, now() - Duration::days(1), false);
    create_post(repo, author, public, now() + Duration::days(1), true);
    create_post(repo, author, hidden, now() - Duration::days(3), true);
    create_post(repo, author, public, now(), true);
    create_post(repo, reader, public, now() - Duration::days(4), true);

    (author, reader, public, hidden)
}

#[test]
fn anonymous_listing_shows_only_public_posts() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    seed_blog(&repo);

    let (total, cards) = repo
        .list_posts(&PostListQuery::new(PostVisibility::public(now())))
        .expect("should list posts");

    assert_eq!(total, 3);
    assert_eq!(ids(&cards), vec![5, 1, 6]);
}

#[test]
fn author_listing_includes_own_hidden_posts() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let (author, ..) = seed_blog(&repo);

    let visibility = PostVisibility {
        viewer: Some(author),
        now: now(),
    };
    let (total, cards) = repo
        .list_posts(&PostListQuery::new(visibility))
        .expect("should list posts");

    assert_eq!(total, 6);
    assert_eq!(ids(&cards), vec![3, 5, 2, 1, 4, 6]);
}

#[test]
fn sql_filter_agrees_with_visibility_predicate() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let (author, reader, ..) = seed_blog(&repo);

    for viewer in [None, Some(author), Some(reader)] {
        let visibility = PostVisibility {
            viewer,
            now: now(),
        };
        let (_, listed) = repo
            .list_posts(&PostListQuery::new(visibility))
            .expect("should list posts");

        let expected: Vec<i32> = (1..=6)
            .filter_map(|id| {
                repo.get_post_by_id(PostId::new(id).unwrap())
                    .expect("should load post")
            })
            .filter(|post| visibility.admits(post))
            .map(|post| post.id.get())
            .collect();

        let mut listed = ids(&listed);
        listed.sort();
        assert_eq!(listed, expected, "viewer {viewer:?}");
    }
}

#[test]
fn listing_filters_by_category_and_author() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let (author, reader, public, hidden) = seed_blog(&repo);

    let visibility = PostVisibility {
        viewer: Some(author),
        now: now(),
    };

    let (_, in_hidden) = repo
        .list_posts(&PostListQuery::new(visibility).category(hidden))
        .expect("should list posts");
    assert_eq!(ids(&in_hidden), vec![4]);

    let (_, by_reader) = repo
        .list_posts(&PostListQuery::new(visibility).category(public).author(reader))
        .expect("should list posts");
    assert_eq!(ids(&by_reader), vec![6]);
}

#[test]
fn pagination_reports_total_across_pages() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    seed_blog(&repo);

    let (total, cards) = repo
        .list_posts(
            &PostListQuery::new(PostVisibility::public(now())).paginate(Pagination {
                page: 2,
                per_page: 2,
            }),
        )
        .expect("should list posts");

    assert_eq!(total, 3);
    assert_eq!(ids(&cards), vec![6]);
}

#[test]
fn listing_counts_comments_per_post() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let (author, reader, ..) = seed_blog(&repo);

    let first = PostId::new(1).unwrap();
    create_comment(&repo, first, reader, 1);
    create_comment(&repo, first, author, 2);
    create_comment(&repo, PostId::new(6).unwrap(), author, 3);

    let (_, cards) = repo
        .list_posts(&PostListQuery::new(PostVisibility::public(now())))
        .expect("should list posts");
    let counts: Vec<(i32, usize)> = cards
        .iter()
        .map(|card| (card.post.id.get(), card.comment_count))
        .collect();

    assert_eq!(counts, vec![(5, 0), (1, 2), (6, 1)]);
}

#[test]
fn comments_are_listed_in_creation_order() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let (author, reader, ..) = seed_blog(&repo);

    let post_id = PostId::new(1).unwrap();
    create_comment(&repo, post_id, reader, 10);
    create_comment(&repo, post_id, author, 5);

    let comments = repo.list_comments(post_id).expect("should list comments");
    let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Comment 5", "Comment 10"]);
    assert_eq!(comments[0].author.username.as_str(), "author");
}

#[test]
fn get_comment_is_scoped_to_its_post() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let (_, reader, ..) = seed_blog(&repo);

    create_comment(&repo, PostId::new(1).unwrap(), reader, 1);
    let comment = repo
        .list_comments(PostId::new(1).unwrap())
        .expect("should list comments")
        .remove(0);

    assert!(
        repo.get_comment(PostId::new(1).unwrap(), comment.id)
            .expect("should query comment")
            .is_some()
    );
    assert!(
        repo.get_comment(PostId::new(5).unwrap(), comment.id)
            .expect("should query comment")
            .is_none()
    );
}

#[test]
fn update_and_delete_comment() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let (_, reader, ..) = seed_blog(&repo);

    let post_id = PostId::new(1).unwrap();
    create_comment(&repo, post_id, reader, 1);
    let comment = repo.list_comments(post_id).unwrap().remove(0);

    repo.update_comment(comment.id, &CommentText::new("Edited").unwrap())
        .expect("should update comment");
    let updated = repo.get_comment(post_id, comment.id).unwrap().unwrap();
    assert_eq!(updated.text.as_str(), "Edited");
    assert_eq!(updated.created_at, comment.created_at);

    assert_eq!(repo.delete_comment(comment.id).unwrap(), 1);
    assert!(repo.list_comments(post_id).unwrap().is_empty());
}

#[test]
fn delete_post_removes_its_comments() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let (author, reader, ..) = seed_blog(&repo);

    let post_id = PostId::new(1).unwrap();
    create_comment(&repo, post_id, reader, 1);
    create_comment(&repo, post_id, author, 2);

    assert_eq!(repo.delete_post(post_id).expect("should delete post"), 1);
    assert!(repo.get_post_by_id(post_id).unwrap().is_none());
    assert!(repo.list_comments(post_id).unwrap().is_empty());
}

#[test]
fn update_post_changes_content_but_not_author() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let (author, _, _, hidden) = seed_blog(&repo);

    let location_id = repo
        .create_location(&NewLocation {
            name: LocationName::new("Moscow").unwrap(),
            is_published: true,
            created_at: now(),
        })
        .expect("should create location");

    let post_id = PostId::new(1).unwrap();
    repo.update_post(
        post_id,
        &UpdatePost {
            title: PostTitle::new("Renamed").unwrap(),
            text: PostText::new("New body").unwrap(),
            pub_date: now() - Duration::hours(1),
            category_id: hidden,
            location_id: Some(location_id),
        },
    )
    .expect("should update post");

    let post = repo.get_post_by_id(post_id).unwrap().unwrap();
    assert_eq!(post.title.as_str(), "Renamed");
    assert_eq!(post.category.id, hidden);
    assert_eq!(post.location.map(|l| l.name.into_inner()), Some("Moscow".to_string()));
    assert_eq!(post.author.id, author);
}

#[test]
fn duplicate_username_is_a_conflict() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    create_user(&repo, "author");
    let reader = create_user(&repo, "reader");

    let result = repo.create_user(&NewUser {
        username: Username::new("author").unwrap(),
        password_hash: "hash".to_string(),
        date_joined: now(),
    });
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));

    let rename = repo.update_user(
        reader,
        &UpdateUser {
            username: Username::new("author").unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            email: Email::new("").unwrap(),
        },
    );
    assert!(matches!(rename, Err(RepositoryError::Conflict(_))));
}

#[test]
fn user_profile_round_trips_through_store() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let id = create_user(&repo, "author");

    repo.update_user(
        id,
        &UpdateUser {
            username: Username::new("writer").unwrap(),
            first_name: "Anna".to_string(),
            last_name: "Karenina".to_string(),
            email: Email::new("anna@example.com").unwrap(),
        },
    )
    .expect("should update user");

    assert!(
        repo.get_user_by_username(&Username::new("author").unwrap())
            .unwrap()
            .is_none()
    );
    let user = repo.get_user_by_id(id).unwrap().expect("user should exist");
    assert_eq!(user.username.as_str(), "writer");
    assert_eq!(user.display_name(), "Anna Karenina");
}

#[test]
fn published_only_choices_skip_hidden_entries() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    seed_blog(&repo);
    for (name, is_published) in [("Paris", true), ("Atlantis", false)] {
        repo.create_location(&NewLocation {
            name: LocationName::new(name).unwrap(),
            is_published,
            created_at: now(),
        })
        .expect("should create location");
    }

    let categories = repo.list_categories(true).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].slug.as_str(), "travel");
    assert_eq!(repo.list_categories(false).unwrap().len(), 2);

    let locations = repo.list_locations(true).unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].name.as_str(), "Paris");

    let category = repo
        .get_category_by_slug(&CategorySlug::new("drafts").unwrap())
        .unwrap()
        .expect("category should exist");
    assert!(!category.is_published);
}
