use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;

use crate::domain::post::{NewPost, Post, PostCard, UpdatePost};
use crate::domain::types::PostId;
use crate::models::post::{NewPost as DbNewPost, PostRow, UpdatePost as DbUpdatePost};
use crate::repository::{
    DieselRepository, PostListQuery, PostReader, PostWriter, RepositoryResult,
};

impl PostReader for DieselRepository {
    fn list_posts(&self, query: &PostListQuery) -> RepositoryResult<(usize, Vec<PostCard>)> {
        use crate::schema::{categories, comments, locations, posts, users};

        let mut conn = self.conn()?;

        // Mirrors `PostVisibility::admits`: the viewer's own posts, plus posts
        // that are published, in a published category and already due.
        let query_builder = || {
            let mut items = posts::table
                .inner_join(users::table)
                .inner_join(categories::table)
                .left_join(locations::table)
                .into_boxed::<diesel::sqlite::Sqlite>();

            let visibility = query.visibility;
            let public = posts::is_published
                .eq(true)
                .and(categories::is_published.eq(true))
                .and(posts::pub_date.le(visibility.now));
            items = match visibility.viewer {
                Some(viewer) => items.filter(posts::author_id.eq(viewer.get()).or(public)),
                None => items.filter(public),
            };

            if let Some(category_id) = query.category_id {
                items = items.filter(posts::category_id.eq(category_id.get()));
            }

            if let Some(author_id) = query.author_id {
                items = items.filter(posts::author_id.eq(author_id.get()));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().select((
            posts::all_columns,
            users::all_columns,
            categories::all_columns,
            locations::all_columns.nullable(),
        ));
        if let Some(pagination) = &query.pagination {
            let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);
            let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .order((posts::pub_date.desc(), posts::id.asc()))
            .load::<PostRow>(&mut conn)?;

        // Counted per request so listings always reflect the current comments.
        let ids: Vec<i32> = rows.iter().map(|(post, ..)| post.id).collect();
        let counts: HashMap<i32, i64> = comments::table
            .filter(comments::post_id.eq_any(&ids))
            .group_by(comments::post_id)
            .select((comments::post_id, count_star()))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        let items = rows
            .into_iter()
            .map(|row| {
                let comment_count = counts.get(&row.0.id).copied().unwrap_or(0) as usize;
                Post::try_from(row).map(|post| PostCard {
                    post,
                    comment_count,
                })
            })
            .collect::<Result<Vec<PostCard>, _>>()?;

        Ok((total, items))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        use crate::schema::{categories, locations, posts, users};

        let mut conn = self.conn()?;

        let row = posts::table
            .inner_join(users::table)
            .inner_join(categories::table)
            .left_join(locations::table)
            .filter(posts::id.eq(id.get()))
            .select((
                posts::all_columns,
                users::all_columns,
                categories::all_columns,
                locations::all_columns.nullable(),
            ))
            .first::<PostRow>(&mut conn)
            .optional()?;

        let post = row.map(TryInto::try_into).transpose()?;
        Ok(post)
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<PostId> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let db_post: DbNewPost = post.clone().into();

        let id = diesel::insert_into(posts::table)
            .values(db_post)
            .returning(posts::id)
            .get_result::<i32>(&mut conn)?;

        Ok(PostId::new(id)?)
    }

    fn update_post(&self, id: PostId, post: &UpdatePost) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let changes: DbUpdatePost = post.clone().into();

        let affected = diesel::update(posts::table.filter(posts::id.eq(id.get())))
            .set(changes)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        use crate::schema::{comments, posts};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(comments::table.filter(comments::post_id.eq(id.get())))
                .execute(conn)?;

            diesel::delete(posts::table.filter(posts::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
