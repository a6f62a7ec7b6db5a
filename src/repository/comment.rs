use diesel::prelude::*;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{CommentId, CommentText, PostId};
use crate::models::comment::{CommentRow, NewComment as DbNewComment};
use crate::repository::{CommentReader, CommentWriter, DieselRepository, RepositoryResult};

impl CommentReader for DieselRepository {
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;

        let items = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id.get()))
            .select((comments::all_columns, users::all_columns))
            .order((comments::created_at.asc(), comments::id.asc()))
            .load::<CommentRow>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Comment>, _>>()?;

        Ok(items)
    }

    fn get_comment(&self, post_id: PostId, id: CommentId) -> RepositoryResult<Option<Comment>> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;

        let row = comments::table
            .inner_join(users::table)
            .filter(comments::id.eq(id.get()))
            .filter(comments::post_id.eq(post_id.get()))
            .select((comments::all_columns, users::all_columns))
            .first::<CommentRow>(&mut conn)
            .optional()?;

        let comment = row.map(TryInto::try_into).transpose()?;
        Ok(comment)
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<CommentId> {
        use crate::schema::comments;

        let mut conn = self.conn()?;
        let db_comment: DbNewComment = comment.clone().into();

        let id = diesel::insert_into(comments::table)
            .values(db_comment)
            .returning(comments::id)
            .get_result::<i32>(&mut conn)?;

        Ok(CommentId::new(id)?)
    }

    fn update_comment(&self, id: CommentId, text: &CommentText) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected = diesel::update(comments::table.filter(comments::id.eq(id.get())))
            .set(comments::text.eq(text.as_str()))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(comments::table.filter(comments::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }
}
