use diesel::prelude::*;

use crate::domain::types::{UserId, Username};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser};
use crate::repository::{DieselRepository, RepositoryResult, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::id.eq(id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }

    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::username.eq(username.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<UserId> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user: DbNewUser = user.clone().into();

        let id = diesel::insert_into(users::table)
            .values(db_user)
            .returning(users::id)
            .get_result::<i32>(&mut conn)?;

        Ok(UserId::new(id)?)
    }

    fn update_user(&self, id: UserId, user: &UpdateUser) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let changes: DbUpdateUser = user.clone().into();

        let affected = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(changes)
            .execute(&mut conn)?;

        Ok(affected)
    }
}
