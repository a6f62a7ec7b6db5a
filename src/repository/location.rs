use diesel::prelude::*;

use crate::domain::location::{Location, NewLocation};
use crate::domain::types::LocationId;
use crate::models::location::{Location as DbLocation, NewLocation as DbNewLocation};
use crate::repository::{DieselRepository, LocationReader, LocationWriter, RepositoryResult};

impl LocationReader for DieselRepository {
    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let location = locations::table
            .filter(locations::id.eq(id.get()))
            .first::<DbLocation>(&mut conn)
            .optional()?;

        let location = location.map(TryInto::try_into).transpose()?;
        Ok(location)
    }

    fn list_locations(&self, published_only: bool) -> RepositoryResult<Vec<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let mut items = locations::table.into_boxed::<diesel::sqlite::Sqlite>();
        if published_only {
            items = items.filter(locations::is_published.eq(true));
        }

        let items = items
            .order(locations::name.asc())
            .load::<DbLocation>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Location>, _>>()?;

        Ok(items)
    }
}

impl LocationWriter for DieselRepository {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<LocationId> {
        use crate::schema::locations;

        let mut conn = self.conn()?;
        let db_location: DbNewLocation = location.clone().into();

        let id = diesel::insert_into(locations::table)
            .values(db_location)
            .returning(locations::id)
            .get_result::<i32>(&mut conn)?;

        Ok(LocationId::new(id)?)
    }
}
