use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::location::{Location as DomainLocation, NewLocation as DomainNewLocation};
use crate::domain::types::{LocationName, TypeConstraintError};

/// Diesel model representing the `locations` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::locations)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::locations)]
pub struct NewLocation {
    pub name: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Location> for DomainLocation {
    type Error = TypeConstraintError;

    fn try_from(location: Location) -> Result<Self, Self::Error> {
        Ok(Self {
            id: location.id.try_into()?,
            name: LocationName::new(location.name)?,
            is_published: location.is_published,
            created_at: location.created_at,
        })
    }
}

impl From<DomainNewLocation> for NewLocation {
    fn from(location: DomainNewLocation) -> Self {
        Self {
            name: location.name.into_inner(),
            is_published: location.is_published,
            created_at: location.created_at,
        }
    }
}
