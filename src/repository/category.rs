use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryId, CategorySlug};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository, RepositoryResult};

impl CategoryReader for DieselRepository {
    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::slug.eq(slug.as_str()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn list_categories(&self, published_only: bool) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let mut items = categories::table.into_boxed::<diesel::sqlite::Sqlite>();
        if published_only {
            items = items.filter(categories::is_published.eq(true));
        }

        let items = items
            .order(categories::title.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<CategoryId> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let id = diesel::insert_into(categories::table)
            .values(db_category)
            .returning(categories::id)
            .get_result::<i32>(&mut conn)?;

        Ok(CategoryId::new(id)?)
    }
}
