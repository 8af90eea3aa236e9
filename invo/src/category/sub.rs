use crate::category::{categories, Category};
use crate::prelude::*;
pub use crate::schema::subcategories;

use chrono::{offset::Utc, NaiveDateTime};
use diesel::prelude::*;

/// Leaf classification referenced by ledger entries
///
/// The income/expense kind lives on the parent category and is reached
/// through the join.
#[derive(Debug, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = subcategories)]
#[diesel(belongs_to(Category, foreign_key = category_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubCategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: Slug,
    pub deleted_at: Option<NaiveDateTime>,
}

impl SubCategory {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        subcategories::table
            .find(id)
            .select(SubCategory::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "SubCategory", None))
    }

    /// Resolve a slug to the active subcategory it references
    ///
    /// Scoped through the parent category, which must belong to the given
    /// profile and still be active itself.
    pub fn find_by_slug(conn: &mut Conn, profile_id: i64, slug: &Slug) -> Result<Self> {
        subcategories::table
            .inner_join(categories::table)
            .filter(categories::profile_id.eq(profile_id))
            .filter(categories::deleted_at.is_null())
            .filter(subcategories::slug.eq(slug))
            .filter(subcategories::deleted_at.is_null())
            .select(SubCategory::as_select())
            .first(conn)
            .map_err(|_| Error::Resolution("subcategory"))
    }

    /// The parent category, regardless of either row's deletion state
    pub fn fetch_category(&self, conn: &mut Conn) -> Result<Category> {
        Category::find(conn, self.category_id)
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        if !self.is_active() {
            return Err(Error::Invalid("subcategory is already deleted".to_owned()));
        }

        let now = Utc::now().naive_utc();
        diesel::update(&*self)
            .set(subcategories::deleted_at.eq(now))
            .execute(conn)?;
        self.deleted_at = Some(now);

        Ok(())
    }
}

pub struct NewSubCategory<'a> {
    pub category: &'a Category,
    pub name: &'a str,
}

impl NewSubCategory<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<SubCategory> {
        if self.name.trim().is_empty() {
            return Err(Error::Invalid("subcategory.name cannot be empty".to_owned()));
        }
        if !self.category.is_active() {
            return Err(Error::Resolution("category"));
        }

        Ok(diesel::insert_into(subcategories::table)
            .values((
                subcategories::category_id.eq(self.category.id),
                subcategories::name.eq(self.name),
                subcategories::slug.eq(Slug::generate(self.name)),
            ))
            .returning(SubCategory::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = subcategories)]
pub struct ChangeSubCategory<'a> {
    pub name: Option<&'a str>,
}

impl ChangeSubCategory<'_> {
    pub fn save(self, conn: &mut Conn, subcategory: &SubCategory) -> Result<()> {
        diesel::update(subcategory).set(self).execute(conn)?;
        Ok(())
    }

    pub fn apply(self, conn: &mut Conn, subcategory: &mut SubCategory) -> Result<()> {
        self.clone().save(conn, subcategory)?;

        if let Some(value) = self.name {
            subcategory.name = value.to_string();
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct QuerySubCategory {
    pub profile_id: i64,
    pub category_id: Option<i64>,
    pub count: Option<i64>,
}

impl QuerySubCategory {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<(SubCategory, Category)>> {
        let mut query = subcategories::table
            .inner_join(categories::table)
            .select((SubCategory::as_select(), Category::as_select()))
            .order((categories::name.asc(), subcategories::name.asc()))
            .into_boxed()
            .filter(categories::profile_id.eq(self.profile_id))
            .filter(subcategories::deleted_at.is_null())
            .filter(categories::deleted_at.is_null());

        if let Some(category_id) = self.category_id {
            query = query.filter(subcategories::category_id.eq(category_id));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query.load(conn)?)
    }
}
