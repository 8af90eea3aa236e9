pub use crate::schema::categories;
use crate::prelude::*;
use crate::profile::Profile;

use chrono::{offset::Utc, NaiveDateTime};
use diesel::prelude::*;

mod kind;
pub use kind::CategoryKind;

mod sub;
pub use sub::{ChangeSubCategory, NewSubCategory, QuerySubCategory, SubCategory};

#[derive(Debug, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = categories)]
#[diesel(belongs_to(Profile, foreign_key = profile_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    pub id: i64,
    pub profile_id: i64,
    pub name: String,
    pub slug: Slug,
    pub kind: CategoryKind,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Category {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        categories::table
            .find(id)
            .select(Category::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Category", None))
    }

    /// Resolve a slug to the active category it references
    pub fn find_by_slug(conn: &mut Conn, profile_id: i64, slug: &Slug) -> Result<Self> {
        categories::table
            .filter(categories::profile_id.eq(profile_id))
            .filter(categories::slug.eq(slug))
            .filter(categories::deleted_at.is_null())
            .select(Category::as_select())
            .first(conn)
            .map_err(|_| Error::Resolution("category"))
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        if !self.is_active() {
            return Err(Error::Invalid("category is already deleted".to_owned()));
        }

        let now = Utc::now().naive_utc();
        diesel::update(&*self)
            .set(categories::deleted_at.eq(now))
            .execute(conn)?;
        self.deleted_at = Some(now);

        Ok(())
    }
}

pub struct NewCategory<'a> {
    pub profile: &'a Profile,
    pub name: &'a str,
    pub kind: CategoryKind,
}

impl NewCategory<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<Category> {
        if self.name.trim().is_empty() {
            return Err(Error::Invalid("category.name cannot be empty".to_owned()));
        }

        Ok(diesel::insert_into(categories::table)
            .values((
                categories::profile_id.eq(self.profile.id),
                categories::name.eq(self.name),
                categories::slug.eq(Slug::generate(self.name)),
                categories::kind.eq(self.kind),
            ))
            .returning(Category::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = categories)]
pub struct ChangeCategory<'a> {
    pub name: Option<&'a str>,
}

impl ChangeCategory<'_> {
    pub fn save(self, conn: &mut Conn, category: &Category) -> Result<()> {
        diesel::update(category).set(self).execute(conn)?;
        Ok(())
    }

    pub fn apply(self, conn: &mut Conn, category: &mut Category) -> Result<()> {
        self.clone().save(conn, category)?;

        if let Some(value) = self.name {
            category.name = value.to_string();
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct QueryCategory {
    pub profile_id: i64,
    pub kind: Option<CategoryKind>,
    pub count: Option<i64>,
}

impl QueryCategory {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<Category>> {
        let mut query = categories::table
            .select(Category::as_select())
            .order(categories::name.asc())
            .into_boxed()
            .filter(categories::profile_id.eq(self.profile_id))
            .filter(categories::deleted_at.is_null());

        if let Some(kind) = self.kind {
            query = query.filter(categories::kind.eq(kind));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query.load(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn create_then_resolve() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;

        let category = NewCategory {
            profile: &profile,
            name: "Office expenses",
            kind: CategoryKind::Expense,
        }
        .save(conn)?;

        assert_eq!("office-expenses", category.slug.as_str());
        assert!(category.is_active());

        let found = Category::find_by_slug(conn, profile.id, &category.slug)?;
        assert_eq!(category.id, found.id);
        assert_eq!(CategoryKind::Expense, found.kind);

        Ok(())
    }

    #[test]
    fn resolution_is_profile_scoped() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let other = test::profile(conn, "rupert")?;

        let category = test::category(conn, &profile, "Sales", CategoryKind::Income)?;

        let result = Category::find_by_slug(conn, other.id, &category.slug);
        assert!(matches!(result, Err(Error::Resolution("category"))));

        Ok(())
    }

    #[test]
    fn delete_frees_the_slug() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;

        let mut category = test::category(conn, &profile, "Sales", CategoryKind::Income)?;

        let result = NewCategory {
            profile: &profile,
            name: "Sales",
            kind: CategoryKind::Income,
        }
        .save(conn);
        assert!(matches!(result, Err(Error::NonUnique(_))));

        category.delete(conn)?;
        assert!(matches!(
            Category::find_by_slug(conn, profile.id, &category.slug),
            Err(Error::Resolution("category"))
        ));

        let replacement = NewCategory {
            profile: &profile,
            name: "Sales",
            kind: CategoryKind::Income,
        }
        .save(conn)?;
        assert_eq!(category.slug, replacement.slug);

        assert!(category.delete(conn).is_err());

        Ok(())
    }

    #[test]
    fn rename() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;

        let mut category = test::category(conn, &profile, "Sales", CategoryKind::Income)?;
        ChangeCategory { name: Some("Sales and services") }.apply(conn, &mut category)?;

        assert_eq!("Sales and services", category.reload(conn)?.name);
        // the slug is a stable handle, renaming does not reissue it
        assert_eq!("sales", category.slug.as_str());

        Ok(())
    }

    #[test]
    fn query_by_kind() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;

        test::category(conn, &profile, "Sales", CategoryKind::Income)?;
        test::category(conn, &profile, "Office", CategoryKind::Expense)?;
        test::category(conn, &profile, "Interest", CategoryKind::Income)?;

        let all = QueryCategory {
            profile_id: profile.id,
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(
            vec!["Interest", "Office", "Sales"],
            all.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        let incomes = QueryCategory {
            profile_id: profile.id,
            kind: Some(CategoryKind::Income),
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(2, incomes.len());

        Ok(())
    }
}
