use crate::category::categories;
use crate::date::Month;
use crate::entry::{entries, Entry};
use crate::prelude::*;
use crate::schema::subcategories;

use diesel::prelude::*;

/// Page size used when the caller does not specify one; the surface layer
/// may override it from the environment
pub const DEFAULT_PAGE_LIMIT: i64 = 25;

/// Active entries of one profile, newest ledger position first, joined
/// with their classification for display
#[derive(Default)]
pub struct QueryEntry {
    pub profile_id: i64,
    /// Limit the listing to one calendar month
    pub cycle: Option<Month>,
    /// 1-based page; None lists everything
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

type QueryEntryResult = (Entry, SubCategory, Category);

impl QueryEntry {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<QueryEntryResult>> {
        let mut query = entries::table
            .inner_join(subcategories::table.inner_join(categories::table))
            .select((
                Entry::as_select(),
                SubCategory::as_select(),
                Category::as_select(),
            ))
            .order(entries::sqn.desc())
            .into_boxed()
            .filter(entries::profile_id.eq(self.profile_id))
            .filter(entries::deleted_at.is_null());

        if let Some(cycle) = self.cycle {
            let range = cycle.as_date_range()?;
            query = query
                .filter(entries::entry_date.ge(range.start))
                .filter(entries::entry_date.lt(range.end));
        }

        if let Some(page) = self.page {
            let per_page = self.per_page.unwrap_or(DEFAULT_PAGE_LIMIT);
            query = query.limit(per_page).offset((page - 1) * per_page);
        }

        Ok(query.load::<QueryEntryResult>(conn)?)
    }

    pub fn count(&self, conn: &mut Conn) -> Result<i64> {
        let mut query = entries::table
            .select(diesel::dsl::count_star())
            .into_boxed()
            .filter(entries::profile_id.eq(self.profile_id))
            .filter(entries::deleted_at.is_null());

        if let Some(cycle) = self.cycle {
            let range = cycle.as_date_range()?;
            query = query
                .filter(entries::entry_date.ge(range.start))
                .filter(entries::entry_date.lt(range.end));
        }

        Ok(query.get_result(conn)?)
    }

    /// Number of pages the listing spans
    pub fn pages(&self, conn: &mut Conn) -> Result<i64> {
        let per_page = self.per_page.unwrap_or(DEFAULT_PAGE_LIMIT);

        Ok((self.count(conn)? + per_page - 1) / per_page)
    }
}
