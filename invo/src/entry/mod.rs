pub use crate::schema::entries;
use crate::analytic;
use crate::category::SubCategory;
use crate::prelude::*;
use crate::profile::Profile;

use chrono::{offset::Utc, NaiveDate, NaiveDateTime};
use diesel::prelude::*;

mod cascade;
mod sequencer;

mod condition;
pub use condition::Condition;

mod new;
pub use new::NewEntry;

mod change;
pub use change::ChangeEntry;

mod query;
pub use query::{QueryEntry, DEFAULT_PAGE_LIMIT};

/// One ledger row
///
/// Active entries of a profile carry dense sequence numbers consistent
/// with their date order, and running balances derived from every entry
/// at or before them.
#[derive(Debug, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = entries)]
#[diesel(belongs_to(Profile, foreign_key = profile_id))]
#[diesel(belongs_to(SubCategory, foreign_key = subcategory_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Entry {
    pub id: i64,
    pub profile_id: i64,
    pub entry_date: NaiveDate,
    #[diesel(deserialize_as = crate::db::Decimal)]
    pub amount: Decimal,
    #[diesel(deserialize_as = crate::db::Decimal)]
    pub monthly_balance: Decimal,
    #[diesel(deserialize_as = crate::db::Decimal)]
    pub overall_balance: Decimal,
    pub sqn: i32,
    pub condition: Condition,
    pub description: String,
    pub subcategory_id: i64,
    pub beneficiary_id: Option<i64>,
    pub client_id: Option<i64>,
    pub cost_center_id: Option<i64>,
    pub account_id: Option<i64>,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Entry {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        entries::table
            .find(id)
            .select(Entry::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Entry", None))
    }

    pub fn fetch_subcategory(&self, conn: &mut Conn) -> Result<SubCategory> {
        SubCategory::find(conn, self.subcategory_id)
    }

    /// Soft-delete the entry, then close the sequence gap it leaves and
    /// recompute balances and analytics from its former position onward
    ///
    /// Terminal: a deleted entry never comes back and is excluded from
    /// every later computation, but the row itself is kept.
    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        if !self.is_active() {
            return Err(Error::Invalid("entry is already deleted".to_owned()));
        }

        conn.transaction(|conn| {
            let now = Utc::now().naive_utc();
            diesel::update(&*self)
                .set(entries::deleted_at.eq(now))
                .execute(conn)?;
            self.deleted_at = Some(now);

            let anchor =
                sequencer::anchor_before(conn, self.profile_id, self.sqn, self.entry_date)?;
            cascade::rebalance(conn, self.profile_id, &anchor)?;
            analytic::refresh(conn, self.profile_id, anchor.entry_date)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn post_into_an_empty_ledger() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let sales = test::income(conn, &profile, "Sales", "Consulting")?;

        let entry = test::entry(conn, &profile, &sales, test::date(2022, 1, 5), "1002.03")?;

        assert_eq!(1, entry.sqn);
        assert_eq!(test::dec("1002.030"), entry.amount);
        assert_eq!(test::dec("1002.030"), entry.monthly_balance);
        assert_eq!(test::dec("1002.030"), entry.overall_balance);

        Ok(())
    }

    #[test]
    fn earlier_dated_post_shifts_the_ledger() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let sales = test::income(conn, &profile, "Sales", "Consulting")?;
        let office = test::expense(conn, &profile, "Office", "Rent")?;

        let first = test::entry(conn, &profile, &sales, test::date(2022, 1, 5), "1002.03")?;
        let second = test::entry(conn, &profile, &office, test::date(2022, 1, 1), "500")?;

        assert_eq!(1, second.sqn);
        assert_eq!(test::dec("-500.000"), second.monthly_balance);
        assert_eq!(test::dec("-500.000"), second.overall_balance);

        let first = first.reloaded(conn)?;
        assert_eq!(2, first.sqn);
        assert_eq!(test::dec("502.030"), first.monthly_balance);
        assert_eq!(test::dec("502.030"), first.overall_balance);

        Ok(())
    }

    #[test]
    fn same_date_posts_keep_insertion_order() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let sales = test::income(conn, &profile, "Sales", "Consulting")?;

        let first = test::entry(conn, &profile, &sales, test::date(2022, 1, 5), "10")?;
        let second = test::entry(conn, &profile, &sales, test::date(2022, 1, 5), "20")?;
        let third = test::entry(conn, &profile, &sales, test::date(2022, 1, 5), "30")?;

        assert_eq!(1, first.reloaded(conn)?.sqn);
        assert_eq!(2, second.reloaded(conn)?.sqn);
        assert_eq!(3, third.reloaded(conn)?.sqn);
        assert_eq!(test::dec("60.000"), third.reloaded(conn)?.overall_balance);

        Ok(())
    }

    #[test]
    fn unresolvable_reference_leaves_the_ledger_untouched() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let sales = test::income(conn, &profile, "Sales", "Consulting")?;

        test::entry(conn, &profile, &sales, test::date(2022, 1, 5), "100")?;

        let missing = Slug::generate("nobody");
        let result = NewEntry {
            amount: test::dec("50"),
            beneficiary: Some(&missing),
            ..NewEntry::new(&profile, &sales.slug, test::date(2022, 1, 6))
        }
        .save(conn);
        assert!(matches!(result, Err(Error::Resolution("beneficiary"))));

        let ledger = test::ledger(conn, &profile)?;
        assert_eq!(1, ledger.len());
        assert_eq!(test::dec("100.000"), ledger[0].overall_balance);

        Ok(())
    }

    #[test]
    fn delete_recomputes_the_remaining_ledger() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let sales = test::income(conn, &profile, "Sales", "Consulting")?;
        let office = test::expense(conn, &profile, "Office", "Rent")?;

        let mut later = test::entry(conn, &profile, &sales, test::date(2022, 1, 5), "1002.03")?;
        test::entry(conn, &profile, &office, test::date(2022, 1, 1), "500")?;

        later.delete(conn)?;
        assert!(!later.is_active());

        let ledger = test::ledger(conn, &profile)?;
        assert_eq!(1, ledger.len());
        assert_eq!(1, ledger[0].sqn);
        assert_eq!(test::dec("-500.000"), ledger[0].monthly_balance);
        assert_eq!(test::dec("-500.000"), ledger[0].overall_balance);

        assert!(later.delete(conn).is_err());

        Ok(())
    }

    #[test]
    fn delete_closes_the_sequence_gap() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let sales = test::income(conn, &profile, "Sales", "Consulting")?;

        let first = test::entry(conn, &profile, &sales, test::date(2022, 1, 1), "10")?;
        let mut second = test::entry(conn, &profile, &sales, test::date(2022, 1, 2), "20")?;
        let third = test::entry(conn, &profile, &sales, test::date(2022, 1, 3), "30")?;

        second.delete(conn)?;

        // the earlier entry keeps its position, the later one closes the gap
        assert_eq!(1, first.reloaded(conn)?.sqn);
        assert_eq!(2, third.reloaded(conn)?.sqn);
        assert_eq!(test::dec("40.000"), third.reloaded(conn)?.overall_balance);

        Ok(())
    }

    #[test]
    fn delete_the_only_entry() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let sales = test::income(conn, &profile, "Sales", "Consulting")?;

        let mut entry = test::entry(conn, &profile, &sales, test::date(2022, 1, 5), "100")?;
        entry.delete(conn)?;

        assert!(test::ledger(conn, &profile)?.is_empty());

        let replacement = test::entry(conn, &profile, &sales, test::date(2022, 2, 1), "10")?;
        assert_eq!(1, replacement.sqn);
        assert_eq!(test::dec("10.000"), replacement.overall_balance);

        Ok(())
    }

    #[test]
    fn ledgers_are_profile_scoped() -> Result<()> {
        let conn = &mut test::db()?;
        let constance = test::profile(conn, "constance")?;
        let rupert = test::profile(conn, "rupert")?;
        let sales = test::income(conn, &constance, "Sales", "Consulting")?;
        let rent = test::income(conn, &rupert, "Rentals", "Housing")?;

        test::entry(conn, &constance, &sales, test::date(2022, 1, 5), "100")?;
        let other = test::entry(conn, &rupert, &rent, test::date(2022, 1, 6), "70")?;

        assert_eq!(1, other.sqn);
        assert_eq!(test::dec("70.000"), other.overall_balance);
        assert_eq!(1, test::ledger(conn, &constance)?.len());

        Ok(())
    }

    #[test]
    fn running_balances_hold_across_months() -> Result<()> {
        let conn = &mut test::db()?;
        let profile = test::profile(conn, "constance")?;
        let sales = test::income(conn, &profile, "Sales", "Consulting")?;
        let office = test::expense(conn, &profile, "Office", "Rent")?;

        // posted out of chronological order on purpose
        for (subcategory, date, amount) in [
            (&sales, test::date(2022, 2, 10), "250"),
            (&office, test::date(2022, 1, 15), "75.5"),
            (&sales, test::date(2022, 1, 2), "1200"),
            (&office, test::date(2022, 3, 1), "42.125"),
            (&sales, test::date(2022, 2, 10), "80"),
            (&office, test::date(2022, 2, 28), "300"),
        ] {
            test::entry(conn, &profile, subcategory, date, amount)?;
        }

        let ledger = test::ledger(conn, &profile)?;
        assert_eq!(6, ledger.len());

        let mut monthly = Decimal::ZERO;
        let mut overall = Decimal::ZERO;
        let mut last_date = None;
        for (index, entry) in ledger.iter().enumerate() {
            assert_eq!(index as i32 + 1, entry.sqn);

            let kind = entry.fetch_subcategory(conn)?.fetch_category(conn)?.kind;
            let signed = kind.signed(entry.amount);

            monthly = match last_date {
                Some(prev) if date::same_cycle(prev, entry.entry_date) => monthly + signed,
                _ => signed,
            };
            overall += signed;

            assert_eq!(monthly, entry.monthly_balance, "monthly at sqn {}", entry.sqn);
            assert_eq!(overall, entry.overall_balance, "overall at sqn {}", entry.sqn);
            assert!(last_date.is_none_or(|prev| prev <= entry.entry_date));
            last_date = Some(entry.entry_date);
        }

        assert_eq!(test::dec("1112.375"), overall);

        Ok(())
    }
}
