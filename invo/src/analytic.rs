pub use crate::schema::analytics;
use crate::category::categories;
use crate::date::Month;
use crate::prelude::*;
use crate::schema::{entries, subcategories};

use chrono::{offset::Utc, NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Cached balance report for one (profile, month) cycle
///
/// Snapshots are derived data: always recomputable from the entries, and
/// overwritten whenever a mutation touches their cycle or any earlier one.
#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = analytics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Analytic {
    pub id: i64,
    pub profile_id: i64,
    pub cycle: NaiveDate,
    pub report: String,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Analytic {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn parse(&self) -> Result<Report> {
        serde_json::from_str(&self.report)
            .map_err(|e| Error::Invalid(format!("malformed balance report. {e}")))
    }

    /// The active snapshot for a cycle, if any
    pub fn for_cycle(conn: &mut Conn, profile_id: i64, month: Month) -> Result<Option<Self>> {
        Ok(analytics::table
            .filter(analytics::profile_id.eq(profile_id))
            .filter(analytics::cycle.eq(month.first_day()?))
            .filter(analytics::deleted_at.is_null())
            .select(Analytic::as_select())
            .first(conn)
            .optional()?)
    }

    /// The most recent active snapshot strictly before a cycle, shown when
    /// the displayed month has none of its own
    pub fn latest_before(conn: &mut Conn, profile_id: i64, month: Month) -> Result<Option<Self>> {
        Ok(analytics::table
            .filter(analytics::profile_id.eq(profile_id))
            .filter(analytics::cycle.lt(month.first_day()?))
            .filter(analytics::deleted_at.is_null())
            .order(analytics::cycle.desc())
            .select(Analytic::as_select())
            .first(conn)
            .optional()?)
    }
}

/// The JSON shape stored in a snapshot
///
/// Amounts are serialized as strings with the ledger precision of 3
/// decimal places, and the field order is fixed, so rebuilding an
/// unchanged cycle reproduces the stored text byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub monthly: MonthlyReport,
    pub overall: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub revenue: String,
    pub expenses: String,
    pub balance: String,
}

impl Report {
    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Consistency(e.to_string()))
    }
}

fn amount_string(amount: Decimal) -> String {
    let mut amount = amount;
    amount.rescale(3);
    amount.to_string()
}

struct CycleFigures {
    report: Report,
    /// Whether the cycle still holds any active entry
    populated: bool,
}

fn cycle_figures(conn: &mut Conn, profile_id: i64, month: Month) -> Result<CycleFigures> {
    let range = month.as_date_range()?;

    let totals = |conn: &mut Conn, kind: CategoryKind| -> Result<Decimal> {
        let total: db::Decimal = entries::table
            .inner_join(subcategories::table.inner_join(categories::table))
            .filter(entries::profile_id.eq(profile_id))
            .filter(entries::deleted_at.is_null())
            .filter(entries::entry_date.ge(range.start))
            .filter(entries::entry_date.lt(range.end))
            .filter(categories::kind.eq(kind))
            .select(db::total(entries::amount))
            .first(conn)?;
        Ok(total.into())
    };

    let revenue = totals(conn, CategoryKind::Income)?;
    let expenses = totals(conn, CategoryKind::Expense)?;

    // the cycle's balances are the ones of its last entry in ledger order
    let last = entries::table
        .filter(entries::profile_id.eq(profile_id))
        .filter(entries::deleted_at.is_null())
        .filter(entries::entry_date.ge(range.start))
        .filter(entries::entry_date.lt(range.end))
        .order(entries::sqn.desc())
        .select((entries::monthly_balance, entries::overall_balance))
        .first::<(db::Decimal, db::Decimal)>(conn)
        .optional()?;

    let (monthly_balance, overall_balance) = match last {
        Some((monthly, overall)) => (monthly.into(), overall.into()),
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    Ok(CycleFigures {
        report: Report {
            monthly: MonthlyReport {
                revenue: amount_string(revenue),
                expenses: amount_string(expenses),
                balance: amount_string(monthly_balance),
            },
            overall: amount_string(overall_balance),
        },
        populated: last.is_some(),
    })
}

fn upsert(conn: &mut Conn, profile_id: i64, cycle: NaiveDate, report: &Report) -> Result<()> {
    let json = report.to_json()?;

    let existing = analytics::table
        .filter(analytics::profile_id.eq(profile_id))
        .filter(analytics::cycle.eq(cycle))
        .filter(analytics::deleted_at.is_null())
        .select(Analytic::as_select())
        .first(conn)
        .optional()?;

    match existing {
        Some(analytic) => diesel::update(&analytic)
            .set(analytics::report.eq(json))
            .execute(conn),
        None => diesel::insert_into(analytics::table)
            .values((
                analytics::profile_id.eq(profile_id),
                analytics::cycle.eq(cycle),
                analytics::report.eq(json),
            ))
            .execute(conn),
    }
    .map_err(|e| Error::Consistency(e.to_string()))?;

    Ok(())
}

/// Bring the cycle containing `reference` and every later cached cycle in
/// line with the ledger
///
/// Callers pass the earliest month a mutation affected; anything before it
/// is untouched by construction.
pub(crate) fn refresh(conn: &mut Conn, profile_id: i64, reference: NaiveDate) -> Result<()> {
    let month = Month::of(reference);
    let cycle = month.first_day()?;

    let figures = cycle_figures(conn, profile_id, month)?;
    upsert(conn, profile_id, cycle, &figures.report)?;

    let laters: Vec<Analytic> = analytics::table
        .filter(analytics::profile_id.eq(profile_id))
        .filter(analytics::deleted_at.is_null())
        .filter(analytics::cycle.gt(cycle))
        .order(analytics::cycle.asc())
        .select(Analytic::as_select())
        .load(conn)?;

    let count = laters.len();
    for analytic in laters {
        let figures = cycle_figures(conn, profile_id, Month::of(analytic.cycle))?;
        let json = figures.report.to_json()?;

        let update = if figures.populated {
            diesel::update(&analytic)
                .set(analytics::report.eq(json))
                .execute(conn)
        } else {
            // the month emptied out: retire the snapshot, keep the row
            diesel::update(&analytic)
                .set((
                    analytics::report.eq(json),
                    analytics::deleted_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
        };
        update.map_err(|e| Error::Consistency(e.to_string()))?;
    }

    log::debug!(
        "refreshed balance report of profile {} for {}-{:02} and {} later cycles",
        profile_id,
        month.year,
        month.month,
        count
    );

    Ok(())
}
