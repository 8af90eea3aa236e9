use crate::entry::entries;
use crate::prelude::*;

use chrono::NaiveDate;
use diesel::prelude::*;

/// Last known ledger state at a position, from which balances accumulate
#[derive(Debug, Clone, Copy)]
pub(crate) struct Anchor {
    pub sqn: i32,
    pub entry_date: NaiveDate,
    pub monthly_balance: Decimal,
    pub overall_balance: Decimal,
    /// Row owning the anchor position. It keeps its values untouched and
    /// renumbering continues after it; None marks a synthetic zero anchor
    /// and renumbering starts at the anchor position itself.
    pub entry_id: Option<i64>,
}

type AnchorRow = (i64, i32, NaiveDate, db::Decimal, db::Decimal);

impl From<AnchorRow> for Anchor {
    fn from((id, sqn, entry_date, monthly, overall): AnchorRow) -> Self {
        Anchor {
            sqn,
            entry_date,
            monthly_balance: monthly.into(),
            overall_balance: overall.into(),
            entry_id: Some(id),
        }
    }
}

/// The active entry with the greatest SQN dated on or before `date`
///
/// A new or edited entry slots in right after it, so among same-date
/// entries the insertion order decides the tie.
pub(crate) fn position(
    conn: &mut Conn,
    profile_id: i64,
    date: NaiveDate,
    exclude: Option<i64>,
) -> Result<Option<Anchor>> {
    let mut query = entries::table
        .select((
            entries::id,
            entries::sqn,
            entries::entry_date,
            entries::monthly_balance,
            entries::overall_balance,
        ))
        .order(entries::sqn.desc())
        .into_boxed()
        .filter(entries::profile_id.eq(profile_id))
        .filter(entries::deleted_at.is_null())
        .filter(entries::entry_date.le(date));

    if let Some(id) = exclude {
        query = query.filter(entries::id.ne(id));
    }

    Ok(query
        .first::<AnchorRow>(conn)
        .optional()?
        .map(Anchor::from))
}

/// The anchor immediately preceding `sqn`, or a synthetic zero anchor when
/// the recomputation must restart from the very beginning of the ledger
pub(crate) fn anchor_before(
    conn: &mut Conn,
    profile_id: i64,
    sqn: i32,
    fallback_date: NaiveDate,
) -> Result<Anchor> {
    Ok(entries::table
        .filter(entries::profile_id.eq(profile_id))
        .filter(entries::deleted_at.is_null())
        .filter(entries::sqn.lt(sqn))
        .order(entries::sqn.desc())
        .select((
            entries::id,
            entries::sqn,
            entries::entry_date,
            entries::monthly_balance,
            entries::overall_balance,
        ))
        .first::<AnchorRow>(conn)
        .optional()?
        .map(Anchor::from)
        .unwrap_or(Anchor {
            sqn: 1,
            entry_date: fallback_date,
            monthly_balance: Decimal::ZERO,
            overall_balance: Decimal::ZERO,
            entry_id: None,
        }))
}
