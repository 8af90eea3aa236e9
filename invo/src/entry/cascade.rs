use crate::category::categories;
use crate::date;
use crate::entry::sequencer::Anchor;
use crate::entry::{entries, Entry};
use crate::prelude::*;
use crate::schema::subcategories;

use diesel::prelude::*;

/// Rewrite balances and sequence numbers for every active entry at or
/// after the anchor position, in ledger order
///
/// Cost is linear in the number of entries from the anchor onward, so a
/// mutation near the start of a large ledger rewrites most of it.
pub(crate) fn rebalance(conn: &mut Conn, profile_id: i64, anchor: &Anchor) -> Result<usize> {
    let mut query = entries::table
        .inner_join(subcategories::table.inner_join(categories::table))
        .select((Entry::as_select(), categories::kind))
        .order((
            entries::sqn.asc(),
            entries::entry_date.asc(),
            entries::id.asc(),
        ))
        .into_boxed()
        .filter(entries::profile_id.eq(profile_id))
        .filter(entries::deleted_at.is_null())
        .filter(entries::sqn.ge(anchor.sqn));

    if let Some(id) = anchor.entry_id {
        query = query.filter(entries::id.ne(id));
    }

    let rows = query.load::<(Entry, CategoryKind)>(conn)?;

    let mut monthly_balance = anchor.monthly_balance;
    let mut overall_balance = anchor.overall_balance;
    let mut last_date = anchor.entry_date;
    let mut sqn = match anchor.entry_id {
        Some(_) => anchor.sqn,
        None => anchor.sqn - 1,
    };

    let count = rows.len();
    for (entry, kind) in rows {
        let signed = kind.signed(entry.amount);

        monthly_balance = if date::same_cycle(entry.entry_date, last_date) {
            monthly_balance + signed
        } else {
            signed
        };
        overall_balance += signed;
        sqn += 1;
        last_date = entry.entry_date;

        diesel::update(&entry)
            .set((
                entries::monthly_balance.eq(db::Decimal::from(monthly_balance)),
                entries::overall_balance.eq(db::Decimal::from(overall_balance)),
                entries::sqn.eq(sqn),
            ))
            .execute(conn)?;
    }

    log::debug!(
        "rebalanced {} entries of profile {} from sqn {}",
        count,
        profile_id,
        anchor.sqn
    );

    Ok(count)
}
