use crate::analytic;
use crate::entry::{cascade, entries, sequencer, Condition, Entry};
use crate::prelude::*;

use chrono::NaiveDate;
use diesel::prelude::*;

/// A pending amendment of an entry
///
/// `Some(None)` on a reference field clears it. Moving the entry in time
/// resequences it and recomputes every balance from the earlier of its old
/// and new positions onward.
#[derive(Default, Clone)]
pub struct ChangeEntry<'a> {
    pub entry_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub condition: Option<Condition>,
    pub description: Option<&'a str>,
    pub subcategory: Option<&'a Slug>,
    pub beneficiary: Option<Option<&'a Slug>>,
    pub client: Option<Option<&'a Slug>>,
    pub cost_center: Option<Option<&'a Slug>>,
    pub account: Option<Option<&'a Slug>>,
}

impl<'a> ChangeEntry<'a> {
    pub fn save(self, conn: &mut Conn, entry: &Entry) -> Result<()> {
        conn.transaction(|conn| {
            self.to_resolved(conn, entry)?
                .validate(entry)?
                .save(conn, entry)
        })
    }

    /// Like save, but also refreshes the in-memory entry with the values
    /// the recomputation persisted
    pub fn apply(self, conn: &mut Conn, entry: &mut Entry) -> Result<()> {
        self.save(conn, entry)?;
        *entry = Entry::find(conn, entry.id)?;

        Ok(())
    }

    pub fn to_resolved(self, conn: &mut Conn, entry: &Entry) -> Result<ResolvedChangeEntry<'a>> {
        let profile_id = entry.profile_id;

        Ok(ResolvedChangeEntry {
            entry_date: self.entry_date,
            amount: self.amount,
            condition: self.condition,
            description: self.description,
            subcategory: self
                .subcategory
                .map(|slug| SubCategory::find_by_slug(conn, profile_id, slug))
                .transpose()?,
            beneficiary: match self.beneficiary {
                None => None,
                Some(None) => Some(None),
                Some(Some(slug)) => {
                    Some(Some(Beneficiary::find_by_slug(conn, profile_id, slug)?))
                }
            },
            client: match self.client {
                None => None,
                Some(None) => Some(None),
                Some(Some(slug)) => Some(Some(Client::find_by_slug(conn, profile_id, slug)?)),
            },
            cost_center: match self.cost_center {
                None => None,
                Some(None) => Some(None),
                Some(Some(slug)) => Some(Some(Financial::find_by_slug(
                    conn,
                    profile_id,
                    FinancialKind::CostCenter,
                    slug,
                )?)),
            },
            account: match self.account {
                None => None,
                Some(None) => Some(None),
                Some(Some(slug)) => Some(Some(Financial::find_by_slug(
                    conn,
                    profile_id,
                    FinancialKind::BankAccount,
                    slug,
                )?)),
            },
        })
    }
}

pub struct ResolvedChangeEntry<'a> {
    pub entry_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub condition: Option<Condition>,
    pub description: Option<&'a str>,
    pub subcategory: Option<SubCategory>,
    pub beneficiary: Option<Option<Beneficiary>>,
    pub client: Option<Option<Client>>,
    pub cost_center: Option<Option<Financial>>,
    pub account: Option<Option<Financial>>,
}

impl<'a> ResolvedChangeEntry<'a> {
    pub fn validate(self, entry: &Entry) -> Result<ValidatedChangeEntry<'a>> {
        if !entry.is_active() {
            return Err(Error::Invalid("cannot edit a deleted entry".to_owned()));
        }
        if self.amount.is_some_and(|amount| amount < Decimal::ZERO) {
            return Err(Error::Invalid(
                "entry.amount is a magnitude, the category kind carries the sign".to_owned(),
            ));
        }

        Ok(ValidatedChangeEntry {
            entry_date: self.entry_date,
            changeset: EntryChangeset {
                entry_date: self.entry_date,
                amount: self.amount,
                condition: self.condition,
                description: self.description,
                subcategory_id: self.subcategory.map(|s| s.id),
                beneficiary_id: self.beneficiary.map(|b| b.map(|b| b.id)),
                client_id: self.client.map(|c| c.map(|c| c.id)),
                cost_center_id: self.cost_center.map(|f| f.map(|f| f.id)),
                account_id: self.account.map(|f| f.map(|f| f.id)),
            },
        })
    }
}

pub struct ValidatedChangeEntry<'a> {
    entry_date: Option<NaiveDate>,
    changeset: EntryChangeset<'a>,
}

impl ValidatedChangeEntry<'_> {
    pub fn save(self, conn: &mut Conn, entry: &Entry) -> Result<()> {
        let old_sqn = entry.sqn;
        let old_date = entry.entry_date;
        let new_date = self.entry_date.unwrap_or(old_date);

        let position = sequencer::position(conn, entry.profile_id, new_date, Some(entry.id))?;
        let new_sqn = position.map(|p| p.sqn + 1).unwrap_or(1);

        // balances are rewritten by the walk below, only the fields and the
        // new position need to be persisted here
        diesel::update(entry)
            .set((self.changeset, entries::sqn.eq(new_sqn)))
            .execute(conn)?;

        let start = new_sqn.min(old_sqn);
        let earliest = new_date.min(old_date);
        let anchor = sequencer::anchor_before(conn, entry.profile_id, start, earliest)?;
        cascade::rebalance(conn, entry.profile_id, &anchor)?;
        analytic::refresh(conn, entry.profile_id, earliest)
    }
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = entries)]
pub struct EntryChangeset<'a> {
    pub entry_date: Option<NaiveDate>,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub amount: Option<Decimal>,
    pub condition: Option<Condition>,
    pub description: Option<&'a str>,
    pub subcategory_id: Option<i64>,
    pub beneficiary_id: Option<Option<i64>>,
    pub client_id: Option<Option<i64>>,
    pub cost_center_id: Option<Option<i64>>,
    pub account_id: Option<Option<i64>>,
}
