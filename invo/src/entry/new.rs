use crate::analytic;
use crate::date;
use crate::entry::{cascade, entries, sequencer, Condition, Entry};
use crate::prelude::*;
use crate::profile::Profile;

use chrono::NaiveDate;
use diesel::prelude::*;

/// A ledger entry about to be posted
///
/// References are carried as slugs and resolved against the profile's
/// active labels; an unresolvable reference aborts the whole posting.
pub struct NewEntry<'a> {
    pub profile: &'a Profile,
    pub entry_date: NaiveDate,
    pub amount: Decimal,
    pub condition: Condition,
    pub description: &'a str,
    pub subcategory: &'a Slug,
    pub beneficiary: Option<&'a Slug>,
    pub client: Option<&'a Slug>,
    pub cost_center: Option<&'a Slug>,
    pub account: Option<&'a Slug>,
}

impl<'a> NewEntry<'a> {
    pub fn new(profile: &'a Profile, subcategory: &'a Slug, entry_date: NaiveDate) -> Self {
        Self {
            profile,
            entry_date,
            amount: Decimal::ZERO,
            condition: Condition::Settled,
            description: "",
            subcategory,
            beneficiary: None,
            client: None,
            cost_center: None,
            account: None,
        }
    }

    /// Post the entry: resolve references, slot it into the ledger order,
    /// then rebalance the suffix and refresh the analytics cache, all in
    /// one transaction
    pub fn save(self, conn: &mut Conn) -> Result<Entry> {
        conn.transaction(|conn| self.to_resolved(conn)?.validate()?.save(conn))
    }

    pub fn to_resolved(self, conn: &mut Conn) -> Result<ResolvedNewEntry<'a>> {
        let profile = self.profile;
        let subcategory = SubCategory::find_by_slug(conn, profile.id, self.subcategory)?;
        let category = subcategory.fetch_category(conn)?;

        Ok(ResolvedNewEntry {
            profile,
            entry_date: self.entry_date,
            amount: self.amount,
            condition: self.condition,
            description: self.description,
            category,
            subcategory,
            beneficiary: self
                .beneficiary
                .map(|slug| Beneficiary::find_by_slug(conn, profile.id, slug))
                .transpose()?,
            client: self
                .client
                .map(|slug| Client::find_by_slug(conn, profile.id, slug))
                .transpose()?,
            cost_center: self
                .cost_center
                .map(|slug| {
                    Financial::find_by_slug(conn, profile.id, FinancialKind::CostCenter, slug)
                })
                .transpose()?,
            account: self
                .account
                .map(|slug| {
                    Financial::find_by_slug(conn, profile.id, FinancialKind::BankAccount, slug)
                })
                .transpose()?,
        })
    }
}

pub struct ResolvedNewEntry<'a> {
    pub profile: &'a Profile,
    pub entry_date: NaiveDate,
    pub amount: Decimal,
    pub condition: Condition,
    pub description: &'a str,
    pub category: Category,
    pub subcategory: SubCategory,
    pub beneficiary: Option<Beneficiary>,
    pub client: Option<Client>,
    pub cost_center: Option<Financial>,
    pub account: Option<Financial>,
}

impl<'a> ResolvedNewEntry<'a> {
    pub fn validate(self) -> Result<ValidatedNewEntry<'a>> {
        if self.amount < Decimal::ZERO {
            return Err(Error::Invalid(
                "entry.amount is a magnitude, the category kind carries the sign".to_owned(),
            ));
        }

        Ok(ValidatedNewEntry(self))
    }
}

pub struct ValidatedNewEntry<'a>(ResolvedNewEntry<'a>);

impl ValidatedNewEntry<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<Entry> {
        let new = self.0;
        let signed = new.category.kind.signed(new.amount);

        let position = sequencer::position(conn, new.profile.id, new.entry_date, None)?;
        let (sqn, monthly_balance, overall_balance) = match &position {
            Some(prev) => (
                prev.sqn + 1,
                if date::same_cycle(new.entry_date, prev.entry_date) {
                    prev.monthly_balance + signed
                } else {
                    signed
                },
                prev.overall_balance + signed,
            ),
            None => (1, signed, signed),
        };

        let entry: Entry = diesel::insert_into(entries::table)
            .values(InsertableEntry {
                profile_id: new.profile.id,
                entry_date: new.entry_date,
                amount: new.amount,
                monthly_balance,
                overall_balance,
                sqn,
                condition: new.condition,
                description: new.description,
                subcategory_id: new.subcategory.id,
                beneficiary_id: new.beneficiary.as_ref().map(|b| b.id),
                client_id: new.client.as_ref().map(|c| c.id),
                cost_center_id: new.cost_center.as_ref().map(|f| f.id),
                account_id: new.account.as_ref().map(|f| f.id),
            })
            .returning(Entry::as_returning())
            .get_result(conn)?;

        cascade::rebalance(
            conn,
            new.profile.id,
            &sequencer::Anchor {
                sqn,
                entry_date: new.entry_date,
                monthly_balance,
                overall_balance,
                entry_id: Some(entry.id),
            },
        )?;
        analytic::refresh(conn, new.profile.id, new.entry_date)?;

        Ok(entry)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = entries)]
pub struct InsertableEntry<'a> {
    pub profile_id: i64,
    pub entry_date: NaiveDate,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub amount: Decimal,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub monthly_balance: Decimal,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub overall_balance: Decimal,
    pub sqn: i32,
    pub condition: Condition,
    pub description: &'a str,
    pub subcategory_id: i64,
    pub beneficiary_id: Option<i64>,
    pub client_id: Option<i64>,
    pub cost_center_id: Option<i64>,
    pub account_id: Option<i64>,
}
