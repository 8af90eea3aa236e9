pub use crate::schema::financials;
use crate::prelude::*;
use crate::profile::Profile;
use crate::result::ParseTypeError;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{offset::Utc, NaiveDateTime};
use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    prelude::*,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};

/// The two mutually exclusive posting targets an entry can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum FinancialKind {
    CostCenter,
    BankAccount,
}

impl FinancialKind {
    fn model(&self) -> &'static str {
        match self {
            FinancialKind::CostCenter => "cost center",
            FinancialKind::BankAccount => "bank account",
        }
    }
}

impl Display for FinancialKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FinancialKind::CostCenter => f.write_str("CostCenter"),
            FinancialKind::BankAccount => f.write_str("BankAccount"),
        }
    }
}

impl FromStr for FinancialKind {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "costcenter" | "cost-center" => Ok(FinancialKind::CostCenter),
            "bankaccount" | "bank-account" => Ok(FinancialKind::BankAccount),
            _ => Err(ParseTypeError("FinancialKind", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for FinancialKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for FinancialKind {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = financials)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Financial {
    pub id: i64,
    pub profile_id: i64,
    pub slug: Slug,
    pub kind: FinancialKind,
    pub label: String,
    pub branch: Option<String>,
    pub number: Option<String>,
    pub description: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Financial {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        financials::table
            .find(id)
            .select(Financial::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Financial", None))
    }

    /// Resolve a slug to the active financial of the expected kind
    ///
    /// A cost center slug does not resolve as a bank account, and vice
    /// versa.
    pub fn find_by_slug(
        conn: &mut Conn,
        profile_id: i64,
        kind: FinancialKind,
        slug: &Slug,
    ) -> Result<Self> {
        financials::table
            .filter(financials::profile_id.eq(profile_id))
            .filter(financials::kind.eq(kind))
            .filter(financials::slug.eq(slug))
            .filter(financials::deleted_at.is_null())
            .select(Financial::as_select())
            .first(conn)
            .map_err(|_| Error::Resolution(kind.model()))
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        if !self.is_active() {
            return Err(Error::Invalid("financial is already deleted".to_owned()));
        }

        let now = Utc::now().naive_utc();
        diesel::update(&*self)
            .set(financials::deleted_at.eq(now))
            .execute(conn)?;
        self.deleted_at = Some(now);

        Ok(())
    }
}

pub struct NewFinancial<'a> {
    pub profile: &'a Profile,
    pub kind: FinancialKind,
    pub label: &'a str,
    pub branch: Option<&'a str>,
    pub number: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl<'a> NewFinancial<'a> {
    pub fn cost_center(profile: &'a Profile, label: &'a str) -> Self {
        Self {
            profile,
            kind: FinancialKind::CostCenter,
            label,
            branch: None,
            number: None,
            description: None,
        }
    }

    pub fn bank_account(profile: &'a Profile, label: &'a str) -> Self {
        Self {
            kind: FinancialKind::BankAccount,
            ..Self::cost_center(profile, label)
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<Financial> {
        if self.label.trim().is_empty() {
            return Err(Error::Invalid("financial.label cannot be empty".to_owned()));
        }
        if self.kind == FinancialKind::CostCenter
            && (self.branch.is_some() || self.number.is_some())
        {
            return Err(Error::Invalid(
                "a cost center does not carry bank coordinates".to_owned(),
            ));
        }

        Ok(diesel::insert_into(financials::table)
            .values((
                financials::profile_id.eq(self.profile.id),
                financials::slug.eq(Slug::generate(self.label)),
                financials::kind.eq(self.kind),
                financials::label.eq(self.label),
                financials::branch.eq(self.branch),
                financials::number.eq(self.number),
                financials::description.eq(self.description),
            ))
            .returning(Financial::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Default)]
pub struct QueryFinancial {
    pub profile_id: i64,
    pub kind: Option<FinancialKind>,
    pub count: Option<i64>,
}

impl QueryFinancial {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<Financial>> {
        let mut query = financials::table
            .select(Financial::as_select())
            .order(financials::label.asc())
            .into_boxed()
            .filter(financials::profile_id.eq(self.profile_id))
            .filter(financials::deleted_at.is_null());

        if let Some(kind) = self.kind {
            query = query.filter(financials::kind.eq(kind));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query.load(conn)?)
    }
}
