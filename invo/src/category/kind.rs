use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

use crate::result::ParseTypeError;
use crate::Decimal;

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};

/// Determines the sign an entry amount contributes to the running balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn is_income(&self) -> bool {
        self == &CategoryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self == &CategoryKind::Expense
    }

    /// Apply the kind's sign to an amount magnitude
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            CategoryKind::Income => amount,
            CategoryKind::Expense => -amount,
        }
    }
}

use CategoryKind::*;

impl Display for CategoryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Income => f.write_str("Income"),
            Expense => f.write_str("Expense"),
        }
    }
}

impl FromStr for CategoryKind {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "income" => Ok(Income),
            "revenue" => Ok(Income),
            "expense" => Ok(Expense),
            _ => Err(ParseTypeError("CategoryKind", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for CategoryKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for CategoryKind {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_str() -> Result<()> {
        assert_eq!(Income, "Income".parse::<CategoryKind>()?);
        assert_eq!(Income, "revenue".parse::<CategoryKind>()?);
        assert_eq!(Expense, "expense".parse::<CategoryKind>()?);
        assert!("debit".parse::<CategoryKind>().is_err());

        Ok(())
    }

    #[test]
    fn signed() {
        let amount = Decimal::new(1500, 2);

        assert_eq!(amount, Income.signed(amount));
        assert_eq!(-amount, Expense.signed(amount));
    }
}
