use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

use crate::result::ParseTypeError;

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};

/// Settlement state of an entry, informational only
///
/// A pending entry still participates in the running balances.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum Condition {
    #[default]
    Settled,
    Pending,
}

use Condition::*;

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Settled => f.write_str("Settled"),
            Pending => f.write_str("Pending"),
        }
    }
}

impl FromStr for Condition {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "settled" => Ok(Settled),
            "paid" => Ok(Settled),
            "pending" => Ok(Pending),
            "forecast" => Ok(Pending),
            _ => Err(ParseTypeError("Condition", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for Condition {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Condition {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}
