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

/// Opaque handle used to reference a label from the outside
///
/// Uniqueness is only enforced among active rows, so a deleted label frees
/// its slug for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a human readable name
    pub fn generate(source: &str) -> Slug {
        let mut slug = String::with_capacity(source.len());

        for c in source.chars() {
            if c.is_ascii_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }

        Slug(slug.trim_end_matches('-').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.write_str(&self.0)
    }
}

impl FromStr for Slug {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty()
            || !value
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ParseTypeError("Slug", value.to_string()));
        }

        Ok(Slug(value.to_string()))
    }
}

impl ToSql<Text, Sqlite> for Slug {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.0.clone());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Slug {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(Slug(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?))
    }
}
