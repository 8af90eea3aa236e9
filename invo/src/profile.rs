pub use crate::schema::profiles;
use crate::prelude::*;

use diesel::prelude::*;

/// The owner of a ledger
///
/// Registration, passwords and sessions live outside of this crate; callers
/// provide the profile they act on behalf of and it is trusted as-is.
#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Profile {
    pub id: i64,
    pub name: String,
}

impl Profile {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        profiles::table
            .find(id)
            .select(Profile::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Profile", None))
    }

    pub fn find_by_name(conn: &mut Conn, name: &str) -> Result<Self> {
        profiles::table
            .filter(profiles::name.eq(name))
            .select(Profile::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Profile", Some("name")))
    }

    pub fn all(conn: &mut Conn) -> Result<Vec<Self>> {
        Ok(profiles::table
            .order(profiles::name.asc())
            .select(Profile::as_select())
            .load(conn)?)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile<'a> {
    pub name: &'a str,
}

impl NewProfile<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<Profile> {
        if self.name.trim().is_empty() {
            return Err(Error::Invalid("profile.name cannot be empty".to_owned()));
        }

        Ok(diesel::insert_into(profiles::table)
            .values(self)
            .returning(Profile::as_returning())
            .get_result(conn)?)
    }
}
