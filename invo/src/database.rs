use std::path::Path;

use crate::result::{Error, Result};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub type Conn = SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(derive_more::Deref, derive_more::DerefMut)]
pub struct Database(Conn);

impl Database {
    pub fn open<T: AsRef<Path>>(path: T) -> Result<Database> {
        let path = path.as_ref().display().to_string();
        Ok(Database(SqliteConnection::establish(&path)?))
    }

    pub fn memory() -> Result<Database> {
        Ok(Database(SqliteConnection::establish(":memory:")?))
    }

    pub fn setup(&mut self) -> Result<()> {
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut self.0)?;
        self.0
            .run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(Error::GenericError)
    }
}
