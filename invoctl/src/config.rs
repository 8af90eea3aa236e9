use std::fs::create_dir;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use toml::{Table, Value};

use invo::prelude::*;
use invo::profile::Profile;

use crate::cli::{Cli, Commands};

#[derive(Debug)]
pub struct Config {
    pub dir: PathBuf,
    pub data_dir: PathBuf,
    cli: Cli,
    table: Table,
}

impl Config {
    pub fn try_parse() -> Result<Self> {
        Self::try_parse_from(std::env::args_os())
    }

    pub fn try_parse_from<I, T>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        use clap::Parser;

        let cli = Cli::try_parse_from(iter)?;

        let dir = cli.config.clone().unwrap_or_else(config_home);
        let table = match std::fs::read_to_string(dir.join("config.toml")) {
            Ok(content) => content.parse::<Table>()?,
            Err(_) => Table::new(),
        };

        let data_dir = cli.data.clone().unwrap_or_else(|| {
            table
                .get("data_dir")
                .and_then(Value::as_str)
                .map(PathBuf::from)
                .unwrap_or_else(data_home)
        });

        if !data_dir.is_dir() {
            return Err(anyhow!(
                "Data directory is not a dir: {}",
                data_dir.display()
            ));
        }

        Ok(Config {
            dir,
            data_dir,
            cli,
            table,
        })
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.cli.verbose.log_level_filter()
    }

    pub fn command(&self) -> Option<&Commands> {
        self.cli.command.as_ref()
    }

    pub fn profile_name(&self) -> Option<&str> {
        self.cli.profile.as_deref()
    }

    /// The profile named on the command line, or the configured default
    pub fn profile_or_default(&self, conn: &mut Conn) -> Result<Profile> {
        if let Some(name) = self.profile_name() {
            match Profile::find_by_name(conn, name) {
                Ok(profile) => Ok(profile),
                Err(e) if e.is_not_found() => Err(anyhow!("Profile not found: {}", name)),
                Err(e) => Err(e.into()),
            }
        } else if let Some(name) = self.get("default_profile")? {
            match Profile::find_by_name(conn, &name) {
                Ok(profile) => Ok(profile),
                Err(e) if e.is_not_found() => {
                    self.reset("default_profile")?;
                    Err(anyhow!("The default profile no longer exists: {}", name))
                }
                Err(e) => Err(e.into()),
            }
        } else {
            Err(anyhow!(
                "No profile selected. Use --profile or set a default one"
            ))
        }
    }

    /// Number of entries per listing page
    ///
    /// Read from $INVO_PAGE_LIMIT, then from the configuration file, with
    /// the library default as a fallback.
    pub fn page_limit(&self) -> i64 {
        if let Ok(value) = std::env::var("INVO_PAGE_LIMIT") {
            if let Ok(limit) = value.parse::<i64>() {
                if limit > 0 {
                    return limit;
                }
            }
        }

        self.table
            .get("page_limit")
            .and_then(Value::as_integer)
            .filter(|limit| *limit > 0)
            .unwrap_or(invo::entry::DEFAULT_PAGE_LIMIT)
    }

    pub fn database_path(&self) -> PathBuf {
        let db_filename = if let Some(db_table) = self.table.get("db").and_then(Value::as_table) {
            db_table
                .get("filename")
                .and_then(Value::as_str)
                .unwrap_or("db.invo")
        } else {
            "db.invo"
        };

        self.data_dir.join(db_filename)
    }

    pub fn database(&self) -> Result<Database> {
        let mut conn = Database::open(self.database_path())?;
        conn.setup()?;
        Ok(conn)
    }

    pub fn kvdir(&self) -> Result<PathBuf> {
        let dir = self.dir.join("key_value_store");

        if !dir.is_dir() {
            std::fs::create_dir_all(&dir)?;
        }

        Ok(dir)
    }

    pub fn path(&self, key: &str) -> Result<PathBuf> {
        let kvdir = self.kvdir()?;
        let path = kvdir.join(key);

        if let Some(parent) = path.parent() {
            if !parent.is_dir() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(path)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;

        match path.exists() {
            true => Ok(Some(std::fs::read_to_string(self.path(key)?)?)),
            false => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path(key)?, value)?;
        Ok(())
    }

    pub fn reset(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;

        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn config_home() -> PathBuf {
    match std::env::var("INVO_CONFIG") {
        Ok(val) if !val.is_empty() => PathBuf::from(val),
        _ => {
            let path = xdg::BaseDirectories::with_prefix("invo")
                .unwrap()
                .get_config_home();
            if !path.exists() {
                create_dir(&path).unwrap();
            }
            path
        }
    }
}

fn data_home() -> PathBuf {
    match std::env::var("INVO_DATA") {
        Ok(val) if !val.is_empty() => PathBuf::from(val),
        _ => {
            let path = xdg::BaseDirectories::with_prefix("invo")
                .unwrap()
                .get_data_home();
            if !path.exists() {
                create_dir(&path).unwrap();
            }
            path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, *};

    #[test]
    fn parse() -> Result<()> {
        with_dirs(|confd, datad| {
            let mut config = Config::try_parse_from(["arg0"])?;

            assert_eq!(config.dir, confd.path());
            assert_eq!(config.data_dir, datad.path());

            config = Config::try_parse_from([
                "arg0",
                "--config",
                datad.child("bar").path().to_str().unwrap(),
            ])?;
            assert_eq!(config.dir, datad.child("bar").path());

            let _ = std::fs::create_dir(datad.child("bar").path());
            config = Config::try_parse_from([
                "arg0",
                "-D",
                datad.child("bar").path().to_str().unwrap(),
            ])?;
            assert_eq!(config.data_dir, datad.child("bar").path());

            Ok(())
        })
    }

    #[test]
    fn page_limit() -> Result<()> {
        with_dirs(|confd, _datad| {
            let config = Config::try_parse_from(["arg0"])?;

            temp_env::with_var("INVO_PAGE_LIMIT", None::<&str>, || {
                assert_eq!(invo::entry::DEFAULT_PAGE_LIMIT, config.page_limit());
            });

            temp_env::with_var("INVO_PAGE_LIMIT", Some("10"), || {
                assert_eq!(10, config.page_limit());
            });

            temp_env::with_var("INVO_PAGE_LIMIT", Some("-3"), || {
                assert_eq!(invo::entry::DEFAULT_PAGE_LIMIT, config.page_limit());
            });

            confd.child("config.toml").write_str("page_limit = 50")?;
            let config = Config::try_parse_from(["arg0"])?;
            temp_env::with_var("INVO_PAGE_LIMIT", None::<&str>, || {
                assert_eq!(50, config.page_limit());
            });

            Ok(())
        })
    }

    #[test]
    fn config_home_with_var() {
        temp_env::with_var("INVO_CONFIG", Some("./"), || {
            assert_eq!(PathBuf::from("./"), config_home());
        });
    }

    #[test]
    fn data_home_with_var() {
        temp_env::with_var("INVO_DATA", Some("./"), || {
            assert_eq!(PathBuf::from("./"), data_home());
        });
    }
}
