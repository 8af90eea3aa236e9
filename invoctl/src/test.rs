#![cfg(test)]

use anyhow::Result;
use assert_fs::TempDir;

pub mod prelude {
    pub use super::with_dirs;
    pub use anyhow::Result;
    pub use assert_fs::prelude::*;
    pub use pretty_assertions::{assert_eq, assert_ne};
}

/// Run a test with fresh config and data directories
pub fn with_dirs<F>(f: F) -> Result<()>
where
    F: FnOnce(&TempDir, &TempDir) -> Result<()>,
{
    let confd = TempDir::new()?;
    let datad = TempDir::new()?;

    temp_env::with_vars(
        [
            ("INVO_CONFIG", Some(confd.path().as_os_str())),
            ("INVO_DATA", Some(datad.path().as_os_str())),
        ],
        || f(&confd, &datad),
    )
}
