use anyhow::Result;
use assert_cmd::Command;
use assert_fs::TempDir;

pub mod prelude {
    pub use super::Env;
    pub use anyhow::Result;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;
    pub use predicates::str;
}

pub struct Env {
    pub conf_dir: TempDir,
    pub data_dir: TempDir,
}

impl Env {
    pub fn new() -> Result<Self> {
        Ok(Self {
            conf_dir: TempDir::new()?,
            data_dir: TempDir::new()?,
        })
    }

    /// Environment with a profile created and configured as the default
    pub fn with_profile() -> Result<Self> {
        let env = Self::new()?;

        env.command()?
            .args(["profile", "create", "constance"])
            .assert()
            .success();
        env.command()?
            .args(["profile", "default", "constance"])
            .assert()
            .success();

        Ok(env)
    }

    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("invoctl")?;
        cmd.arg("-C")
            .arg(self.conf_dir.path())
            .arg("-D")
            .arg(self.data_dir.path());
        Ok(cmd)
    }

    /// One income and one expense subcategory to post against
    pub fn seed_classification(&self) -> Result<()> {
        self.command()?
            .args(["category", "create", "Sales", "--kind", "income"])
            .assert()
            .success();
        self.command()?
            .args(["subcategory", "create", "sales", "Consulting"])
            .assert()
            .success();
        self.command()?
            .args(["category", "create", "Office", "--kind", "expense"])
            .assert()
            .success();
        self.command()?
            .args(["subcategory", "create", "office", "Rent"])
            .assert()
            .success();

        Ok(())
    }
}
