mod common;

use common::prelude::*;

#[test]
fn report_follows_the_ledger() -> Result<()> {
    let env = Env::with_profile()?;
    env.seed_classification()?;

    env.command()?
        .args([
            "entry",
            "add",
            "1002.03",
            "--date",
            "2022-01-05",
            "--subcategory",
            "consulting",
        ])
        .assert()
        .success();
    env.command()?
        .args([
            "entry", "add", "500", "--date", "2022-01-01", "--subcategory", "rent",
        ])
        .assert()
        .success();

    env.command()?
        .args(["report", "--month", "1", "--year", "2022"])
        .assert()
        .success()
        .stdout(
            str::contains("Revenue:  1002.030")
                .and(str::contains("Expenses: 500.000"))
                .and(str::contains("Balance:  502.030"))
                .and(str::contains("Overall:  502.030")),
        );

    Ok(())
}

#[test]
fn report_falls_back_to_the_last_cycle() -> Result<()> {
    let env = Env::with_profile()?;
    env.seed_classification()?;

    env.command()?
        .args([
            "entry", "add", "100", "--date", "2022-01-05", "--subcategory", "consulting",
        ])
        .assert()
        .success();

    env.command()?
        .args(["report", "--month", "3", "--year", "2022"])
        .assert()
        .success()
        .stdout(
            str::contains("showing the last available cycle")
                .and(str::contains("Cycle:    2022-01")),
        );

    Ok(())
}

#[test]
fn no_report_yet() -> Result<()> {
    let env = Env::with_profile()?;

    env.command()?
        .args(["report", "--month", "1", "--year", "2022"])
        .assert()
        .success()
        .stdout(str::contains("No balance report available yet."));

    Ok(())
}
