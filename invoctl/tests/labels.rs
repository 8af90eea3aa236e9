mod common;

use common::prelude::*;

#[test]
fn category_lifecycle() -> Result<()> {
    let env = Env::with_profile()?;

    env.command()?
        .args(["category", "create", "Office expenses", "--kind", "expense"])
        .assert()
        .success()
        .stdout(str::contains("office-expenses"));

    env.command()?
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(str::contains("Office expenses").and(str::contains("Expense")));

    // same active name again collides
    env.command()?
        .args(["category", "create", "Office expenses", "--kind", "expense"])
        .assert()
        .failure();

    env.command()?
        .args(["category", "delete", "office-expenses", "--confirm"])
        .write_stdin("yes\n")
        .assert()
        .success();

    env.command()?
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(str::contains("Office expenses").not());

    Ok(())
}

#[test]
fn beneficiaries_are_grouped() -> Result<()> {
    let env = Env::with_profile()?;

    env.command()?
        .args(["beneficiary", "add-group", "Suppliers"])
        .assert()
        .success()
        .stdout(str::contains("suppliers"));

    env.command()?
        .args(["beneficiary", "create", "Acme Paper", "--group", "suppliers"])
        .assert()
        .success();

    env.command()?
        .args(["beneficiary", "list"])
        .assert()
        .success()
        .stdout(str::contains("Acme Paper").and(str::contains("Suppliers")));

    Ok(())
}

#[test]
fn financials_split_by_kind() -> Result<()> {
    let env = Env::with_profile()?;

    env.command()?
        .args(["financial", "create", "Workshop", "--kind", "cost-center"])
        .assert()
        .success();
    env.command()?
        .args([
            "financial",
            "create",
            "Sparrow Bank",
            "--kind",
            "bank-account",
            "--branch",
            "0042",
            "--number",
            "1234-5",
        ])
        .assert()
        .success();

    env.command()?
        .args(["financial", "list", "--kind", "cost-center"])
        .assert()
        .success()
        .stdout(str::contains("Workshop").and(str::contains("Sparrow Bank").not()));

    env.command()?
        .args(["financial", "list"])
        .assert()
        .success()
        .stdout(str::contains("Workshop").and(str::contains("Sparrow Bank")));

    Ok(())
}

#[test]
fn labels_are_profile_scoped() -> Result<()> {
    let env = Env::with_profile()?;

    env.command()?
        .args(["profile", "create", "rupert"])
        .assert()
        .success();

    env.command()?
        .args(["client", "create", "Brightside Ltd", "--city", "Porto"])
        .assert()
        .success();

    env.command()?
        .args(["--profile", "rupert", "client", "list"])
        .assert()
        .success()
        .stdout(str::contains("Brightside").not());

    env.command()?
        .args(["client", "list"])
        .assert()
        .success()
        .stdout(str::contains("Brightside Ltd").and(str::contains("Porto")));

    Ok(())
}
