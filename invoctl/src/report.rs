use anyhow::Result;

use chrono::{offset::Local, Datelike};

use invo::date::Month;
use invo::prelude::*;

use crate::cli::ReportArgs;
use crate::config::Config;

pub fn run(config: &Config, args: &ReportArgs) -> Result<()> {
    let conn = &mut config.database()?;
    let profile = config.profile_or_default(conn)?;

    let today = Local::now().date_naive();
    let month = Month::calendar(
        args.year.unwrap_or(today.year()),
        args.month.unwrap_or(today.month()) as i32,
    );

    let analytic = match Analytic::for_cycle(conn, profile.id, month)? {
        Some(analytic) => analytic,
        None => match Analytic::latest_before(conn, profile.id, month)? {
            Some(analytic) => {
                println!(
                    "No report for {}-{:02}, showing the last available cycle.",
                    month.year, month.month
                );
                analytic
            }
            None => {
                println!("No balance report available yet.");
                return Ok(());
            }
        },
    };

    let report = analytic.parse()?;

    println!("Cycle:    {}", analytic.cycle.format("%Y-%m"));
    println!("Revenue:  {}", report.monthly.revenue);
    println!("Expenses: {}", report.monthly.expenses);
    println!("Balance:  {}", report.monthly.balance);
    println!("Overall:  {}", report.overall);

    Ok(())
}
