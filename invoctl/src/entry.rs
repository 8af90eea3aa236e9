use std::borrow::Cow;

use anyhow::{anyhow, Result};
use chrono::{offset::Local, Datelike};

use invo::date::Month;
use invo::entry::{ChangeEntry, Condition, NewEntry, QueryEntry};
use invo::prelude::*;

use crate::cli::EntryCommands;
use crate::config::Config;

use tabled::{Table, Tabled};

#[derive(derive_more::From)]
struct EntryToDisplay(Entry, SubCategory, Category);

impl Tabled for EntryToDisplay {
    const LENGTH: usize = 8;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.id.to_string().into(),
            self.0.entry_date.to_string().into(),
            format!("{} / {}", self.2.name, self.1.name).into(),
            self.0.description.clone().into(),
            self.2.kind.signed(self.0.amount).to_string().into(),
            self.0.monthly_balance.to_string().into(),
            self.0.overall_balance.to_string().into(),
            self.0.condition.to_string().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "id".into(),
            "date".into(),
            "classification".into(),
            "description".into(),
            "amount".into(),
            "monthly".into(),
            "overall".into(),
            "condition".into(),
        ]
    }
}

pub fn run(config: &Config, command: &EntryCommands) -> Result<()> {
    let conn = &mut config.database()?;
    let profile = config.profile_or_default(conn)?;

    match command {
        EntryCommands::Add {
            amount,
            date,
            subcategory,
            beneficiary,
            client,
            cost_center,
            account,
            description,
            pending,
        } => {
            NewEntry {
                amount: *amount,
                condition: if *pending {
                    Condition::Pending
                } else {
                    Condition::Settled
                },
                description: description.as_str(),
                beneficiary: beneficiary.as_ref(),
                client: client.as_ref(),
                cost_center: cost_center.as_ref(),
                account: account.as_ref(),
                ..NewEntry::new(&profile, subcategory, *date)
            }
            .save(conn)?;

            println!("New entry added successfully.");
        }
        EntryCommands::Change {
            id,
            date,
            amount,
            subcategory,
            description,
            condition,
            beneficiary,
            no_beneficiary,
            client,
            no_client,
            cost_center,
            no_cost_center,
            account,
            no_account,
        } => {
            let entry = find(conn, &profile, *id)?;

            ChangeEntry {
                entry_date: *date,
                amount: *amount,
                condition: *condition,
                description: description.as_deref(),
                subcategory: subcategory.as_ref(),
                beneficiary: reference(beneficiary, *no_beneficiary),
                client: reference(client, *no_client),
                cost_center: reference(cost_center, *no_cost_center),
                account: reference(account, *no_account),
            }
            .save(conn, &entry)?;

            println!("Entry edited successfully.");
        }
        EntryCommands::Remove { id, confirm } => {
            if !confirm || !crate::utils::confirm()? {
                anyhow::bail!("operation requires confirmation");
            }

            let mut entry = find(conn, &profile, *id)?;
            entry.delete(conn)?;

            println!("Entry removed successfully.");
        }
        EntryCommands::List { month, year, page } => {
            let today = Local::now().date_naive();
            let query = QueryEntry {
                profile_id: profile.id,
                cycle: Some(Month::calendar(
                    year.unwrap_or(today.year()),
                    month.unwrap_or(today.month()) as i32,
                )),
                page: Some(*page),
                per_page: Some(config.page_limit()),
            };

            let entries = query
                .run(conn)?
                .into_iter()
                .map(EntryToDisplay::from)
                .collect::<Vec<_>>();

            println!("{}", Table::new(entries));
            println!("Page {} of {}", page, query.pages(conn)?.max(1));
        }
    }

    Ok(())
}

fn find(conn: &mut Conn, profile: &Profile, id: i64) -> Result<Entry> {
    match Entry::find(conn, id) {
        Ok(entry) if entry.profile_id == profile.id => Ok(entry),
        Ok(_) => Err(anyhow!("Entry not found: {}", id)),
        Err(e) if e.is_not_found() => Err(anyhow!("Entry not found: {}", id)),
        Err(e) => Err(e.into()),
    }
}

fn reference(slug: &Option<Slug>, clear: bool) -> Option<Option<&Slug>> {
    if clear {
        Some(None)
    } else {
        slug.as_ref().map(Some)
    }
}
