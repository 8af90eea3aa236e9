use anyhow::Result;

mod cli;
mod config;
mod utils;

mod entry;
mod labels;
mod profile;
mod report;

#[cfg(test)]
pub mod test;

use cli::Commands;
use config::Config;

fn main() -> Result<()> {
    let config = Config::try_parse()?;

    env_logger::Builder::new()
        .filter_level(config.log_level_filter())
        .init();

    if let Some(command) = config.command() {
        match command {
            Commands::Profile { command } => profile::run(&config, command)?,
            Commands::Entry { command } => entry::run(&config, command)?,
            Commands::Category { command } => labels::category(&config, command)?,
            Commands::Subcategory { command } => labels::subcategory(&config, command)?,
            Commands::Beneficiary { command } => labels::beneficiary(&config, command)?,
            Commands::Client { command } => labels::client(&config, command)?,
            Commands::Financial { command } => labels::financial(&config, command)?,
            Commands::Report(args) => report::run(&config, args)?,
        }
    }

    Ok(())
}
