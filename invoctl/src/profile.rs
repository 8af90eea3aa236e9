use anyhow::Result;

use invo::profile::{NewProfile, Profile};

use crate::cli::ProfileCommands;
use crate::config::Config;

pub fn run(config: &Config, command: &ProfileCommands) -> Result<()> {
    let conn = &mut config.database()?;

    match command {
        ProfileCommands::List {} => {
            for profile in Profile::all(conn)? {
                println!("{} | {}", profile.id, profile.name);
            }
        }
        ProfileCommands::Create { name } => {
            let profile = NewProfile { name }.save(conn)?;
            println!("Profile created: {}", profile.name);
        }
        ProfileCommands::Default { name, reset } => {
            if *reset {
                config.reset("default_profile")?;
            } else if let Some(name) = name {
                // make sure it exists before recording it
                Profile::find_by_name(conn, name)?;
                config.set("default_profile", name)?;
            } else if let Some(name) = config.get("default_profile")? {
                println!("{}", name);
            } else {
                println!("No default profile");
            }
        }
    }

    Ok(())
}
