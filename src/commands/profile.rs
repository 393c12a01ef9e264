use anyhow::Result;
use clap::Subcommand;
use std::str::FromStr;

use crate::profile::ProfileManager;
use crate::types::OutputFormat;
use crate::webdriver::BrowserType;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Create a new profile
    Create {
        /// Profile name
        name: String,

        /// Browser type (firefox or chrome)
        #[arg(short, long, default_value = "firefox")]
        browser: String,
    },

    /// Delete a profile and its browser data
    Delete {
        /// Profile name
        name: String,
    },

    /// List all profiles
    List {
        /// Output format
        #[arg(short, long, default_value = "simple")]
        format: OutputFormat,
    },
}

pub async fn handle_profile(command: ProfileCommands) -> Result<()> {
    let manager = ProfileManager::new()?;

    match command {
        ProfileCommands::Create { name, browser } => {
            let browser_type = BrowserType::from_str(&browser)?;
            let path = manager.create_profile(&name, browser_type.as_str())?;
            println!("✓ Profile '{}' created at {}", name, path.display());
            println!(
                "Log in once with: wishlist-presets apply --profile {} --browser {} --pause",
                name,
                browser_type.as_str()
            );
        }
        ProfileCommands::Delete { name } => {
            manager.delete_profile(&name)?;
            println!("✓ Profile '{}' deleted", name);
        }
        ProfileCommands::List { format } => {
            let profiles = manager.list_profiles()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profiles)?),
                OutputFormat::Simple => {
                    if profiles.is_empty() {
                        println!("No profiles found");
                    }
                    for p in profiles {
                        println!(
                            "{} ({}) - last used {}",
                            p.name,
                            p.browser,
                            p.last_used.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
        }
    }
    Ok(())
}
