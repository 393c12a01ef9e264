#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wishlist_presets::commands;
use wishlist_presets::commands::apply::ApplyOptions;
use wishlist_presets::commands::profile::ProfileCommands;
use wishlist_presets::commands::utils::PresetArgs;
use wishlist_presets::errors::PresetsError;
use wishlist_presets::types::{EventSequence, OutputFormat};
use wishlist_presets::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;

const EXIT_SUCCESS: i32 = 0;

#[derive(Parser)]
#[command(name = "wishlist-presets")]
#[command(about = "Pre-set the filter dropdowns of a wishlist page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the wishlist page in a browser and apply the preset
    Apply {
        /// Page URL or local HTML file (defaults to the new-wishlist page)
        url: Option<String>,

        #[command(flatten)]
        preset: PresetArgs,

        /// Events fired around each selection
        #[arg(long, default_value = "change-click")]
        events: EventSequence,

        /// Browser to use
        #[arg(short, long, default_value = "firefox")]
        browser: String,

        /// Persistent profile to use (keeps the marketplace login)
        #[arg(short, long)]
        profile: Option<String>,

        /// Set viewport size (WIDTHxHEIGHT, e.g., 1920x1080)
        #[arg(long)]
        viewport: Option<String>,

        /// Run browser in visible mode (disables headless)
        #[arg(long = "no-headless")]
        no_headless: bool,

        /// Wait for Enter after loading the page, before applying
        #[arg(long)]
        pause: bool,

        /// Wait for Enter after applying, before closing the browser
        #[arg(long)]
        keep_open: bool,

        /// Seconds to wait for the select controls to appear
        #[arg(long, default_value = "10")]
        wait_secs: u64,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Dry-run the preset against a saved HTML page
    Plan {
        /// HTML file to load
        html: PathBuf,

        #[command(flatten)]
        preset: PresetArgs,

        /// Events fired around each selection
        #[arg(long, default_value = "change-click")]
        events: EventSequence,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Show the effective preset
    Preset {
        #[command(flatten)]
        preset: PresetArgs,

        /// Output format
        #[arg(short, long, default_value = "simple")]
        format: OutputFormat,
    },

    /// Manage persistent browser profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Always clean up WebDriver processes before exiting
    GLOBAL_WEBDRIVER_MANAGER.stop_all();

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            let presets_err: PresetsError = err.into();

            // The report (if any) is already on stdout; a missing option is not worth a second JSON blob
            if !matches!(presets_err, PresetsError::OptionsNotFound { .. }) {
                let error_json = json!({
                    "error": true,
                    "message": presets_err.to_string(),
                    "exit_code": presets_err.exit_code()
                });
                println!(
                    "{}",
                    serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
                );
            }

            eprintln!("Error: {}", presets_err);
            std::process::exit(presets_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wishlist_presets=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            url,
            preset,
            events,
            browser,
            profile,
            viewport,
            no_headless,
            pause,
            keep_open,
            wait_secs,
            format,
        } => {
            commands::apply::handle_apply(ApplyOptions {
                url,
                preset,
                events,
                browser,
                profile,
                viewport,
                no_headless,
                pause,
                keep_open,
                wait_secs,
                format,
            })
            .await?
        }

        Commands::Plan {
            html,
            preset,
            events,
            format,
        } => commands::plan::handle_plan(html, preset, events, format).await?,

        Commands::Preset { preset, format } => {
            commands::preset::handle_preset(preset, format).await?
        }

        Commands::Profile { command } => commands::profile::handle_profile(command).await?,
    }

    Ok(())
}
