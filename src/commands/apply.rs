use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use super::utils::{self, PresetArgs};
use crate::profile::ProfileManager;
use crate::types::{EventSequence, OutputFormat, ViewportSize};
use crate::webdriver::{Browser, BrowserType};

/// Options of `wishlist-presets apply`
pub struct ApplyOptions {
    pub url: Option<String>,
    pub preset: PresetArgs,
    pub events: EventSequence,
    pub browser: String,
    pub profile: Option<String>,
    pub viewport: Option<String>,
    pub no_headless: bool,
    pub pause: bool,
    pub keep_open: bool,
    pub wait_secs: u64,
    pub format: OutputFormat,
}

pub async fn handle_apply(options: ApplyOptions) -> Result<()> {
    let preset = options.preset.resolve()?;
    let url = utils::resolve_target(options.url.as_deref())?;
    let browser_type = BrowserType::from_str(&options.browser)?;
    let viewport = options
        .viewport
        .as_deref()
        .map(ViewportSize::parse)
        .transpose()?;

    let profile_path = match &options.profile {
        Some(name) => {
            let manager = ProfileManager::new()?;
            if let Some(recorded) = manager.profile_browser(name)?
                && recorded != browser_type.as_str()
            {
                warn!(
                    "Profile '{}' was created for {}, using it with {}",
                    name,
                    recorded,
                    browser_type.as_str()
                );
            }
            Some(manager.get_profile_path(name)?)
        }
        None => None,
    };

    // Waiting for the operator only makes sense with a window to look at
    let headless = !(options.no_headless || options.pause || options.keep_open);

    info!("Applying {} assignment(s) on {}", preset.assignments().len(), url);
    let browser = Browser::new(browser_type, profile_path, viewport, headless).await?;

    let result = async {
        browser.goto(&url).await?;

        if options.pause {
            wait_for_enter("Log in or import your list, then press Enter to apply the filters")
                .await?;
        }

        browser
            .wait_for_controls(&preset.fields(), Duration::from_secs(options.wait_secs))
            .await?;

        let report = browser.apply_preset(&preset, options.events).await?;
        utils::print_report(&report, options.format)?;

        if options.keep_open {
            wait_for_enter("Filters applied. Press Enter to close the browser").await?;
        }

        Ok::<_, anyhow::Error>(report)
    }
    .await;

    if let Err(e) = browser.close().await {
        warn!("Failed to close browser cleanly: {}", e);
    }

    utils::check_diagnostics(&result?)
}

async fn wait_for_enter(prompt: &str) -> Result<()> {
    eprintln!("{}", prompt);
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read from stdin")?;
    Ok(())
}
