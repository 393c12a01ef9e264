use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::setter::{self, AssignmentReport, ControlOutcome, RunReport};
use crate::types::{EventSequence, FieldAssignment, Preset, ViewportSize};
use crate::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;

/// Runs inside the page. Arguments: field name, desired value, event sequence.
/// Returns one outcome per select named after the field, indexed among all
/// selects of the page so the numbering matches the offline model.
const APPLY_SCRIPT: &str = r#"
    const [field, value, sequence] = arguments;
    const fire = (el, type) => el.dispatchEvent(new Event(type, { bubbles: true }));
    const outcomes = [];
    Array.from(document.getElementsByTagName('select')).forEach((select, control) => {
        if (select.name !== field) return;
        const option = Array.from(select.options)
            .find(o => o.hasAttribute('value') && o.getAttribute('value') === value);
        if (!option) {
            console.error(`Option with value="${value}" not found in select element with name="${field}".`);
            outcomes.push({ outcome: 'option_not_found', control });
            return;
        }
        const previous = select.selectedIndex >= 0 ? select.options[select.selectedIndex].value : null;
        let notifications = 0;
        if (sequence === 'click-change-click') { fire(select, 'click'); notifications++; }
        option.selected = true;
        fire(select, 'change'); notifications++;
        if (sequence !== 'change') { fire(option, 'click'); notifications++; }
        outcomes.push({ outcome: 'selected', control, previous, notifications });
    });
    return outcomes;
"#;

const COUNT_CONTROLS_SCRIPT: &str = r#"
    const names = arguments[0];
    return Array.from(document.getElementsByTagName('select'))
        .filter(s => names.includes(s.name)).length;
"#;

/// Browser instance for WebDriver automation
pub struct Browser {
    client: Client,
    // Chrome refuses to share a user-data-dir, so one-off runs get a throwaway one
    _scratch_profile: Option<TempDir>,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Name of the WebDriver executable
    pub fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }

    /// Lowercase name stored in profile metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "firefox",
            BrowserType::Chrome => "chrome",
        }
    }
}

impl Browser {
    /// Create a new browser instance
    ///
    /// # Arguments
    /// * `browser_type` - Firefox or Chrome
    /// * `profile_path` - Optional persistent profile directory
    /// * `viewport` - Optional viewport dimensions
    /// * `headless` - Whether to run in headless mode
    pub async fn new(
        browser_type: BrowserType,
        profile_path: Option<PathBuf>,
        viewport: Option<ViewportSize>,
        headless: bool,
    ) -> Result<Self> {
        info!("Connecting to {:?} WebDriver", browser_type);

        // Ensure WebDriver is running (will auto-start if needed)
        let webdriver_url = GLOBAL_WEBDRIVER_MANAGER
            .ensure_driver(&browser_type)
            .await?;

        let mut scratch_profile = None;
        let mut caps = serde_json::Map::new();

        match browser_type {
            BrowserType::Firefox => {
                let mut args = Vec::new();
                if headless {
                    args.push("--headless".to_string());
                }
                if let Some(vp) = &viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }
                if let Some(path) = &profile_path {
                    args.push("-profile".to_string());
                    args.push(path.display().to_string());
                }
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
            BrowserType::Chrome => {
                let mut args = vec!["--no-sandbox".to_string()];
                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                if let Some(vp) = &viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }
                let user_data_dir = match &profile_path {
                    Some(path) => path.clone(),
                    None => {
                        let dir = tempfile::Builder::new()
                            .prefix("wishlist-presets-chrome-")
                            .tempdir()?;
                        let path = dir.path().to_path_buf();
                        scratch_profile = Some(dir);
                        path
                    }
                };
                args.push(format!("--user-data-dir={}", user_data_dir.display()));
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
        }

        debug!("Connecting to WebDriver at {}", webdriver_url);

        let client = match ClientBuilder::rustls()
            .capabilities(caps.clone())
            .connect(&webdriver_url)
            .await
        {
            Ok(client) => client,
            Err(e) => {
                let error_str = e.to_string();
                if !(error_str.contains("Session is already started")
                    || error_str.contains("session not created"))
                {
                    return Err(e).context("Failed to connect to WebDriver");
                }

                // A previous session is still holding the driver
                info!("WebDriver appears to be in a bad state, restarting it");
                GLOBAL_WEBDRIVER_MANAGER.kill_driver(&browser_type);
                tokio::time::sleep(Duration::from_millis(500)).await;

                let new_url = GLOBAL_WEBDRIVER_MANAGER
                    .ensure_driver(&browser_type)
                    .await
                    .context("Failed to restart WebDriver after recovery")?;

                ClientBuilder::rustls()
                    .capabilities(caps)
                    .connect(&new_url)
                    .await
                    .context("Failed to connect to WebDriver after restart")?
            }
        };

        if let Some(vp) = viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                // Best-effort: headless Firefox already got --width/--height
                debug!("Note: Could not set window size: {}", e);
            }
        }

        Ok(Browser {
            client,
            _scratch_profile: scratch_profile,
        })
    }

    /// Navigate and wait (up to 2s) for the document to finish loading
    pub async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.client
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;

        let wait_script = "return document.readyState === 'complete';";
        for _ in 0..20 {
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => break,
                _ => tokio::time::sleep(Duration::from_millis(100)).await,
            }
        }

        Ok(())
    }

    /// Poll until a select named after one of `fields` exists.
    ///
    /// Returns the number of matching controls. Running out of time is not an
    /// error: a page without the controls is a valid no-op.
    pub async fn wait_for_controls(&self, fields: &[&str], timeout: Duration) -> Result<usize> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let count = self
                .client
                .execute(COUNT_CONTROLS_SCRIPT, vec![json!(fields)])
                .await
                .context("Failed to query select controls")?
                .as_u64()
                .unwrap_or(0) as usize;

            if count > 0 {
                debug!("Found {} matching select control(s)", count);
                return Ok(count);
            }
            if tokio::time::Instant::now() >= deadline {
                warn!(
                    "No select control named {:?} appeared within {}s",
                    fields,
                    timeout.as_secs()
                );
                return Ok(0);
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }

    /// Apply one assignment inside the current page
    pub async fn apply_assignment(
        &self,
        assignment: &FieldAssignment,
        sequence: EventSequence,
    ) -> Result<AssignmentReport> {
        debug!("Applying {} with {:?}", assignment, sequence);

        let value = self
            .client
            .execute(
                APPLY_SCRIPT,
                vec![
                    json!(assignment.field),
                    json!(assignment.value),
                    json!(sequence.as_str()),
                ],
            )
            .await
            .with_context(|| format!("Failed to apply {}", assignment))?;

        let outcomes: Vec<ControlOutcome> = serde_json::from_value(value)
            .context("Unexpected result from the in-page option setter")?;

        let report = AssignmentReport::new(assignment, outcomes);
        setter::log_diagnostics(&report);
        Ok(report)
    }

    /// Apply every assignment of `preset` in order
    pub async fn apply_preset(&self, preset: &Preset, sequence: EventSequence) -> Result<RunReport> {
        let mut report = RunReport::default();
        for assignment in preset.assignments() {
            info!("Setting {}", assignment.field);
            report
                .assignments
                .push(self.apply_assignment(assignment, sequence).await?);
        }
        info!("Done!");
        Ok(report)
    }

    /// Run a script in the current page
    pub async fn execute(
        &self,
        script: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.client
            .execute(script, args)
            .await
            .context("Failed to execute script")
    }

    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "webdriver_test.rs"]
mod webdriver_test;
