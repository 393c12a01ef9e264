use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::utils::{self, PresetArgs};
use crate::document::{Document, Notification, SelectControl};
use crate::setter::{self, RunReport};
use crate::types::{EventSequence, OutputFormat};

/// Dry run result: what would change and which events would fire
#[derive(Serialize)]
struct PlanOutput<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    notifications: &'a [Notification],
    controls: &'a [SelectControl],
}

pub async fn handle_plan(
    html: PathBuf,
    preset: PresetArgs,
    events: EventSequence,
    format: OutputFormat,
) -> Result<()> {
    let preset = preset.resolve()?;
    let contents = tokio::fs::read_to_string(&html)
        .await
        .with_context(|| format!("Failed to read {}", html.display()))?;

    let mut document = Document::parse_html(&contents)?;
    info!(
        "Loaded {} select control(s) from {}",
        document.controls().len(),
        html.display()
    );

    let report = setter::apply_preset(&mut document, &preset, events);

    match format {
        OutputFormat::Json => {
            let output = PlanOutput {
                report: &report,
                notifications: document.notifications(),
                controls: document.controls(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Simple => utils::print_report(&report, format)?,
    }

    utils::check_diagnostics(&report)
}
