use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::PresetsError;
use crate::setter::{ControlOutcome, RunReport};
use crate::types::{FieldAssignment, OutputFormat, Preset, PresetFileError};

/// Wishlist page opened when no URL is given
pub const DEFAULT_URL: &str = "https://www.cardtrader.com/wishlists/new";

/// Flags selecting which assignments are applied
#[derive(Args, Debug, Clone, Default)]
pub struct PresetArgs {
    /// Assignment FIELD=VALUE, repeatable; overrides the preset for the same field
    #[arg(short = 's', long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// JSON preset file (list of {"field", "value"} or a field -> value map)
    #[arg(long, value_name = "FILE")]
    pub preset: Option<PathBuf>,

    /// Start from an empty preset instead of the wishlist defaults
    #[arg(long)]
    pub no_defaults: bool,
}

impl PresetArgs {
    /// Defaults (or the preset file), then every `--set` in order
    pub fn resolve(&self) -> Result<Preset> {
        let mut preset = match &self.preset {
            Some(path) => Preset::from_file(path)?,
            None if self.no_defaults => Preset::default(),
            None => Preset::wishlist(),
        };

        for raw in &self.set {
            preset.set(raw.parse::<FieldAssignment>()?);
        }

        if preset.is_empty() {
            return Err(PresetFileError::Empty.into());
        }

        debug!("Effective preset: {:?}", preset);
        Ok(preset)
    }
}

/// Turn the CLI target into a URL; existing local files become `file://` URLs
pub fn resolve_target(target: Option<&str>) -> Result<String> {
    let target = target.unwrap_or(DEFAULT_URL);

    if let Ok(url) = url::Url::parse(target)
        && url.has_host()
    {
        return Ok(url.to_string());
    }

    let path = Path::new(target);
    if path.exists() {
        let absolute = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;
        let url = url::Url::from_file_path(&absolute)
            .map_err(|_| anyhow::anyhow!("Cannot convert {} to a URL", absolute.display()))?;
        return Ok(url.to_string());
    }

    let url = url::Url::parse(target).with_context(|| format!("Invalid URL: {}", target))?;
    Ok(url.to_string())
}

/// Print a run report in the requested format
pub fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Simple => {
            for assignment in &report.assignments {
                if assignment.controls.is_empty() {
                    println!(
                        "{}=\"{}\": no select control found",
                        assignment.field, assignment.value
                    );
                    continue;
                }
                for outcome in &assignment.controls {
                    match outcome {
                        ControlOutcome::Selected {
                            control,
                            previous,
                            notifications,
                        } => println!(
                            "{}=\"{}\": control #{} updated (was \"{}\", {} event(s))",
                            assignment.field,
                            assignment.value,
                            control,
                            previous.as_deref().unwrap_or_default(),
                            notifications
                        ),
                        ControlOutcome::OptionNotFound { control } => println!(
                            "{}=\"{}\": control #{} has no such option",
                            assignment.field, assignment.value, control
                        ),
                    }
                }
            }
            println!(
                "{} control(s) updated, {} event(s) dispatched",
                report.updated(),
                report.notifications()
            );
        }
    }
    Ok(())
}

/// Fail the run (exit code 2) when any option was missing
pub fn check_diagnostics(report: &RunReport) -> Result<()> {
    let count = report.diagnostics().len();
    if count > 0 {
        return Err(PresetsError::OptionsNotFound { count }.into());
    }
    Ok(())
}
