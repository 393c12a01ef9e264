use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// Human-readable simple format
    Simple,
}

/// Order in which synthetic events are fired around a selection change.
///
/// Page listeners differ in what they react to, so the sequence is selectable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EventSequence {
    /// Select, then `change` on the control
    Change,
    /// Select, then `change` on the control and `click` on the option
    #[default]
    ChangeClick,
    /// `click` on the control, select, `change` on the control, `click` on the option
    ClickChangeClick,
}

impl EventSequence {
    /// Name passed to the in-page script
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSequence::Change => "change",
            EventSequence::ChangeClick => "change-click",
            EventSequence::ClickChangeClick => "click-change-click",
        }
    }
}

/// Error produced when a `field=value` pair cannot be parsed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentParseError {
    #[error("Invalid assignment '{0}'. Use FIELD=VALUE (e.g. language=en)")]
    MissingSeparator(String),
    #[error("Invalid assignment '{0}': field name must not be empty")]
    EmptyField(String),
}

/// Error produced when a preset file cannot be loaded
#[derive(Debug, Error)]
pub enum PresetFileError {
    #[error("Failed to read preset file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid preset file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Invalid preset file {path}: field name must not be empty")]
    EmptyField { path: String },
    #[error("Nothing to apply: the preset is empty. Add assignments with --set")]
    Empty,
}

/// A desired value for every select control carrying the given name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssignment {
    /// Value of the control's `name` attribute
    pub field: String,
    /// Value of the option to select (may be empty)
    pub value: String,
}

impl FieldAssignment {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl std::str::FromStr for FieldAssignment {
    type Err = AssignmentParseError;

    /// Parse from `field=value`, splitting on the first `=`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| AssignmentParseError::MissingSeparator(s.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(AssignmentParseError::EmptyField(s.to_string()));
        }
        Ok(FieldAssignment::new(field, value))
    }
}

impl std::fmt::Display for FieldAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}=\"{}\"", self.field, self.value)
    }
}

/// Preset file contents, either a list of assignments or a field -> value map
#[derive(Deserialize)]
#[serde(untagged)]
enum PresetFile {
    List(Vec<FieldAssignment>),
    Map(serde_json::Map<String, serde_json::Value>),
}

/// Ordered list of assignments applied in one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preset {
    assignments: Vec<FieldAssignment>,
}

impl Preset {
    pub fn new(assignments: Vec<FieldAssignment>) -> Self {
        Self { assignments }
    }

    /// The wishlist filters: any expansion, English, Played, any foil
    pub fn wishlist() -> Self {
        Self::new(vec![
            FieldAssignment::new("expansion", ""),
            FieldAssignment::new("language", "en"),
            FieldAssignment::new("condition", "Played"),
            FieldAssignment::new("foil", ""),
        ])
    }

    /// Load a preset from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, PresetFileError> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| PresetFileError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&contents).map_err(|err| match err {
            PresetFileError::Parse { source, .. } => PresetFileError::Parse {
                path: display.clone(),
                source,
            },
            PresetFileError::EmptyField { .. } => PresetFileError::EmptyField { path: display },
            other => other,
        })
    }

    /// Parse a preset from JSON text
    ///
    /// Accepts `[{"field": "language", "value": "en"}]` or `{"language": "en"}`.
    /// Map entries keep their order in the text.
    pub fn from_json(json: &str) -> Result<Self, PresetFileError> {
        let parsed: PresetFile =
            serde_json::from_str(json).map_err(|source| PresetFileError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;

        let assignments = match parsed {
            PresetFile::List(list) => list,
            PresetFile::Map(map) => map
                .into_iter()
                .map(|(field, value)| {
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    FieldAssignment::new(field, value)
                })
                .collect(),
        };

        if assignments.iter().any(|a| a.field.trim().is_empty()) {
            return Err(PresetFileError::EmptyField {
                path: "<inline>".to_string(),
            });
        }

        Ok(Self::new(assignments))
    }

    /// Set `field` to `value`, replacing an existing entry in place or appending
    pub fn set(&mut self, assignment: FieldAssignment) {
        match self
            .assignments
            .iter_mut()
            .find(|a| a.field == assignment.field)
        {
            Some(existing) => existing.value = assignment.value,
            None => self.assignments.push(assignment),
        }
    }

    pub fn assignments(&self) -> &[FieldAssignment] {
        &self.assignments
    }

    /// Field names in application order
    pub fn fields(&self) -> Vec<&str> {
        self.assignments.iter().map(|a| a.field.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1920x1080")
    pub fn parse(s: &str) -> Result<Self> {
        let Some((width, height)) = s.split_once('x') else {
            anyhow::bail!("Invalid viewport format. Use WIDTHxHEIGHT (e.g., 1920x1080)");
        };

        let width = width
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width in viewport size"))?;
        let height = height
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height in viewport size"))?;

        Ok(ViewportSize { width, height })
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
