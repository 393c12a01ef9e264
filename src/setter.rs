//! Forcing select controls into a desired state.
//!
//! [`apply`] is the single operation: every control named after the field gets
//! the option carrying the desired value selected, followed by the synthetic
//! events of the chosen [`EventSequence`]. A control without such an option is
//! left alone and reported as [`ControlOutcome::OptionNotFound`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info};

use crate::document::{Document, NotificationKind, NotificationTarget};
use crate::types::{EventSequence, FieldAssignment, Preset};

/// What happened to one matching control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ControlOutcome {
    /// The option was selected and notifications were dispatched
    Selected {
        /// Index of the control among all selects of the page
        control: usize,
        /// Value selected before the assignment
        previous: Option<String>,
        /// Number of notifications dispatched
        notifications: usize,
    },
    /// No option carries the desired value; the control is unchanged
    OptionNotFound { control: usize },
}

/// Result of applying one assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentReport {
    pub field: String,
    pub value: String,
    /// One entry per matching control, in document order
    pub controls: Vec<ControlOutcome>,
}

impl AssignmentReport {
    pub fn new(assignment: &FieldAssignment, controls: Vec<ControlOutcome>) -> Self {
        Self {
            field: assignment.field.clone(),
            value: assignment.value.clone(),
            controls,
        }
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = Diagnostic> + '_ {
        self.controls.iter().filter_map(|outcome| match outcome {
            ControlOutcome::OptionNotFound { control } => Some(Diagnostic {
                field: self.field.clone(),
                value: self.value.clone(),
                control: *control,
            }),
            ControlOutcome::Selected { .. } => None,
        })
    }

    pub fn updated(&self) -> usize {
        self.controls
            .iter()
            .filter(|o| matches!(o, ControlOutcome::Selected { .. }))
            .count()
    }

    pub fn notifications(&self) -> usize {
        self.controls
            .iter()
            .map(|o| match o {
                ControlOutcome::Selected { notifications, .. } => *notifications,
                ControlOutcome::OptionNotFound { .. } => 0,
            })
            .sum()
    }
}

/// Result of applying a whole preset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub assignments: Vec<AssignmentReport>,
}

impl RunReport {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.assignments
            .iter()
            .flat_map(|a| a.diagnostics())
            .collect()
    }

    pub fn has_diagnostics(&self) -> bool {
        self.assignments.iter().any(|a| a.diagnostics().next().is_some())
    }

    pub fn updated(&self) -> usize {
        self.assignments.iter().map(AssignmentReport::updated).sum()
    }

    pub fn notifications(&self) -> usize {
        self.assignments
            .iter()
            .map(AssignmentReport::notifications)
            .sum()
    }
}

/// A desired value that has no option under a control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub field: String,
    pub value: String,
    pub control: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Option with value=\"{}\" not found in select element with name=\"{}\"",
            self.value, self.field
        )
    }
}

/// Select `value` in every control named `field` and notify listeners
pub fn apply(
    document: &mut Document,
    field: &str,
    value: &str,
    sequence: EventSequence,
) -> AssignmentReport {
    let assignment = FieldAssignment::new(field, value);
    let mut outcomes = Vec::new();

    for control in document.controls_named(field) {
        let found = document.control(control).and_then(|c| c.find_option(value));

        let Some(option) = found else {
            outcomes.push(ControlOutcome::OptionNotFound { control });
            continue;
        };

        let previous = document.selected_value(control).map(str::to_string);
        let before = document.notifications().len();
        let on_control = NotificationTarget::Control { control };
        let on_option = NotificationTarget::Option { control, option };

        if sequence == EventSequence::ClickChangeClick {
            document.dispatch(NotificationKind::Click, on_control);
        }
        document.select(control, option);
        document.dispatch(NotificationKind::Change, on_control);
        if sequence != EventSequence::Change {
            document.dispatch(NotificationKind::Click, on_option);
        }

        outcomes.push(ControlOutcome::Selected {
            control,
            previous,
            notifications: document.notifications().len() - before,
        });
    }

    let report = AssignmentReport::new(&assignment, outcomes);
    log_diagnostics(&report);
    report
}

/// Apply every assignment of `preset` in order
pub fn apply_preset(document: &mut Document, preset: &Preset, sequence: EventSequence) -> RunReport {
    let mut report = RunReport::default();
    for assignment in preset.assignments() {
        info!("Setting {}", assignment.field);
        report.assignments.push(apply(
            document,
            &assignment.field,
            &assignment.value,
            sequence,
        ));
    }
    info!("Done!");
    report
}

/// Log one error line per missing option
pub fn log_diagnostics(report: &AssignmentReport) {
    for diagnostic in report.diagnostics() {
        error!("{}", diagnostic);
    }
}

#[cfg(test)]
#[path = "setter_test.rs"]
mod setter_test;
