//! In-memory page model: select controls, their options and the notifications
//! dispatched to them.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One `<option>` of a select control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    /// The `value` attribute; options without one are never matched
    pub value: Option<String>,
    /// Visible text
    pub label: String,
}

impl OptionEntry {
    pub fn effective_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.label)
    }
}

/// A `<select>` control identified by its `name` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectControl {
    pub name: String,
    pub options: Vec<OptionEntry>,
    /// Index into `options`; `None` only when there are no options
    pub selected: Option<usize>,
}

impl SelectControl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            selected: None,
        }
    }

    /// Append an option. The first option becomes the default selection.
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(OptionEntry {
            value: Some(value.into()),
            label: label.into(),
        });
        self.select_first()
    }

    /// Append an option that has text but no `value` attribute
    pub fn text_option(mut self, label: impl Into<String>) -> Self {
        self.options.push(OptionEntry {
            value: None,
            label: label.into(),
        });
        self.select_first()
    }

    fn select_first(mut self) -> Self {
        if self.selected.is_none() {
            self.selected = Some(0);
        }
        self
    }

    /// Select the first option with `value`, if any
    pub fn with_selected(mut self, value: &str) -> Self {
        if let Some(index) = self.find_option(value) {
            self.selected = Some(index);
        }
        self
    }

    /// Index of the first option whose `value` attribute equals `value`
    pub fn find_option(&self, value: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.value.as_deref() == Some(value))
    }

    /// Value of the selected option as the page reads it (text when the
    /// attribute is missing)
    pub fn selected_value(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(OptionEntry::effective_value)
    }
}

/// Kind of synthetic event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Change,
    Click,
}

/// Element an event was dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "lowercase")]
pub enum NotificationTarget {
    Control { control: usize },
    Option { control: usize, option: usize },
}

/// A synthetic event as observed by page listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    #[serde(flatten)]
    pub target: NotificationTarget,
    pub bubbles: bool,
}

/// The select controls of a page, in document order
#[derive(Debug, Clone, Default)]
pub struct Document {
    controls: Vec<SelectControl>,
    notifications: Vec<Notification>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a saved HTML page
    pub fn parse_html(html: &str) -> Result<Self> {
        let page = Html::parse_document(html);
        let select = parse_selector("select")?;
        let option = parse_selector("option")?;

        let mut document = Document::new();
        for element in page.select(&select) {
            let name = element.value().attr("name").unwrap_or_default();
            let mut control = SelectControl::new(name);
            let mut preselected = None;

            for (index, entry) in element.select(&option).enumerate() {
                let label = collapse_whitespace(&entry_text(&entry));
                if preselected.is_none() && entry.value().attr("selected").is_some() {
                    preselected = Some(index);
                }
                control = match entry.value().attr("value") {
                    Some(value) => control.option(value, label),
                    None => control.text_option(label),
                };
            }

            if preselected.is_some() {
                control.selected = preselected;
            }

            debug!(
                "Parsed select '{}' with {} option(s)",
                control.name,
                control.options.len()
            );
            document.push_control(control);
        }

        Ok(document)
    }

    /// Add a control and return its index
    pub fn push_control(&mut self, control: SelectControl) -> usize {
        self.controls.push(control);
        self.controls.len() - 1
    }

    pub fn with_control(mut self, control: SelectControl) -> Self {
        self.push_control(control);
        self
    }

    pub fn controls(&self) -> &[SelectControl] {
        &self.controls
    }

    pub fn control(&self, index: usize) -> Option<&SelectControl> {
        self.controls.get(index)
    }

    /// Indices of every control whose name equals `name`
    pub fn controls_named(&self, name: &str) -> Vec<usize> {
        self.controls
            .iter()
            .enumerate()
            .filter(|(_, c)| c.name == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Selected value of the control at `index`
    pub fn selected_value(&self, index: usize) -> Option<&str> {
        self.control(index).and_then(SelectControl::selected_value)
    }

    pub(crate) fn select(&mut self, control: usize, option: usize) {
        if let Some(c) = self.controls.get_mut(control) {
            c.selected = Some(option);
        }
    }

    pub(crate) fn dispatch(&mut self, kind: NotificationKind, target: NotificationTarget) {
        self.notifications.push(Notification {
            kind,
            target,
            bubbles: true,
        });
    }

    /// Every notification dispatched so far, in order
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector '{}': {}", css, e))
}

fn entry_text(entry: &ElementRef<'_>) -> String {
    entry.text().collect::<String>()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;
