//! # wishlist-presets
#![allow(clippy::uninlined_format_args)]
//!
//! Pre-sets the filter dropdowns (expansion, language, condition, foil) of a card
//! marketplace wishlist page, so the page's own optimizer starts from the right
//! filters.
//!
//! Every `<select>` whose `name` equals a field gets the `<option>` carrying the
//! desired value selected, followed by bubbling `change` and `click` events so
//! the page's listeners pick the change up. A missing option is reported and
//! the control left alone.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Apply the default wishlist preset (expansion="", language=en, condition=Played, foil="")
//! wishlist-presets apply "https://www.cardtrader.com/wishlists/123"
//!
//! # Log in first, then keep the window open to press Optimize
//! wishlist-presets profile create cardtrader
//! wishlist-presets apply --profile cardtrader --pause --keep-open
//!
//! # Override single fields
//! wishlist-presets apply --set condition="Moderately Played" --set foil=Foil
//!
//! # Only fire `change`, no `click`
//! wishlist-presets apply --events change
//!
//! # Dry run against a saved page
//! wishlist-presets plan saved_wishlist.html --format simple
//! ```
//!
//! ## Library Usage
//!
//! ```
//! use wishlist_presets::{Document, EventSequence, SelectControl, setter};
//!
//! let mut page = Document::new().with_control(
//!     SelectControl::new("language").option("fr", "French").option("en", "English"),
//! );
//!
//! let report = setter::apply(&mut page, "language", "en", EventSequence::default());
//! assert_eq!(report.updated(), 1);
//! assert_eq!(page.selected_value(0), Some("en"));
//! ```

/// CLI command handlers
pub mod commands;

/// In-memory page model
pub mod document;

/// Error type with exit codes
pub mod errors;

/// Profile management for browser sessions
pub mod profile;

/// Selecting options and reporting missing ones
pub mod setter;

/// Assignments, presets and CLI value types
pub mod types;

/// WebDriver browser control
pub mod webdriver;

/// Automatic WebDriver process management
pub mod webdriver_manager;

pub use document::{
    Document, Notification, NotificationKind, NotificationTarget, OptionEntry, SelectControl,
};
pub use profile::ProfileManager;
pub use setter::{AssignmentReport, ControlOutcome, Diagnostic, RunReport};
pub use types::{EventSequence, FieldAssignment, OutputFormat, Preset, ViewportSize};
pub use webdriver::{Browser, BrowserType};
