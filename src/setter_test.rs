use super::*;
use crate::document::{Notification, SelectControl};
use pretty_assertions::assert_eq;

fn language_page() -> Document {
    Document::new().with_control(
        SelectControl::new("language")
            .option("en", "English")
            .option("fr", "French")
            .with_selected("fr"),
    )
}

fn change(control: usize) -> Notification {
    Notification {
        kind: NotificationKind::Change,
        target: NotificationTarget::Control { control },
        bubbles: true,
    }
}

fn click_option(control: usize, option: usize) -> Notification {
    Notification {
        kind: NotificationKind::Click,
        target: NotificationTarget::Option { control, option },
        bubbles: true,
    }
}

fn click_control(control: usize) -> Notification {
    Notification {
        kind: NotificationKind::Click,
        target: NotificationTarget::Control { control },
        bubbles: true,
    }
}

#[test]
fn test_selects_language_and_notifies_once_each() {
    let mut page = language_page();

    let report = apply(&mut page, "language", "en", EventSequence::ChangeClick);

    assert_eq!(page.selected_value(0), Some("en"));
    assert_eq!(page.notifications(), &[change(0), click_option(0, 0)]);
    assert_eq!(
        report.controls,
        vec![ControlOutcome::Selected {
            control: 0,
            previous: Some("fr".to_string()),
            notifications: 2,
        }]
    );
    assert_eq!(report.diagnostics().count(), 0);
}

#[test]
fn test_empty_value_selects_any_entry() {
    let mut page = Document::new().with_control(
        SelectControl::new("foil")
            .option("", "Any")
            .option("Foil", "Foil")
            .with_selected("Foil"),
    );

    apply(&mut page, "foil", "", EventSequence::default());

    assert_eq!(page.selected_value(0), Some(""));
}

#[test]
fn test_missing_option_leaves_control_untouched() {
    let mut page = Document::new().with_control(
        SelectControl::new("condition")
            .option("Played", "Played")
            .option("Moderately Played", "Moderately Played")
            .with_selected("Moderately Played"),
    );

    let report = apply(&mut page, "condition", "Mint", EventSequence::default());

    assert_eq!(page.selected_value(0), Some("Moderately Played"));
    assert!(page.notifications().is_empty());

    let diagnostics: Vec<Diagnostic> = report.diagnostics().collect();
    assert_eq!(diagnostics.len(), 1);
    let message = diagnostics[0].to_string();
    assert!(message.contains("condition"));
    assert!(message.contains("Mint"));
    assert_eq!(
        message,
        r#"Option with value="Mint" not found in select element with name="condition""#
    );
}

#[test]
fn test_option_text_is_not_a_value() {
    let mut page = Document::new()
        .with_control(
            SelectControl::new("foil")
                .text_option("")
                .option("Foil", "Foil")
                .with_selected("Foil"),
        )
        .with_control(
            SelectControl::new("language")
                .text_option("en")
                .option("it", "Italian")
                .with_selected("it"),
        );

    let foil = apply(&mut page, "foil", "", EventSequence::default());
    let language = apply(&mut page, "language", "en", EventSequence::default());

    assert_eq!(foil.controls, vec![ControlOutcome::OptionNotFound { control: 0 }]);
    assert_eq!(
        language.controls,
        vec![ControlOutcome::OptionNotFound { control: 1 }]
    );
    assert_eq!(page.selected_value(0), Some("Foil"));
    assert_eq!(page.selected_value(1), Some("it"));
    assert!(page.notifications().is_empty());
}

#[test]
fn test_previous_of_value_less_option_is_its_text() {
    let mut page = Document::new().with_control(
        SelectControl::new("condition")
            .text_option("Near Mint")
            .option("Played", "Played"),
    );

    let report = apply(&mut page, "condition", "Played", EventSequence::Change);

    assert_eq!(
        report.controls,
        vec![ControlOutcome::Selected {
            control: 0,
            previous: Some("Near Mint".to_string()),
            notifications: 1,
        }]
    );
}

#[test]
fn test_no_matching_control_is_silent() {
    let mut page = language_page();

    let report = apply(&mut page, "expansion", "", EventSequence::default());

    assert!(report.controls.is_empty());
    assert_eq!(report.diagnostics().count(), 0);
    assert!(page.notifications().is_empty());
    assert_eq!(page.selected_value(0), Some("fr"));
}

#[test]
fn test_apply_twice_is_idempotent_but_renotifies() {
    let mut page = language_page();

    apply(&mut page, "language", "en", EventSequence::default());
    let after_first = page.controls().to_vec();
    let second = apply(&mut page, "language", "en", EventSequence::default());

    assert_eq!(page.controls(), after_first.as_slice());
    assert_eq!(page.notifications().len(), 4);
    assert_eq!(
        second.controls,
        vec![ControlOutcome::Selected {
            control: 0,
            previous: Some("en".to_string()),
            notifications: 2,
        }]
    );
}

#[test]
fn test_each_matching_control_handled_independently() {
    let mut page = Document::new()
        .with_control(
            SelectControl::new("condition")
                .option("Near Mint", "Near Mint")
                .option("Played", "Played"),
        )
        .with_control(SelectControl::new("language").option("en", "English"))
        .with_control(SelectControl::new("condition").option("Near Mint", "Near Mint"))
        .with_control(
            SelectControl::new("condition")
                .option("Played", "Played")
                .option("Poor", "Poor")
                .with_selected("Poor"),
        );

    let report = apply(&mut page, "condition", "Played", EventSequence::default());

    assert_eq!(page.selected_value(0), Some("Played"));
    assert_eq!(page.selected_value(2), Some("Near Mint"));
    assert_eq!(page.selected_value(3), Some("Played"));
    assert_eq!(report.updated(), 2);
    assert_eq!(
        report.diagnostics().map(|d| d.control).collect::<Vec<_>>(),
        vec![2]
    );
    assert_eq!(
        page.notifications(),
        &[change(0), click_option(0, 1), change(3), click_option(3, 0)]
    );
}

#[test]
fn test_duplicate_values_pick_first_option() {
    let mut page = Document::new().with_control(
        SelectControl::new("expansion")
            .option("m21", "Core 2021")
            .option("", "Any")
            .option("", "Any (again)"),
    );

    apply(&mut page, "expansion", "", EventSequence::default());

    assert_eq!(page.control(0).unwrap().selected, Some(1));
}

#[test]
fn test_event_sequences() {
    let mut page = language_page();
    apply(&mut page, "language", "en", EventSequence::Change);
    assert_eq!(page.take_notifications(), vec![change(0)]);

    apply(&mut page, "language", "en", EventSequence::ClickChangeClick);
    assert_eq!(
        page.take_notifications(),
        vec![click_control(0), change(0), click_option(0, 0)]
    );
}

#[test]
fn test_apply_preset_collects_every_assignment() {
    let mut page = Document::new()
        .with_control(
            SelectControl::new("expansion")
                .option("khm", "Kaldheim")
                .option("", "Any")
                .with_selected("khm"),
        )
        .with_control(
            SelectControl::new("language")
                .option("it", "Italian")
                .option("en", "English"),
        )
        .with_control(SelectControl::new("condition").option("Near Mint", "Near Mint"))
        .with_control(SelectControl::new("foil").option("", "Any").option("true", "Foil"));

    let report = apply_preset(&mut page, &Preset::wishlist(), EventSequence::default());

    assert_eq!(report.assignments.len(), 4);
    assert_eq!(page.selected_value(0), Some(""));
    assert_eq!(page.selected_value(1), Some("en"));
    assert_eq!(page.selected_value(2), Some("Near Mint"));
    assert_eq!(page.selected_value(3), Some(""));
    assert_eq!(report.updated(), 3);
    assert_eq!(report.notifications(), 6);
    assert!(report.has_diagnostics());
    assert_eq!(
        report.diagnostics(),
        vec![Diagnostic {
            field: "condition".to_string(),
            value: "Played".to_string(),
            control: 2,
        }]
    );
}

#[test]
fn test_control_outcome_json_shape() {
    let outcome = ControlOutcome::Selected {
        control: 3,
        previous: None,
        notifications: 2,
    };
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({
            "outcome": "selected",
            "control": 3,
            "previous": null,
            "notifications": 2
        })
    );

    // Same shape the in-page script returns
    let parsed: ControlOutcome =
        serde_json::from_value(serde_json::json!({ "outcome": "option_not_found", "control": 1 }))
            .unwrap();
    assert_eq!(parsed, ControlOutcome::OptionNotFound { control: 1 });
}
