use super::*;
use anyhow::Context;

#[test]
fn test_exit_codes() {
    assert_eq!(PresetsError::OptionsNotFound { count: 1 }.exit_code(), 2);
    assert_eq!(PresetsError::InvalidPreset("x".into()).exit_code(), 3);
    assert_eq!(PresetsError::WebDriverFailed("x".into()).exit_code(), 4);
    assert_eq!(PresetsError::Timeout("x".into()).exit_code(), 5);
    assert_eq!(PresetsError::Other(anyhow::anyhow!("x")).exit_code(), 1);
}

#[test]
fn test_options_not_found_survives_anyhow() {
    let err: anyhow::Error = PresetsError::OptionsNotFound { count: 3 }.into();
    let converted = PresetsError::from(err);
    assert!(matches!(converted, PresetsError::OptionsNotFound { count: 3 }));
    assert_eq!(
        converted.to_string(),
        "3 select control(s) had no option with the desired value"
    );
}

#[test]
fn test_parse_errors_map_to_invalid_preset() {
    let err = "language"
        .parse::<crate::types::FieldAssignment>()
        .map_err(anyhow::Error::from)
        .context("Failed to read --set")
        .unwrap_err();
    let converted = PresetsError::from(err);
    assert_eq!(converted.exit_code(), 3);
    assert!(converted.to_string().contains("FIELD=VALUE"));
}

#[test]
fn test_driver_messages_map_to_webdriver_failed() {
    let err = anyhow::anyhow!("geckodriver not found in PATH");
    assert_eq!(PresetsError::from(err).exit_code(), 4);

    let err = anyhow::anyhow!("request timed out");
    assert_eq!(PresetsError::from(err).exit_code(), 5);

    let err = anyhow::anyhow!("Profile 'x' does not exist");
    assert_eq!(PresetsError::from(err).exit_code(), 1);
}
