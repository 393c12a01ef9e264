use super::*;

fn manager() -> (tempfile::TempDir, ProfileManager) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let manager = ProfileManager::with_dir(dir.path().join("profiles")).unwrap();
    (dir, manager)
}

#[test]
fn test_create_and_list() {
    let (_dir, manager) = manager();

    let path = manager.create_profile("cardtrader", "firefox").unwrap();
    assert!(path.join("metadata.json").exists());

    let profiles = manager.list_profiles().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].name, "cardtrader");
    assert_eq!(profiles[0].browser, "firefox");
}

#[test]
fn test_create_twice_fails() {
    let (_dir, manager) = manager();
    manager.create_profile("dup", "chrome").unwrap();
    assert!(manager.create_profile("dup", "chrome").is_err());
}

#[test]
fn test_get_profile_path_bumps_last_used() {
    let (_dir, manager) = manager();
    manager.create_profile("older", "firefox").unwrap();
    manager.create_profile("newer", "firefox").unwrap();

    std::thread::sleep(std::time::Duration::from_millis(10));
    manager.get_profile_path("older").unwrap();

    let names: Vec<String> = manager
        .list_profiles()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["older", "newer"]);
}

#[test]
fn test_missing_profile() {
    let (_dir, manager) = manager();
    let err = manager.get_profile_path("ghost").unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(manager.delete_profile("ghost").is_err());
    assert_eq!(manager.profile_browser("ghost").unwrap(), None);
}

#[test]
fn test_delete_profile() {
    let (_dir, manager) = manager();
    let path = manager.create_profile("gone", "chrome").unwrap();
    assert_eq!(
        manager.profile_browser("gone").unwrap().as_deref(),
        Some("chrome")
    );

    manager.delete_profile("gone").unwrap();
    assert!(!path.exists());
    assert!(manager.list_profiles().unwrap().is_empty());
}

#[test]
fn test_rejects_path_names() {
    let (_dir, manager) = manager();
    assert!(manager.create_profile("../escape", "firefox").is_err());
    assert!(manager.create_profile("", "firefox").is_err());
}
