// Common test utilities and fixtures

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Mock wishlist pages for testing
pub mod fixtures {
    /// Two wishlist rows, each with the four filter dropdowns
    pub const WISHLIST_PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
    <head><title>Wishlist</title></head>
    <body>
        <table>
          <tr>
            <td>Lightning Bolt</td>
            <td><select name="expansion"><option value="lea" selected>Alpha</option><option value="">Any</option></select></td>
            <td><select name="language"><option value="it">Italian</option><option value="en">English</option></select></td>
            <td><select name="condition"><option value="Near Mint">Near Mint</option><option value="Played">Played</option></select></td>
            <td><select name="foil"><option value="">Any</option><option value="true" selected>Foil</option></select></td>
          </tr>
          <tr>
            <td>Counterspell</td>
            <td><select name="expansion"><option value="">Any</option></select></td>
            <td><select name="language"><option value="en">English</option></select></td>
            <td><select name="condition"><option value="Played">Played</option></select></td>
            <td><select name="foil"><option value="">Any</option></select></td>
          </tr>
        </table>
        <script>
            window.__events = [];
            document.addEventListener('change', e => window.__events.push('change:' + e.target.name));
            document.addEventListener('click', e => window.__events.push('click:' + e.target.tagName.toLowerCase()));
        </script>
    </body>
    </html>
    "#;

    /// A page whose condition dropdown lacks "Played"
    pub const MISSING_CONDITION_PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
    <body>
        <select name="language"><option value="en">English</option></select>
        <select name="condition"><option value="Mint">Mint</option></select>
    </body>
    </html>
    "#;

    /// Options identified only by their text, never by a `value` attribute
    pub const VALUELESS_OPTIONS_PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
    <body>
        <select name="foil"><option></option><option value="Foil" selected>Foil</option></select>
        <select name="language"><option>en</option><option value="it">Italian</option></select>
    </body>
    </html>
    "#;
}

/// Helper to create a test HTML file
pub fn create_test_html(content: &str) -> PathBuf {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("wishlist.html");
    std::fs::write(&file_path, content).expect("Failed to write test HTML");

    // Leak the temp_dir to keep it alive for the test
    std::mem::forget(temp_dir);
    file_path
}

/// Helper to run wishlist-presets CLI commands
pub fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_wishlist-presets"))
        .args(args)
        .env("RUST_LOG", "wishlist_presets=info")
        .output()
        .expect("Failed to execute wishlist-presets command")
}

/// Browser used by the live tests (TEST_BROWSER=chrome to switch)
#[allow(dead_code)]
pub fn get_test_browser() -> String {
    std::env::var("TEST_BROWSER").unwrap_or_else(|_| "firefox".to_string())
}
