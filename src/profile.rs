//! Persistent browser profiles, so the marketplace login survives between runs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const METADATA_FILE: &str = "metadata.json";

/// Metadata about a browser profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Profile name
    pub name: String,
    /// Browser type (firefox, chrome)
    pub browser: String,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// When the profile was last used
    pub last_used: DateTime<Utc>,
}

/// Manages named browser profiles under `~/.wishlist-presets/profiles`
pub struct ProfileManager {
    profiles_dir: PathBuf,
}

impl ProfileManager {
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Unable to determine home directory")?;
        Self::with_dir(home_dir.join(".wishlist-presets").join("profiles"))
    }

    /// Use `profiles_dir` as the profile root, creating it if needed
    pub fn with_dir(profiles_dir: impl Into<PathBuf>) -> Result<Self> {
        let profiles_dir = profiles_dir.into();
        fs::create_dir_all(&profiles_dir).with_context(|| {
            format!("Failed to create profiles directory {}", profiles_dir.display())
        })?;
        Ok(ProfileManager { profiles_dir })
    }

    pub fn create_profile(&self, name: &str, browser: &str) -> Result<PathBuf> {
        validate_name(name)?;
        let profile_path = self.profiles_dir.join(name);

        if profile_path.exists() {
            anyhow::bail!("Profile '{}' already exists", name);
        }

        fs::create_dir_all(&profile_path)?;

        let now = Utc::now();
        write_metadata(
            &profile_path,
            &ProfileMetadata {
                name: name.to_string(),
                browser: browser.to_string(),
                created_at: now,
                last_used: now,
            },
        )?;

        info!("Created profile '{}' for {}", name, browser);
        Ok(profile_path)
    }

    pub fn delete_profile(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let profile_path = self.profiles_dir.join(name);

        if !profile_path.exists() {
            anyhow::bail!("Profile '{}' does not exist", name);
        }

        fs::remove_dir_all(&profile_path)?;
        info!("Deleted profile '{}'", name);
        Ok(())
    }

    /// All profiles, most recently used first
    pub fn list_profiles(&self) -> Result<Vec<ProfileMetadata>> {
        let mut profiles = Vec::new();

        for entry in fs::read_dir(&self.profiles_dir)? {
            let path = entry?.path();
            let metadata_path = path.join(METADATA_FILE);
            if path.is_dir() && metadata_path.exists() {
                match read_metadata(&path) {
                    Ok(metadata) => profiles.push(metadata),
                    Err(e) => debug!("Skipping profile at {}: {}", path.display(), e),
                }
            }
        }

        profiles.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        Ok(profiles)
    }

    /// Directory of an existing profile; bumps its `last_used` timestamp
    pub fn get_profile_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        let profile_path = self.profiles_dir.join(name);

        if !profile_path.exists() {
            anyhow::bail!(
                "Profile '{}' does not exist. Create it with: wishlist-presets profile create {}",
                name,
                name
            );
        }

        if profile_path.join(METADATA_FILE).exists() {
            let mut metadata = read_metadata(&profile_path)?;
            metadata.last_used = Utc::now();
            write_metadata(&profile_path, &metadata)?;
        }

        Ok(profile_path)
    }

    /// Browser recorded for a profile, if it has metadata
    pub fn profile_browser(&self, name: &str) -> Result<Option<String>> {
        validate_name(name)?;
        let profile_path = self.profiles_dir.join(name);
        if !profile_path.join(METADATA_FILE).exists() {
            return Ok(None);
        }
        Ok(Some(read_metadata(&profile_path)?.browser))
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        anyhow::bail!("Invalid profile name '{}'", name);
    }
    Ok(())
}

fn read_metadata(profile_path: &Path) -> Result<ProfileMetadata> {
    let json = fs::read_to_string(profile_path.join(METADATA_FILE))?;
    Ok(serde_json::from_str(&json)?)
}

fn write_metadata(profile_path: &Path, metadata: &ProfileMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(profile_path.join(METADATA_FILE), json)?;
    Ok(())
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;
