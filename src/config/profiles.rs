use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Serialize, Deserialize};

/// Contents of a profiles file: `{"profiles": ["dev", "prod"]}`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProfileList {
    pub profiles: Vec<String>,
}

/// Read profile names from a JSON profiles file.
///
/// Blank names are dropped and duplicates are removed, keeping first-seen order.
pub fn load_profiles_json(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read profiles file: {}", path.display()))?;

    let list: ProfileList = serde_json::from_str(&content)
        .context(format!("Failed to parse profiles file: {}", path.display()))?;

    let mut profiles: Vec<String> = Vec::with_capacity(list.profiles.len());
    for profile in list.profiles {
        let profile = profile.trim().to_string();
        if !profile.is_empty() && !profiles.contains(&profile) {
            profiles.push(profile);
        }
    }

    debug!("Loaded {} profiles from {}", profiles.len(), path.display());
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_profiles() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"profiles": ["dev", "prod", " dev ", ""]}}"#).unwrap();

        let profiles = load_profiles_json(file.path()).unwrap();
        assert_eq!(profiles, vec!["dev", "prod"]);
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"accounts": ["dev"]}}"#).unwrap();

        assert!(load_profiles_json(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_profiles_json(Path::new("/nonexistent/profiles.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read profiles file"));
    }
}
