use std::fs;
use std::path::Path;

use access_firmware::AccessConfig;
use anyhow::{Context, Result};

/// Load the device configuration, falling back to defaults without a file.
pub fn load(path: Option<&Path>) -> Result<AccessConfig> {
    let Some(path) = path else {
        return Ok(AccessConfig::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from '{}'", path.display()))?;
    let config: AccessConfig = serde_json::from_str(&raw)
        .with_context(|| format!("invalid configuration file '{}'", path.display()))?;
    config.validate()?;
    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use access_firmware::KeyId;

    #[test]
    fn missing_path_yields_defaults() {
        assert_eq!(load(None).unwrap(), AccessConfig::default());
    }

    #[test]
    fn file_overrides_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        fs::write(&path, r##"{ "enroll_key": "#", "settle_ms": 0 }"##).unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.enroll_key, KeyId::HASH);
        assert_eq!(config.settle_ms, 0);
        assert_eq!(config.outcome_ms, AccessConfig::default().outcome_ms);
    }

    #[test]
    fn ambiguous_layout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        fs::write(&path, r#"{ "repeat_key": "C", "finish_key": "C" }"#).unwrap();

        let error = load(Some(&path)).unwrap_err();
        assert!(error.to_string().contains("'C'"));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let error = load(Some(&path)).unwrap_err();
        assert!(error.to_string().contains("absent.json"));
    }
}
