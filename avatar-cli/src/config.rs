//! Stage configuration files
//!
//! Configuration is JSON; every field is optional and falls back to the
//! stage defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use avatar_motion::StageConfig;

/// Load a stage configuration, or the defaults when no path is given
pub fn load_stage_config(path: Option<&Path>) -> Result<StageConfig> {
    let Some(path) = path else {
        return Ok(StageConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config '{}'", path.display()))?;
    let config: StageConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config '{}'", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config '{}'", path.display()))?;

    log::debug!("Loaded stage config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatar_motion::GesturePreset;
    use std::io::Write;

    #[test]
    fn test_defaults_without_path() {
        assert_eq!(load_stage_config(None).unwrap(), StageConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "gesture": "wave", "click_replays_gesture": true, "intro": {{ "messages": ["Hi!"] }} }}"#
        )
        .unwrap();

        let config = load_stage_config(Some(file.path())).unwrap();
        assert_eq!(config.gesture, GesturePreset::Wave);
        assert!(config.click_replays_gesture);
        assert_eq!(config.intro.messages, vec!["Hi!".to_string()]);
        assert!((config.intro.interval_ms - 800.0).abs() < f64::EPSILON);
        assert!((config.avatar_scale - 1.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "avatar_scale": -1.0 }}"#).unwrap();
        assert!(load_stage_config(Some(file.path())).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "gesture": "moonwalk" }}"#).unwrap();
        assert!(load_stage_config(Some(file.path())).is_err());
    }
}
