use super::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

    let settings: Settings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))?;

    settings
        .validate()
        .with_context(|| format!("Invalid config: {}", path.as_ref().display()))?;

    Ok(settings)
}

pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Settings {
    if !path.as_ref().exists() {
        log::warn!(
            "Config file not found: {}, using defaults",
            path.as_ref().display()
        );
        return Settings::default();
    }

    match load_config(&path) {
        Ok(settings) => {
            log::info!("Loaded configuration from: {}", path.as_ref().display());
            settings
        }
        Err(e) => {
            log::warn!("Failed to load config ({:#}), using defaults", e);
            Settings::default()
        }
    }
}

pub fn write_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let content = toml::to_string_pretty(&Settings::default())
        .context("Failed to serialize default configuration")?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("mail-threat-engine-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_partial_file_uses_defaults_for_the_rest() {
        let path = temp_path("partial.toml");
        fs::write(&path, "[scoring]\nspam_score_weight = 5.5\n").unwrap();

        let settings = load_config(&path).unwrap();
        assert_eq!(settings.scoring.spam_score_weight, 5.5);
        assert_eq!(settings.scoring.phishing_score_weight, 15.0);
        assert_eq!(settings.logging.level, "info");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_generated_config_round_trips() {
        let path = temp_path("generated.toml");
        write_default_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), Settings::default());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_or_invalid_file_falls_back() {
        let missing = temp_path("missing.toml");
        assert_eq!(load_config_or_default(&missing), Settings::default());

        let invalid = temp_path("invalid.toml");
        fs::write(&invalid, "[scoring]\nphishing_score_weight = -3.0\n").unwrap();
        assert!(load_config(&invalid).is_err());
        assert_eq!(load_config_or_default(&invalid), Settings::default());
        fs::remove_file(&invalid).unwrap();
    }
}
