//! Application configuration.

use crate::consts::cli_consts::{API_URL_ENV_VAR, CONFIG_DIR, CONFIG_FILE};
use crate::environment::Environment;
use crate::mood::Emotion;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Origin of the player service, e.g. "http://127.0.0.1:5001".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Mood selected when the dashboard opens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mood: Option<Emotion>,
}

impl Config {
    /// Create Config with the given values.
    pub fn new(api_url: Option<String>, default_mood: Option<Emotion>) -> Self {
        Config {
            api_url,
            default_mood,
        }
    }

    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the configuration if the file exists, the default otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Remove the configuration file, if any.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Resolve which service to talk to.
    ///
    /// Precedence: command-line flag, then the environment variable, then this file,
    /// then the local default.
    pub fn resolve_environment(
        &self,
        flag: Option<&str>,
        env_var: Option<&str>,
    ) -> Result<Environment, String> {
        let chosen = flag
            .or(env_var.filter(|v| !v.trim().is_empty()))
            .or(self.api_url.as_deref());
        match chosen {
            Some(value) => value.parse(),
            None => Ok(Environment::Local),
        }
    }
}

/// Path of the configuration file under the user's home directory.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "Could not determine home directory")
    })?;
    Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Value of the API URL override variable, if set.
pub fn api_url_from_env() -> Option<String> {
    std::env::var(API_URL_ENV_VAR).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::new(
            Some("http://127.0.0.1:5001".to_string()),
            Some(Emotion::Happy),
        );
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let config = Config::default();
        let result = config.save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Saving a configuration should overwrite an existing file.
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config1 = Config::new(Some("http://a:1".to_string()), None);
        config1.save(&path).unwrap();

        let config2 = Config::new(None, Some(Emotion::Sad));
        config2.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config2, loaded_config);
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    // A missing file is not an error, and clearing it twice is fine.
    fn test_missing_file_defaults_and_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());

        Config::default().save(&path).unwrap();
        Config::clear(&path).unwrap();
        assert!(!path.exists());
        Config::clear(&path).unwrap();
    }

    #[test]
    // The flag wins over the variable, which wins over the file.
    fn test_resolve_environment_precedence() {
        let config = Config::new(Some("http://from-file:1".to_string()), None);

        let env = config
            .resolve_environment(Some("http://from-flag:1"), Some("http://from-env:1"))
            .unwrap();
        assert_eq!(env.api_url(), "http://from-flag:1");

        let env = config
            .resolve_environment(None, Some("http://from-env:1"))
            .unwrap();
        assert_eq!(env.api_url(), "http://from-env:1");

        let env = config.resolve_environment(None, Some("  ")).unwrap();
        assert_eq!(env.api_url(), "http://from-file:1");

        let env = Config::default().resolve_environment(None, None).unwrap();
        assert_eq!(env, Environment::Local);

        assert!(config.resolve_environment(Some("nonsense"), None).is_err());
    }
}
