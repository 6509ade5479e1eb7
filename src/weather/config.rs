//! Weather authoring input: the state set, default state and global settings.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::weather::state::WeatherState;

/// Everything the weather manager is built from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Available states. Names must be unique.
    pub states: Vec<WeatherState>,
    /// State applied at startup. `None` = first state.
    pub default_state: Option<String>,
    /// Whether the manager periodically picks a new random target.
    pub enable_random_weather: bool,
    /// Upper bound (s) on the selection timer when random weather is
    /// switched back on.
    pub weather_check_interval: f32,
    /// RNG seed for random selection. `None` = seeded from entropy.
    pub seed: Option<u64>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            states: WeatherState::presets(),
            default_state: Some("Clear".to_string()),
            enable_random_weather: true,
            weather_check_interval: 60.0,
            seed: None,
        }
    }
}

impl WeatherConfig {
    /// Config with the given states, the first one as default.
    pub fn with_states(states: Vec<WeatherState>) -> Self {
        Self {
            default_state: states.first().map(|s| s.name.clone()),
            states,
            ..Default::default()
        }
    }

    /// Load from a JSON file and sanitize every state.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&json)?;
        let corrected = config.sanitize();
        if corrected > 0 {
            log::warn!(
                "Corrected out-of-range values in {corrected} weather state(s) from {}",
                path.display()
            );
        }
        log::info!("Loaded {} weather states from {}", config.states.len(), path.display());
        Ok(config)
    }

    /// Save as pretty-printed JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Clamp every state into range. Returns how many states changed.
    pub fn sanitize(&mut self) -> usize {
        let mut corrected = 0;
        for state in &mut self.states {
            if state.sanitize() {
                log::warn!("Weather state '{}' had out-of-range values", state.name);
                corrected += 1;
            }
        }
        self.weather_check_interval = self.weather_check_interval.max(0.0);
        corrected
    }

    /// Report configuration problems. The manager tolerates all of these
    /// (it logs and falls back); this is for tooling that wants to reject
    /// a bad file up front.
    pub fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            return Err(Error::Config("no weather states configured".to_string()));
        }

        let mut seen = HashSet::new();
        for state in &self.states {
            if !seen.insert(state.name.as_str()) {
                return Err(Error::Config(format!("duplicate weather state '{}'", state.name)));
            }
        }

        if let Some(name) = &self.default_state
            && self.find(name).is_none()
        {
            return Err(Error::Config(format!("default state '{name}' is not configured")));
        }
        Ok(())
    }

    /// Index of the state called `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = WeatherConfig::default();
        assert_eq!(config.states.len(), 4);
        assert!(config.validate().is_ok());
        assert_eq!(config.find("Rain"), Some(2));
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("weather.json");

        let config = WeatherConfig {
            seed: Some(7),
            weather_check_interval: 30.0,
            ..Default::default()
        };
        config.save(&path).expect("save");
        let loaded = WeatherConfig::load(&path).expect("load");

        assert_eq!(loaded.states, config.states);
        assert_eq!(loaded.default_state.as_deref(), Some("Clear"));
        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.weather_check_interval, 30.0);
    }

    #[test]
    fn test_load_sanitizes_states() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("weather.json");
        let json = r#"{
            "states": [
                { "name": "Odd", "min_duration": 90, "max_duration": 10,
                  "clouds": { "opacity": 3.0 } }
            ],
            "default_state": "Odd",
            "enable_random_weather": false
        }"#;
        std::fs::write(&path, json).expect("write");

        let loaded = WeatherConfig::load(&path).expect("load");
        let odd = &loaded.states[0];
        assert_eq!(odd.min_duration, 10.0);
        assert_eq!(odd.max_duration, 90.0);
        assert_eq!(odd.clouds.opacity, 1.0);
        assert!(!loaded.enable_random_weather);
        assert_eq!(loaded.weather_check_interval, 60.0);
        assert_eq!(loaded.default_state.as_deref(), Some("Odd"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let err = WeatherConfig::load(temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_bad_json_is_json_error() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ states: ").expect("write");
        assert!(matches!(WeatherConfig::load(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_validate_reports_problems() {
        let empty = WeatherConfig { states: Vec::new(), ..Default::default() };
        assert!(matches!(empty.validate(), Err(Error::Config(_))));

        let dup = WeatherConfig::with_states(vec![WeatherState::clear(), WeatherState::clear()]);
        assert!(matches!(dup.validate(), Err(Error::Config(_))));

        let bad_default = WeatherConfig {
            default_state: Some("Snow".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_default.validate(), Err(Error::Config(_))));
    }
}
