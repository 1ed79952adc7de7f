use fasal_core::assistant::remote::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use fasal_core::error::FasalError;
use fasal_core::weather::OPEN_METEO_BASE_URL;
use fasal_core::{ScoreOptions, WeightPolicy, DEFAULT_MIN_SCORE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "fasal.toml";
pub const CONFIG_PATH_ENV: &str = "FASAL_CONFIG";
pub const API_KEY_ENV: &str = "FASAL_GEMINI_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub assistant: AssistantSection,
    pub weather: WeatherSection,
    pub records: RecordsSection,
    pub scoring: ScoringSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSection {
    pub model: String,
    pub base_url: String,
    /// Overall budget for one remote answer before falling back offline.
    pub timeout_secs: u64,
}

impl Default for AssistantSection {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherSection {
    fn default() -> Self {
        Self {
            base_url: OPEN_METEO_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsSection {
    pub path: PathBuf,
}

impl Default for RecordsSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fasal-records.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    pub min_score: u8,
    pub weight_policy: WeightPolicy,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            weight_policy: WeightPolicy::default(),
        }
    }
}

impl Config {
    pub fn score_options(&self) -> ScoreOptions {
        ScoreOptions {
            weight_policy: self.scoring.weight_policy,
            min_score: self.scoring.min_score,
        }
    }

    pub fn assistant_timeout(&self) -> Duration {
        Duration::from_secs(self.assistant.timeout_secs)
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather.timeout_secs)
    }

    pub fn parse(content: &str) -> Result<Self, FasalError> {
        toml::from_str(content).map_err(|e| FasalError::Config(format!("invalid config: {e}")))
    }

    pub fn to_toml(&self) -> Result<String, FasalError> {
        toml::to_string_pretty(self)
            .map_err(|e| FasalError::Config(format!("cannot serialize config: {e}")))
    }
}

/// `--config`, then `$FASAL_CONFIG`, then `fasal.toml` in the working directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from(CONFIG_FILE_NAME),
    }
}

/// Load the config at `path`; a missing file means defaults.
pub fn load_config(path: &Path) -> Result<Config, FasalError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| FasalError::Config(format!("read {}: {e}", path.display())))?;
    Config::parse(&content).map_err(|e| match e {
        FasalError::Config(msg) => FasalError::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Write a default config file unless one already exists.
/// Returns false when the file was left untouched.
pub fn init_config(path: &Path) -> Result<bool, FasalError> {
    if path.exists() {
        return Ok(false);
    }
    let content = Config::default().to_toml()?;
    std::fs::write(path, content)
        .map_err(|e| FasalError::Config(format!("write {}: {e}", path.display())))?;
    Ok(true)
}

/// Gemini API key from the environment. Never stored in the config file.
pub fn api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let cfg = Config::parse(
            r#"
            [assistant]
            timeout_secs = 5

            [scoring]
            weight_policy = "fixed_weights"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.assistant.timeout_secs, 5);
        assert_eq!(cfg.assistant.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(cfg.scoring.weight_policy, WeightPolicy::FixedWeights);
        assert_eq!(cfg.scoring.min_score, DEFAULT_MIN_SCORE);
    }

    #[test]
    fn test_bad_value_is_config_error() {
        let err = Config::parse("[scoring]\nmin_score = \"high\"").unwrap_err();
        assert!(matches!(err, FasalError::Config(_)));
    }

    #[test]
    fn test_round_trip_has_no_secret() {
        let toml = Config::default().to_toml().unwrap();
        assert!(!toml.contains("key"));
        assert_eq!(Config::parse(&toml).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(init_config(&path).unwrap());
        std::fs::write(&path, "[scoring]\nmin_score = 50\n").unwrap();
        assert!(!init_config(&path).unwrap());
        assert_eq!(load_config(&path).unwrap().scoring.min_score, 50);
    }

    #[test]
    fn test_explicit_path_wins() {
        let p = Path::new("/tmp/custom.toml");
        assert_eq!(config_path(Some(p)), p);
    }
}
