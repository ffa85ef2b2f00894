use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::deload::DeloadConfig;
use crate::error::LiftRsError;
use crate::forecast::ForecastConfig;
use crate::logging::LogConfig;
use crate::models::{ExperienceLevel, Gender};
use crate::progression::ProgressionConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Load progression policy
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Deload thresholds
    #[serde(default)]
    pub deload: DeloadConfig,

    /// PR forecast parameters
    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub logging: LogConfig,

    /// Lifter profiles keyed by id
    #[serde(default)]
    pub lifters: HashMap<String, LifterProfile>,

    /// Default lifter ID (currently active)
    pub default_lifter_id: Option<String>,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Training snapshot read by the CLI when `--snapshot` is not given
    pub snapshot_path: PathBuf,

    /// Unit weights are logged in
    pub weight_unit: WeightUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightUnit::Kg => write!(f, "kg"),
            WeightUnit::Lb => write!(f, "lb"),
        }
    }
}

/// Lifter profile used for classification and experience-scaled policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifterProfile {
    /// Unique lifter identifier
    pub id: String,

    /// Display name
    pub name: String,

    pub gender: Gender,

    /// Bodyweight used when no daily log carries one
    pub bodyweight: Option<Decimal>,

    pub experience_level: ExperienceLevel,

    /// Date of the most recent planned deload, if tracked
    pub last_deload_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings::default(),
            progression: ProgressionConfig::default(),
            deload: DeloadConfig::default(),
            forecast: ForecastConfig::default(),
            logging: LogConfig::default(),
            lifters: HashMap::new(),
            default_lifter_id: None,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            snapshot_path: AppConfig::config_dir().join("training.json"),
            weight_unit: WeightUnit::Kg,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Reject values the calculators cannot work with
    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |reason: String| -> crate::error::Result<()> { Err(LiftRsError::Configuration(reason)) };

        if self.progression.weight_increment <= Decimal::ZERO {
            return invalid(format!(
                "weight_increment must be positive, got {}",
                self.progression.weight_increment
            ));
        }
        if self.progression.low_recovery_threshold > self.progression.adequate_recovery_threshold {
            return invalid("low_recovery_threshold must not exceed adequate_recovery_threshold".to_string());
        }
        let (min_reps, max_reps) = self.progression.default_rep_range;
        if min_reps == 0 || min_reps > max_reps {
            return invalid(format!("Invalid default rep range: {}-{}", min_reps, max_reps));
        }
        if self.deload.min_sessions == 0 || self.deload.fatigue_window_days <= 0 {
            return invalid("Deload windows must be positive".to_string());
        }
        if self.forecast.amplitude_multipliers.is_empty() || self.forecast.rate_multipliers.is_empty() {
            return invalid("Forecast search grid must not be empty".to_string());
        }
        Ok(())
    }

    /// Directory holding configuration and default data
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".liftrs")
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using default configuration");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Add a lifter; the first one added becomes the default
    pub fn add_lifter(&mut self, lifter: LifterProfile) {
        let lifter_id = lifter.id.clone();

        if self.lifters.is_empty() {
            self.default_lifter_id = Some(lifter_id.clone());
        }

        self.lifters.insert(lifter_id, lifter);
        self.metadata.updated_at = Utc::now();
    }

    pub fn remove_lifter(&mut self, lifter_id: &str) -> Result<()> {
        if self.lifters.remove(lifter_id).is_none() {
            return Err(anyhow::anyhow!("Lifter not found: {}", lifter_id));
        }

        if self.default_lifter_id.as_deref() == Some(lifter_id) {
            self.default_lifter_id = self.lifters.keys().next().cloned();
        }

        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    pub fn get_lifter(&self, lifter_id: &str) -> Option<&LifterProfile> {
        self.lifters.get(lifter_id)
    }

    /// Get the default (currently active) lifter
    pub fn get_default_lifter(&self) -> Option<&LifterProfile> {
        self.default_lifter_id
            .as_ref()
            .and_then(|id| self.lifters.get(id))
    }

    pub fn set_default_lifter(&mut self, lifter_id: &str) -> Result<()> {
        if !self.lifters.contains_key(lifter_id) {
            return Err(anyhow::anyhow!("Lifter not found: {}", lifter_id));
        }

        self.default_lifter_id = Some(lifter_id.to_string());
        self.metadata.updated_at = Utc::now();
        Ok(())
    }
}

impl LifterProfile {
    pub fn new(name: String, gender: Gender, lifter_id: Option<String>) -> Self {
        let id = lifter_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let now = Utc::now();

        LifterProfile {
            id,
            name,
            gender,
            bodyweight: None,
            experience_level: ExperienceLevel::default(),
            last_deload_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}
