use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::core::MatchLimits;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub cache: CacheSettings,
    pub matching: MatchingSettings,
    pub scoring: ScoringSettings,
    pub logging: LoggingSettings,
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// TTL for any cached route without its own setting
    pub default_ttl_secs: u64,
    pub list_ttl_secs: Option<u64>,
    pub detail_ttl_secs: Option<u64>,
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl_secs: 300,
            list_ttl_secs: None,
            detail_ttl_secs: Some(600),
            max_capacity: 10_000,
        }
    }
}

impl CacheSettings {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn list_ttl(&self) -> Duration {
        self.list_ttl_secs.map_or_else(|| self.default_ttl(), Duration::from_secs)
    }

    pub fn detail_ttl(&self) -> Duration {
        self.detail_ttl_secs.map_or_else(|| self.default_ttl(), Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    pub default_job_limit: usize,
    pub default_candidate_limit: usize,
    pub max_limit: usize,
    pub min_candidate_score: u8,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        let limits = MatchLimits::default();
        Self {
            default_job_limit: limits.default_jobs,
            default_candidate_limit: limits.default_candidates,
            max_limit: limits.max,
            min_candidate_score: limits.min_candidate_score,
        }
    }
}

impl From<&MatchingSettings> for MatchLimits {
    fn from(settings: &MatchingSettings) -> Self {
        Self {
            default_jobs: settings.default_job_limit,
            default_candidates: settings.default_candidate_limit,
            max: settings.max_limit,
            min_candidate_score: settings.min_candidate_score,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_job_type_weight")]
    pub job_type: f64,
    #[serde(default = "default_salary_weight")]
    pub salary: f64,
    #[serde(default = "default_education_weight")]
    pub education: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills_weight(),
            experience: default_experience_weight(),
            location: default_location_weight(),
            job_type: default_job_type_weight(),
            salary: default_salary_weight(),
            education: default_education_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            skills: config.skills,
            experience: config.experience,
            location: config.location,
            job_type: config.job_type,
            salary: config.salary,
            education: config.education,
        }
    }
}

fn default_skills_weight() -> f64 { 40.0 }
fn default_experience_weight() -> f64 { 25.0 }
fn default_location_weight() -> f64 { 15.0 }
fn default_job_type_weight() -> f64 { 10.0 }
fn default_salary_weight() -> f64 { 5.0 }
fn default_education_weight() -> f64 { 5.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// JSON seed document loaded into the in-memory store at startup
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with JOBMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JOBMATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("JOBMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
