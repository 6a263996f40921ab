use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::models::{BoundingBox, PartitionConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub leagues: LeagueSettings,
    #[serde(default)]
    pub derby: DerbySettings,
    #[serde(default)]
    pub optimizer: OptimizerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputSettings {
    #[serde(default = "default_clubs_path")]
    pub clubs_path: PathBuf,
    /// Warn about clubs outside the German bounding box
    #[serde(default = "default_true")]
    pub check_region: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            clubs_path: default_clubs_path(),
            check_region: true,
        }
    }
}

impl InputSettings {
    pub fn region(&self) -> Option<BoundingBox> {
        self.check_region.then_some(BoundingBox::GERMANY)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueSettings {
    #[serde(default = "default_league_count")]
    pub count: usize,
    #[serde(default = "default_league_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default = "default_true")]
    pub compass_names: bool,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            count: default_league_count(),
            capacity: default_league_capacity(),
            names: Vec::new(),
            compass_names: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DerbySettings {
    #[serde(default)]
    pub enforce_same_league: bool,
    #[serde(default)]
    pub pairs: Vec<(String, String)>,
    pub max_distance_km: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerSettings {
    #[serde(default = "default_true")]
    pub enable_matrix_variant: bool,
    #[serde(default = "crate::models::requests::default_centroid_max_passes")]
    pub centroid_max_passes: usize,
    #[serde(default = "crate::models::requests::default_matrix_max_passes")]
    pub matrix_max_passes: usize,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enable_matrix_variant: true,
            centroid_max_passes: crate::models::requests::default_centroid_max_passes(),
            matrix_max_passes: crate::models::requests::default_matrix_max_passes(),
        }
    }
}

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

fn default_true() -> bool { true }
fn default_clubs_path() -> PathBuf { PathBuf::from("data/clubs.json") }
fn default_league_count() -> usize { 4 }
fn default_league_capacity() -> usize { 20 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "default".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with KOMPASS__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., KOMPASS__LEAGUES__COUNT -> leagues.count
            .add_source(environment())
            .build()?;

        apply_shortcuts(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        apply_shortcuts(settings)?.try_deserialize()
    }

    /// Engine options derived from the league, derby and optimizer sections
    pub fn partition_config(&self) -> PartitionConfig {
        PartitionConfig {
            league_count: self.leagues.count,
            league_capacity: self.leagues.capacity,
            league_names: self.leagues.names.clone(),
            compass_names: self.leagues.compass_names,
            enforce_derby_same_league: self.derby.enforce_same_league,
            derby_pairs: self.derby.pairs.clone(),
            derby_max_distance_km: self.derby.max_distance_km,
            enable_matrix_variant: self.optimizer.enable_matrix_variant,
            centroid_max_passes: self.optimizer.centroid_max_passes,
            matrix_max_passes: self.optimizer.matrix_max_passes,
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("KOMPASS")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Short environment names that win over everything else
///
/// `KOMPASS_CLUBS` sets the input file, `LOG_LEVEL` / `LOG_FORMAT` the logging section.
fn apply_shortcuts(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(path) = env::var("KOMPASS_CLUBS") {
        builder = builder.set_override("input.clubs_path", path)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}
