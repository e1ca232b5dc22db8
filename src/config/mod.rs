//! Environment-backed configuration.
//!
//! Every setting has a default. Override with the environment variables listed on
//! [`Config`], [`ScoringWeights`] and [`EmbeddingConfig`].

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_FUZZY_THRESHOLD, DEFAULT_KEYWORD_WEIGHT, DEFAULT_LENGTH_PENALTY_OVER_MAX,
    DEFAULT_LENGTH_PENALTY_UNDER_MIN, DEFAULT_RUBRIC_PATH, DEFAULT_SEMANTIC_WEIGHT,
};
use crate::embedding::EmbeddingConfig;

/// Coefficients that combine sub-scores into a criterion's raw score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// `KEYWORD_WEIGHT`. Default: `0.4`.
    pub keyword: f64,
    /// `SEMANTIC_WEIGHT`. Default: `0.6`.
    pub semantic: f64,
    /// `LENGTH_PENALTY_UNDER_MIN`. Default: `-10.0`.
    pub penalty_under_min: f64,
    /// `LENGTH_PENALTY_OVER_MAX`. Default: `-5.0`.
    pub penalty_over_max: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD_WEIGHT,
            semantic: DEFAULT_SEMANTIC_WEIGHT,
            penalty_under_min: DEFAULT_LENGTH_PENALTY_UNDER_MIN,
            penalty_over_max: DEFAULT_LENGTH_PENALTY_OVER_MAX,
        }
    }
}

impl ScoringWeights {
    pub const ENV_KEYWORD_WEIGHT: &'static str = "KEYWORD_WEIGHT";
    pub const ENV_SEMANTIC_WEIGHT: &'static str = "SEMANTIC_WEIGHT";
    pub const ENV_PENALTY_UNDER_MIN: &'static str = "LENGTH_PENALTY_UNDER_MIN";
    pub const ENV_PENALTY_OVER_MAX: &'static str = "LENGTH_PENALTY_OVER_MAX";

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            keyword: parse_f64_from_env(Self::ENV_KEYWORD_WEIGHT, defaults.keyword)?,
            semantic: parse_f64_from_env(Self::ENV_SEMANTIC_WEIGHT, defaults.semantic)?,
            penalty_under_min: parse_f64_from_env(
                Self::ENV_PENALTY_UNDER_MIN,
                defaults.penalty_under_min,
            )?,
            penalty_over_max: parse_f64_from_env(
                Self::ENV_PENALTY_OVER_MAX,
                defaults.penalty_over_max,
            )?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            (Self::ENV_KEYWORD_WEIGHT, self.keyword),
            (Self::ENV_SEMANTIC_WEIGHT, self.semantic),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    expected: "a finite, non-negative number",
                });
            }
        }

        for (name, value) in [
            (Self::ENV_PENALTY_UNDER_MIN, self.penalty_under_min),
            (Self::ENV_PENALTY_OVER_MAX, self.penalty_over_max),
        ] {
            if !value.is_finite() || value > 0.0 {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    expected: "a finite number <= 0",
                });
            }
        }

        Ok(())
    }
}

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (`ORATIO_PORT`). Default: `8000`.
    pub port: u16,

    /// IP address to bind to (`ORATIO_BIND_ADDR`). Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Rubric used when a request names none (`RUBRIC_PATH`). Default: `data/rubric.csv`.
    pub rubric_path: PathBuf,

    /// Minimum fuzzy ratio (0-100) for a keyword to match (`FUZZY_THRESHOLD`). Default: `85`.
    pub fuzzy_threshold: f64,

    pub weights: ScoringWeights,

    pub embedding: EmbeddingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            rubric_path: PathBuf::from(DEFAULT_RUBRIC_PATH),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            weights: ScoringWeights::default(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "ORATIO_PORT";
    const ENV_BIND_ADDR: &'static str = "ORATIO_BIND_ADDR";
    const ENV_RUBRIC_PATH: &'static str = "RUBRIC_PATH";
    const ENV_FUZZY_THRESHOLD: &'static str = "FUZZY_THRESHOLD";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let rubric_path = Self::parse_path_from_env(Self::ENV_RUBRIC_PATH, defaults.rubric_path);
        let fuzzy_threshold =
            parse_f64_from_env(Self::ENV_FUZZY_THRESHOLD, defaults.fuzzy_threshold)?;
        let weights = ScoringWeights::from_env()?;
        let embedding = EmbeddingConfig::from_env();

        Ok(Self {
            port,
            bind_addr,
            rubric_path,
            fuzzy_threshold,
            weights,
            embedding,
        })
    }

    /// Checks numeric bounds. A missing rubric file is not an error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.fuzzy_threshold) {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_FUZZY_THRESHOLD,
                value: self.fuzzy_threshold,
                expected: "a number between 0 and 100",
            });
        }

        if self.rubric_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.rubric_path.clone(),
            });
        }

        self.weights.validate()
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }
}

/// Unset or blank variables use `default`; anything else must parse as `f64`.
fn parse_f64_from_env(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map_err(|e| ConfigError::NumberParseError {
                    name,
                    value: value.clone(),
                    source: e,
                })
        }
        _ => Ok(default),
    }
}
