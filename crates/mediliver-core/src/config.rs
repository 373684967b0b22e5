//! Runtime settings.
//!
//! Defaults are layered with an optional `mediliver.toml` and `MEDILIVER__*` environment
//! variables (e.g. `MEDILIVER__ASSISTANT__API_KEY`). A local `.env` file is read first.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::latency::SimulatedLatency;
use crate::pricing::PriceBook;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Base name of the optional settings file.
pub const SETTINGS_FILE: &str = "mediliver";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "MEDILIVER";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub pricing: PriceBook,
    pub latency: LatencySettings,
    pub assistant: AssistantSettings,
}

/// Simulated round-trip times. Zero means immediate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LatencySettings {
    pub login_ms: u64,
    pub payment_ms: u64,
    pub timeout_ms: u64,
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            login_ms: 1_000,
            payment_ms: 2_000,
            timeout_ms: 10_000,
        }
    }
}

impl LatencySettings {
    pub fn login(&self) -> SimulatedLatency {
        SimulatedLatency::from_millis(self.login_ms)
    }

    pub fn payment(&self) -> SimulatedLatency {
        SimulatedLatency::from_millis(self.payment_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Generative model settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AssistantSettings {
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: mediliver_llm::DEFAULT_MODEL.into(),
            endpoint: mediliver_llm::DEFAULT_ENDPOINT.into(),
            api_key: None,
            timeout_secs: mediliver_llm::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl AssistantSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Load from `mediliver.toml` (if present) and the environment.
    pub fn load() -> ConfigResult<Self> {
        dotenv::dotenv().ok();
        Self::load_from(SETTINGS_FILE)
    }

    /// Load from the named file (extension optional, file optional) and the environment.
    pub fn load_from(path: &str) -> ConfigResult<Self> {
        let settings: Settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        tracing::debug!(model = %settings.assistant.model, "settings loaded");
        Ok(settings)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.pricing.monthly_centavos <= 0 {
            return Err(ConfigError::Invalid {
                key: "pricing.monthly_centavos",
                reason: "must be positive".into(),
            });
        }
        if self.pricing.discount_percent > 100 {
            return Err(ConfigError::Invalid {
                key: "pricing.discount_percent",
                reason: format!("{} exceeds 100", self.pricing.discount_percent),
            });
        }
        if self.assistant.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "assistant.timeout_secs",
                reason: "must be at least one second".into(),
            });
        }
        Ok(())
    }
}
