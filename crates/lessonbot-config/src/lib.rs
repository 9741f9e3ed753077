//! Flat key/value configuration for lessonbot.
//!
//! Loaded once before the scheduling loop starts; every key is validated
//! up front so a bad file never makes it into the loop.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lessonbot_types::DeliveryErrorPolicy;

/// Environment variable that overrides `bot_token` from the config file.
pub const TOKEN_ENV_VAR: &str = "LESSONBOT_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Bot configuration, read from a flat TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// How many repeating schedule variants exist (e.g. 2 for week A/B).
    pub number_of_periods: u32,
    /// Length of one rotation period, in days.
    pub period_duration: u32,
    /// Anchor date the rotation is counted from (ISO date).
    pub start_of_first_period: NaiveDate,
    /// CSV file mapping subject names to images and links.
    pub subjects_dict_file_path: PathBuf,
    /// CSV file with one row of lesson names per weekday. A `$` in the
    /// path is replaced with the active rotation period number.
    pub standard_period_file_path: String,
    /// CSV file with one `start,end` clock-time row per slot.
    pub time_table_file_path: PathBuf,
    /// Telegram bot token. May be omitted and supplied via `LESSONBOT_TOKEN`.
    #[serde(default)]
    pub bot_token: String,
    /// Channel the announcements are posted to (numeric id or @name).
    pub channel_id: String,
    /// Local wall-clock time of the daily schedule reload.
    #[serde(default = "default_reload_time")]
    pub reload_time: NaiveTime,
    /// Whether a failed send/delete stops the run or skips the slot.
    #[serde(default)]
    pub on_delivery_error: DeliveryErrorPolicy,
}

fn default_reload_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).expect("valid literal time")
}

impl BotConfig {
    /// Check value constraints that the type system doesn't capture.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_periods == 0 {
            return Err(ConfigError::Invalid(
                "number_of_periods must be at least 1".into(),
            ));
        }
        if self.period_duration == 0 {
            return Err(ConfigError::Invalid(
                "period_duration must be at least 1 day".into(),
            ));
        }
        if self.bot_token.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "bot_token is missing (set it in the config file or via {TOKEN_ENV_VAR})"
            )));
        }
        if self.channel_id.is_empty() {
            return Err(ConfigError::Invalid("channel_id is missing".into()));
        }
        Ok(())
    }
}

/// Load and validate configuration from `path`.
///
/// A `.env` file is honored, and `LESSONBOT_TOKEN` takes precedence over
/// the `bot_token` key so the token can stay out of the config file.
pub fn load_config_from(path: &Path) -> Result<BotConfig, ConfigError> {
    let _ = dotenvy::dotenv();

    let content = std::fs::read_to_string(path)?;
    let mut config: BotConfig = toml::from_str(&content)?;

    if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
        && !token.is_empty()
    {
        config.bot_token = token;
    }

    config.validate()?;
    Ok(config)
}
