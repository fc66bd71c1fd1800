//! # Configuration
//!
//! Stored as `config.json` in the data directory, next to the collections.
//! Missing file or missing keys fall back to compiled defaults.
//!
//! | Key         | Default | Description |
//! |-------------|---------|-------------|
//! | `loan-days` | `14`    | Days added to the loan date when a due date is not given. `0` makes the due date mandatory. |
//! | `log-level` | `warn`  | Log filter used when `RUST_LOG` is not set. |

use crate::error::{BookfyError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOAN_DAYS: u32 = 14;
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

pub const KEYS: [&str; 2] = ["loan-days", "log-level"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookfyConfig {
    #[serde(default = "default_loan_days")]
    pub loan_days: u32,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_loan_days() -> u32 {
    DEFAULT_LOAN_DAYS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for BookfyConfig {
    fn default() -> Self {
        Self {
            loan_days: DEFAULT_LOAN_DAYS,
            log_level: default_log_level(),
        }
    }
}

impl BookfyConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(BookfyError::Io)?;
        let config: BookfyConfig =
            serde_json::from_str(&content).map_err(BookfyError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(BookfyError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(BookfyError::Serialization)?;
        fs::write(config_path, content).map_err(BookfyError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "loan-days" => Some(self.loan_days.to_string()),
            "log-level" => Some(self.log_level.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "loan-days" => {
                self.loan_days = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("loan-days must be a whole number, got {}", value))?;
            }
            "log-level" => {
                let level = value.trim().to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(format!(
                        "log-level must be one of {}, got {}",
                        LOG_LEVELS.join(", "),
                        value
                    ));
                }
                self.log_level = level;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    /// Due date to offer for a loan starting on `loan_date`, if configured.
    pub fn default_due_date(&self, loan_date: NaiveDate) -> Option<NaiveDate> {
        if self.loan_days == 0 {
            return None;
        }
        loan_date.checked_add_days(Days::new(u64::from(self.loan_days)))
    }
}
