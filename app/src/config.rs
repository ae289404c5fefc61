//! Configuration for the task list binary
//!
//! Everything is read from environment variables; every variable is optional.
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `TASKLIST_SHOW_TITLE_BAR` | show the "Todo" title bar | `false` |
//! | `TASKLIST_FIELD_LABEL` | label of the add-task field | `Task` |
//! | `TASKLIST_LOG` | tracing filter directive | `RUST_LOG`, then built-in default |

use crate::view::ViewConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable toggling the title bar
pub const SHOW_TITLE_BAR_VAR: &str = "TASKLIST_SHOW_TITLE_BAR";

/// Environment variable overriding the field label
pub const FIELD_LABEL_VAR: &str = "TASKLIST_FIELD_LABEL";

/// Environment variable holding the log filter
pub const LOG_VAR: &str = "TASKLIST_LOG";

/// Log filter used when neither `TASKLIST_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "tasklist=info,tasklist_runtime=info";

/// Configuration error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable held something that is not a boolean
    #[error("Invalid value for {var}: {value:?} (expected true/false, yes/no, on/off or 1/0)")]
    InvalidBool {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

/// Binary configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Presentation options
    pub view: ViewConfig,
    /// Explicit log filter, if configured
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBool`] if `TASKLIST_SHOW_TITLE_BAR` is
    /// set to something that is not a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBool`] if `TASKLIST_SHOW_TITLE_BAR` is
    /// set to something that is not a boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(SHOW_TITLE_BAR_VAR) {
            config.view.show_title_bar = parse_bool(SHOW_TITLE_BAR_VAR, &value)?;
        }
        if let Some(label) = lookup(FIELD_LABEL_VAR) {
            config.view.field_label = label;
        }
        config.log_filter = lookup(LOG_VAR).filter(|filter| !filter.trim().is_empty());

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
