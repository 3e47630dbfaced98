//! Configuration with environment variable support.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SCENARIO_REPORT_WORKING_DIR` | Base directory user-story paths are resolved against | process working directory |
//! | `SCENARIO_REPORT_STORY_TYPE` | `type` value emitted in the `userStory` object | `feature` |

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Default user-story type
pub const DEFAULT_STORY_TYPE: &str = "feature";

/// Environment variable for the story path base directory
pub const ENV_WORKING_DIR: &str = "SCENARIO_REPORT_WORKING_DIR";

/// Environment variable for the user-story type
pub const ENV_STORY_TYPE: &str = "SCENARIO_REPORT_STORY_TYPE";

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Report emission settings
    pub report: ReportSettings,
}

/// Report-related settings
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Explicit base directory for user-story path resolution
    pub working_dir: Option<PathBuf>,
    /// `type` value for emitted user stories
    pub story_type: String,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            report: ReportSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            report: ReportSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ReportSettings {
    /// Create report settings from environment variables
    pub fn from_env() -> Self {
        Self {
            working_dir: env::var_os(ENV_WORKING_DIR).map(PathBuf::from),
            story_type: env::var(ENV_STORY_TYPE)
                .unwrap_or_else(|_| DEFAULT_STORY_TYPE.to_string()),
        }
    }

    /// Create report settings with defaults
    pub fn defaults() -> Self {
        Self {
            working_dir: None,
            story_type: DEFAULT_STORY_TYPE.to_string(),
        }
    }
}

/// Directory user-story paths are resolved against (convenience function)
pub fn working_dir() -> PathBuf {
    get()
        .report
        .working_dir
        .clone()
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// User-story type string (convenience function)
pub fn story_type() -> String {
    get().report.story_type.clone()
}
