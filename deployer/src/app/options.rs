//! Application configuration options

use std::path::PathBuf;
use std::time::Duration;

use crate::models::deployment::DeployFlags;
use crate::services::debugger::DebugServerConfig;
use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Delay before the deployed status is cleared
    pub status_hide_delay: Duration,

    /// Admin request timeout
    pub request_timeout: Duration,

    /// Debug endpoint used when attaching
    pub debug_server: DebugServerConfig,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            status_hide_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(300),
            debug_server: DebugServerConfig::default(),
        }
    }
}

impl From<&Settings> for AppOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            status_hide_delay: Duration::from_millis(settings.status_hide_delay_ms),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            debug_server: settings.debug.clone(),
        }
    }
}

/// A single deployment requested on the command line
#[derive(Debug, Clone)]
pub struct DeployCommand {
    /// Target name as configured in the settings
    pub target: String,

    /// Project directory, or the artifact itself when no build is configured
    pub project: PathBuf,

    /// Attach a debugger after deploying
    pub debug: bool,

    pub flags: DeployFlags,
}
