//! Settings file management

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::errors::DeployError;
use crate::logs::LogLevel;
use crate::models::target::ServerTarget;
use crate::models::workspace::Workspace;
use crate::services::debugger::DebugServerConfig;

/// Deployer settings
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON log lines
    #[serde(default)]
    pub json_logs: bool,

    /// Also write logs to daily files in this directory
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// How long the "successfully deployed" status stays visible
    #[serde(default = "default_status_hide_delay_ms")]
    pub status_hide_delay_ms: u64,

    /// Admin request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Debug endpoint of the servers
    #[serde(default)]
    pub debug: DebugServerConfig,

    /// Configured server instances
    #[serde(default)]
    pub targets: Vec<ServerTarget>,

    /// Known project roots
    #[serde(default)]
    pub workspaces: Vec<Workspace>,

    /// Build command; artifacts are deployed as-is when absent
    #[serde(default)]
    pub build: Option<BuildSettings>,
}

fn default_status_hide_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            json_logs: false,
            log_dir: None,
            status_hide_delay_ms: default_status_hide_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            debug: DebugServerConfig::default(),
            targets: Vec::new(),
            workspaces: Vec::new(),
            build: None,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self, DeployError> {
        debug!("Loading settings from {}", path.display());
        let contents = tokio::fs::read_to_string(path).await?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    /// Look up a target by name
    pub fn target(&self, name: &str) -> Option<&ServerTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Take a target out of the settings by name
    pub fn take_target(&mut self, name: &str) -> Result<ServerTarget, DeployError> {
        let index = self
            .targets
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| DeployError::NotFound(format!("Server target '{}'", name)))?;
        Ok(self.targets.swap_remove(index))
    }
}

/// Build command settings
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSettings {
    /// Program to run, e.g. `mvn`
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Artifact path relative to the project directory
    pub artifact: PathBuf,
}
