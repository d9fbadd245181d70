//! Debugger collaborator

use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::DeployError;
use crate::models::workspace::Workspace;

/// Session type for JVM debugging
pub const JAVA_DEBUG_TYPE: &str = "java";

/// Where the server listens for debugger connections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugServerConfig {
    #[serde(default = "default_debug_host")]
    pub host: String,

    #[serde(default = "default_debug_port")]
    pub port: u16,
}

fn default_debug_host() -> String {
    "localhost".to_string()
}

fn default_debug_port() -> u16 {
    9009
}

impl Default for DebugServerConfig {
    fn default() -> Self {
        Self {
            host: default_debug_host(),
            port: default_debug_port(),
        }
    }
}

/// Launch configuration for an attach session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugConfiguration {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub request: String,

    pub host_name: String,

    pub port: u16,
}

/// The debug session currently attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugSession {
    pub port: u16,
    pub kind: String,
}

impl From<&DebugConfiguration> for DebugSession {
    fn from(configuration: &DebugConfiguration) -> Self {
        Self {
            port: configuration.port,
            kind: configuration.kind.clone(),
        }
    }
}

/// Starts and inspects debug sessions
#[async_trait]
pub trait Debugger: Send + Sync {
    /// Debug endpoint of the server
    fn default_server_config(&self) -> DebugServerConfig;

    /// Attach configuration for a workspace
    fn debug_configuration(
        &self,
        workspace: &Workspace,
        config: &DebugServerConfig,
    ) -> DebugConfiguration;

    /// Session attached right now, if any
    fn active_session(&self) -> Option<DebugSession>;

    async fn start_debugging(
        &self,
        workspace: &Workspace,
        configuration: &DebugConfiguration,
    ) -> Result<(), DeployError>;
}

/// Whether a new session must be started for `computed`.
///
/// A session already attached with the same port and type is kept.
pub fn needs_new_session(active: Option<&DebugSession>, computed: &DebugConfiguration) -> bool {
    match active {
        Some(session) => session.port != computed.port || session.kind != computed.kind,
        None => true,
    }
}

/// Keeps track of the last started session
#[derive(Debug, Default)]
pub struct SessionTracker {
    server: DebugServerConfig,
    active: RwLock<Option<DebugSession>>,
}

impl SessionTracker {
    pub fn new(server: DebugServerConfig) -> Self {
        Self {
            server,
            active: RwLock::new(None),
        }
    }

    /// Forget the active session
    pub fn end_session(&self) {
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        *active = None;
    }
}

#[async_trait]
impl Debugger for SessionTracker {
    fn default_server_config(&self) -> DebugServerConfig {
        self.server.clone()
    }

    fn debug_configuration(
        &self,
        workspace: &Workspace,
        config: &DebugServerConfig,
    ) -> DebugConfiguration {
        DebugConfiguration {
            name: format!("Attach to {}", workspace.name),
            kind: JAVA_DEBUG_TYPE.to_string(),
            request: "attach".to_string(),
            host_name: config.host.clone(),
            port: config.port,
        }
    }

    fn active_session(&self) -> Option<DebugSession> {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn start_debugging(
        &self,
        workspace: &Workspace,
        configuration: &DebugConfiguration,
    ) -> Result<(), DeployError> {
        info!(
            "Attaching {} debugger for {} to {}:{}",
            configuration.kind, workspace.name, configuration.host_name, configuration.port
        );
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        *active = Some(DebugSession::from(configuration));
        Ok(())
    }
}
