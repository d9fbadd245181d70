//! Deployment models

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::deploy::fsm::{DeploymentEvent, DeploymentFsm, DeploymentState};

/// Per-request deployment flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployFlags {
    /// Deployment triggered in the background (e.g. on save)
    pub auto_deploy: bool,

    /// Hot reload: descriptors or annotations changed
    pub metadata_changed: bool,

    /// Hot reload: changed source identifiers
    pub sources_changed: Vec<String>,
}

/// One deployment attempt, from build trigger to outcome
#[derive(Debug, Clone, Serialize)]
pub struct DeployAttempt {
    /// Correlation ID used in logs
    pub id: String,

    /// Target name
    pub target: String,

    pub started_at: DateTime<Utc>,

    /// Current phase
    pub state: DeploymentState,

    /// Deployed application name, once known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,

    /// Error message for failed or rejected attempts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(skip)]
    fsm: DeploymentFsm,
}

impl DeployAttempt {
    /// Start a new attempt in the pending state
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            id: crate::utils::generate_uuid(),
            target: target.into(),
            started_at: Utc::now(),
            state: DeploymentState::Pending,
            application_name: None,
            error_message: None,
            fsm: DeploymentFsm::new(),
        }
    }

    /// Advance the attempt; invalid transitions are logged and ignored
    pub fn advance(&mut self, event: DeploymentEvent) {
        if let Err(e) = self.fsm.process(event) {
            tracing::error!("Deployment {}: {}", self.id, e);
            return;
        }
        self.state = self.fsm.state().clone();
        self.error_message = self.fsm.error().map(str::to_string);
    }
}
