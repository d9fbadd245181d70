//! Finite State Machine for a single deployment attempt

use serde::{Deserialize, Serialize};

/// Deployment state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    /// Initial state, nothing started
    Pending,

    /// Build running
    Building,

    /// Request sent to the admin endpoint
    Deploying,

    /// Server reported a deployed application
    Deployed,

    /// Build, request preparation or invocation failed
    Failed,

    /// Server answered with a report that carries no outcome
    Ignored,

    /// Target refused before anything started
    Rejected,
}

/// Deployment event
#[derive(Debug, Clone)]
pub enum DeploymentEvent {
    /// Start the build
    Build,

    /// Target not connectable
    Reject(String),

    /// Build or request preparation failed
    Abort(String),

    /// Artifact built and request prepared
    Prepared,

    /// Server reported success with an application name
    DeploySuccess,

    /// Server or transport reported failure
    DeployFailed(String),

    /// Server reported success without an application name
    ResponseIgnored,
}

/// Deployment FSM
#[derive(Debug, Clone)]
pub struct DeploymentFsm {
    state: DeploymentState,
    error: Option<String>,
}

impl DeploymentFsm {
    /// Create a new FSM in pending state
    pub fn new() -> Self {
        Self {
            state: DeploymentState::Pending,
            error: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> &DeploymentState {
        &self.state
    }

    /// Get error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: DeploymentEvent) -> Result<(), String> {
        let new_state = match (&self.state, &event) {
            // From Pending
            (DeploymentState::Pending, DeploymentEvent::Build) => DeploymentState::Building,
            (DeploymentState::Pending, DeploymentEvent::Reject(err)) => {
                self.error = Some(err.clone());
                DeploymentState::Rejected
            }

            // From Building
            (DeploymentState::Building, DeploymentEvent::Prepared) => DeploymentState::Deploying,
            (DeploymentState::Building, DeploymentEvent::Abort(err)) => {
                self.error = Some(err.clone());
                DeploymentState::Failed
            }

            // From Deploying
            (DeploymentState::Deploying, DeploymentEvent::DeploySuccess) => {
                DeploymentState::Deployed
            }
            (DeploymentState::Deploying, DeploymentEvent::DeployFailed(err)) => {
                self.error = Some(err.clone());
                DeploymentState::Failed
            }
            (DeploymentState::Deploying, DeploymentEvent::ResponseIgnored) => {
                DeploymentState::Ignored
            }

            // Invalid transitions
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.state = new_state;
        Ok(())
    }

    /// Whether no further events are accepted
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            DeploymentState::Deployed
                | DeploymentState::Failed
                | DeploymentState::Ignored
                | DeploymentState::Rejected
        )
    }
}

impl Default for DeploymentFsm {
    fn default() -> Self {
        Self::new()
    }
}
