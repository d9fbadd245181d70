//! Deploy outcome handling

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::http::transport::InvocationResult;
use crate::models::target::ServerTarget;
use crate::models::workspace::Workspace;
use crate::services::debugger::{needs_new_session, Debugger};
use crate::services::status::StatusBoard;
use crate::services::ui::DeployUi;

/// Report property carrying the deployed application's name
const NAME_PROPERTY: &str = "name";

/// Result of one deploy invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Success { application_name: String },
    Failure { message: String },
}

impl DeployOutcome {
    /// Interpret an invocation result.
    ///
    /// A completed command without a `name` property, or a success
    /// response without a readable report, yields no outcome.
    pub fn from_invocation(result: InvocationResult) -> Option<Self> {
        match result {
            InvocationResult::Completed(report) => match report.property(NAME_PROPERTY) {
                Some(name) if !name.is_empty() => Some(DeployOutcome::Success {
                    application_name: name.to_string(),
                }),
                _ => {
                    warn!(
                        exit_code = ?report.exit_code,
                        report_message = report.message().unwrap_or_default(),
                        "Deploy succeeded but the report has no application name; ignoring it"
                    );
                    None
                }
            },
            InvocationResult::Unreadable { status, detail } => {
                warn!(status, "Deploy response could not be read; ignoring it: {}", detail);
                None
            }
            InvocationResult::Failed { message, .. } => Some(DeployOutcome::Failure { message }),
        }
    }
}

/// Everything the handler needs to know about the deployment
#[derive(Debug, Clone)]
pub struct OutcomeContext {
    /// Workspace owning the artifact
    pub workspace: Option<Workspace>,

    pub target: Arc<ServerTarget>,

    pub debug_requested: bool,

    /// Background deployment: no application opening or list refresh
    pub auto_deploy: bool,
}

/// What the handler did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandledOutcome {
    Deployed {
        application_name: String,
        debug_started: bool,
    },
    Failed {
        message: String,
    },
    Ignored,
}

/// Runs the post-deploy side effects
pub struct DeployOutcomeHandler {
    ui: Arc<dyn DeployUi>,
    debugger: Arc<dyn Debugger>,
    status: Arc<StatusBoard>,
}

impl DeployOutcomeHandler {
    pub fn new(ui: Arc<dyn DeployUi>, debugger: Arc<dyn Debugger>, status: Arc<StatusBoard>) -> Self {
        Self {
            ui,
            debugger,
            status,
        }
    }

    /// Consume the invocation result and run its side effects
    pub async fn handle(&self, result: InvocationResult, context: &OutcomeContext) -> HandledOutcome {
        let outcome = match DeployOutcome::from_invocation(result) {
            Some(outcome) => outcome,
            None => return HandledOutcome::Ignored,
        };

        let application_name = match outcome {
            DeployOutcome::Failure { message } => {
                error!(target_name = %context.target.name, "Deployment failed: {}", message);
                self.ui.show_error(&message);
                return HandledOutcome::Failed { message };
            }
            DeployOutcome::Success { application_name } => application_name,
        };

        info!(
            target_name = %context.target.name,
            "Application {} deployed", application_name
        );

        let debug_started = match (&context.workspace, context.debug_requested) {
            (Some(workspace), true) => self.reconcile_debugger(workspace).await,
            _ => false,
        };

        if !context.auto_deploy {
            self.ui
                .open_application(&context.target.name, &application_name);
            self.ui.refresh_applications(&context.target.name);
            self.ui.refresh_server_list();
        }

        let scope = context
            .workspace
            .as_ref()
            .map(|ws| ws.name.as_str())
            .unwrap_or(application_name.as_str());
        self.status
            .show_transient(scope, &format!("{} successfully deployed", application_name));

        HandledOutcome::Deployed {
            application_name,
            debug_started,
        }
    }

    /// Start a debug session unless an equivalent one is attached
    async fn reconcile_debugger(&self, workspace: &Workspace) -> bool {
        let server = self.debugger.default_server_config();
        let configuration = self.debugger.debug_configuration(workspace, &server);

        // read right before deciding, never from an earlier snapshot
        let active = self.debugger.active_session();
        if !needs_new_session(active.as_ref(), &configuration) {
            debug!(
                "Debug session on port {} already attached to {}",
                configuration.port, workspace.name
            );
            return false;
        }

        match self.debugger.start_debugging(workspace, &configuration).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to start debugging {}: {}", workspace.name, e);
                self.ui.show_error(&e.to_string());
                false
            }
        }
    }
}
