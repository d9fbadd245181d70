//! Wires the collaborators together and runs a deployment

use std::sync::Arc;

use tracing::info;

use crate::app::options::{AppOptions, DeployCommand};
use crate::deploy::orchestrator::DeploymentOrchestrator;
use crate::deploy::outcome::DeployOutcomeHandler;
use crate::errors::DeployError;
use crate::http::client::RestTransportProvider;
use crate::models::deployment::DeployAttempt;
use crate::models::workspace::WorkspaceRegistry;
use crate::services::builder::{BuildRunner, CommandBuild, PrebuiltArtifact};
use crate::services::debugger::SessionTracker;
use crate::services::status::StatusBoard;
use crate::services::ui::{DeployUi, TracingUi};
use crate::storage::settings::Settings;

/// Run one deployment described by `command`
pub async fn run(mut settings: Settings, command: DeployCommand) -> Result<DeployAttempt, DeployError> {
    let options = AppOptions::from(&settings);
    let target = Arc::new(settings.take_target(&command.target)?);

    let builder: Arc<dyn BuildRunner> = match &settings.build {
        Some(build) => Arc::new(CommandBuild::from(build)),
        None => Arc::new(PrebuiltArtifact),
    };
    let workspaces = WorkspaceRegistry::new(std::mem::take(&mut settings.workspaces));

    let ui: Arc<dyn DeployUi> = Arc::new(TracingUi);
    let status = Arc::new(StatusBoard::new(ui.clone(), options.status_hide_delay));
    let orchestrator = init_orchestrator(&options, builder, ui, status.clone(), workspaces);

    let attempt = orchestrator
        .build_and_deploy(&command.project, target, command.debug, command.flags)
        .await;

    // the runtime shuts down after this returns
    status.settle().await;

    info!("Deployment {} ended as {:?}", attempt.id, attempt.state);
    Ok(attempt)
}

/// Build an orchestrator backed by the REST transport
pub fn init_orchestrator(
    options: &AppOptions,
    builder: Arc<dyn BuildRunner>,
    ui: Arc<dyn DeployUi>,
    status: Arc<StatusBoard>,
    workspaces: WorkspaceRegistry,
) -> DeploymentOrchestrator {
    let debugger = Arc::new(SessionTracker::new(options.debug_server.clone()));
    let handler = DeployOutcomeHandler::new(ui.clone(), debugger, status);
    let transports = Arc::new(RestTransportProvider::new(options.request_timeout));

    DeploymentOrchestrator::new(builder, transports, handler, ui, workspaces)
}
