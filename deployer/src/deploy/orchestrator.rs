//! Build-then-deploy orchestration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::deploy::fsm::DeploymentEvent;
use crate::deploy::invoker::DeployInvoker;
use crate::deploy::outcome::{DeployOutcomeHandler, HandledOutcome, OutcomeContext};
use crate::deploy::request::{build_request, DeploymentRequest};
use crate::deploy::strategy::classify;
use crate::errors::DeployError;
use crate::http::transport::{Transport, TransportProvider};
use crate::models::deployment::{DeployAttempt, DeployFlags};
use crate::models::target::ServerTarget;
use crate::models::workspace::WorkspaceRegistry;
use crate::services::builder::{BuildRequest, BuildRunner};
use crate::services::ui::DeployUi;

/// Drives one deployment from build to outcome
pub struct DeploymentOrchestrator {
    builder: Arc<dyn BuildRunner>,
    transports: Arc<dyn TransportProvider>,
    handler: DeployOutcomeHandler,
    ui: Arc<dyn DeployUi>,
    workspaces: WorkspaceRegistry,
}

impl DeploymentOrchestrator {
    pub fn new(
        builder: Arc<dyn BuildRunner>,
        transports: Arc<dyn TransportProvider>,
        handler: DeployOutcomeHandler,
        ui: Arc<dyn DeployUi>,
        workspaces: WorkspaceRegistry,
    ) -> Self {
        Self {
            builder,
            transports,
            handler,
            ui,
            workspaces,
        }
    }

    /// Run [`Self::build_and_deploy`] in the background
    pub fn spawn_build_and_deploy(
        self: &Arc<Self>,
        project: PathBuf,
        target: Arc<ServerTarget>,
        debug_requested: bool,
        flags: DeployFlags,
    ) -> JoinHandle<DeployAttempt> {
        let orchestrator = self.clone();
        tokio::spawn(async move {
            orchestrator
                .build_and_deploy(&project, target, debug_requested, flags)
                .await
        })
    }

    /// Build the project and deploy the resulting artifact to `target`
    pub async fn build_and_deploy(
        &self,
        project: &Path,
        target: Arc<ServerTarget>,
        debug_requested: bool,
        flags: DeployFlags,
    ) -> DeployAttempt {
        let mut attempt = DeployAttempt::new(&target.name);
        info!(
            deployment_id = %attempt.id,
            "Deploying {} to {}",
            project.display(),
            target.name
        );

        if target.is_remote() && !target.is_connection_allowed() {
            let err = DeployError::TargetUnreachable(format!(
                "Server {} does not allow connections; enable it before deploying",
                target.name
            ));
            warn!(deployment_id = %attempt.id, "{}", err);
            self.ui.show_warning(&err.to_string());
            attempt.advance(DeploymentEvent::Reject(err.to_string()));
            return attempt;
        }

        attempt.advance(DeploymentEvent::Build);
        let build = BuildRequest {
            project: project.to_path_buf(),
            remote: target.is_remote(),
            remote_kind: target.location.instance_kind(),
            auto_deploy: flags.auto_deploy,
        };

        let prepared = match self.builder.build_project(&build).await {
            Ok(artifact) => self
                .prepare(&artifact, &target, &flags)
                .map(|(request, transport)| (artifact, request, transport)),
            Err(e) => Err(e),
        };
        let (artifact, request, transport) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                error!(deployment_id = %attempt.id, "Deployment aborted: {}", e);
                self.ui.show_error(&e.to_string());
                attempt.advance(DeploymentEvent::Abort(e.to_string()));
                return attempt;
            }
        };
        attempt.advance(DeploymentEvent::Prepared);

        if !flags.auto_deploy {
            self.ui.reveal_output(&target.name);
        }

        let pending = DeployInvoker::new(transport).invoke(&request);
        let result = pending.wait().await;

        let context = OutcomeContext {
            workspace: self.workspaces.owner_of(&artifact).cloned(),
            target: target.clone(),
            debug_requested,
            auto_deploy: flags.auto_deploy,
        };

        match self.handler.handle(result, &context).await {
            HandledOutcome::Deployed {
                application_name, ..
            } => {
                attempt.application_name = Some(application_name);
                attempt.advance(DeploymentEvent::DeploySuccess);
            }
            HandledOutcome::Failed { message } => {
                attempt.advance(DeploymentEvent::DeployFailed(message));
            }
            HandledOutcome::Ignored => {
                attempt.advance(DeploymentEvent::ResponseIgnored);
            }
        }

        info!(
            deployment_id = %attempt.id,
            state = ?attempt.state,
            "Deployment finished"
        );
        attempt
    }

    fn prepare(
        &self,
        artifact: &Path,
        target: &ServerTarget,
        flags: &DeployFlags,
    ) -> Result<(DeploymentRequest, Arc<dyn Transport>), DeployError> {
        let strategy = classify(target);
        info!("Deploying {} using {:?}", artifact.display(), strategy);

        let request = build_request(
            artifact,
            &strategy,
            target.deploy_mode,
            flags.metadata_changed,
            &flags.sources_changed,
        )?;
        let transport = self.transports.transport_for(target)?;
        Ok((request, transport))
    }
}
