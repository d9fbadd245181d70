//! Test doubles for the deployment collaborators

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_report::ActionReport;
use async_trait::async_trait;

use asdeploy::deploy::orchestrator::DeploymentOrchestrator;
use asdeploy::deploy::outcome::DeployOutcomeHandler;
use asdeploy::errors::DeployError;
use asdeploy::http::transport::{InvocationResult, Transport, TransportProvider, TransportRequest};
use asdeploy::models::target::ServerTarget;
use asdeploy::models::workspace::{Workspace, WorkspaceRegistry};
use asdeploy::services::builder::{BuildRequest, BuildRunner};
use asdeploy::services::debugger::{
    DebugConfiguration, DebugServerConfig, DebugSession, Debugger, JAVA_DEBUG_TYPE,
};
use asdeploy::services::status::StatusBoard;
use asdeploy::services::ui::DeployUi;

pub const HIDE_DELAY: Duration = Duration::from_millis(1500);

pub fn deployed_report(name: &str) -> ActionReport {
    ActionReport::parse(&format!(
        r#"<action-report description="deploy AdminCommand" exit-code="SUCCESS">
<message-part message="Application deployed with name {name}.">
<property name="name" value="{name}"/>
</message-part>
</action-report>"#
    ))
    .unwrap()
}

pub fn nameless_report() -> ActionReport {
    ActionReport::parse(
        r#"<action-report description="deploy AdminCommand" exit-code="SUCCESS"><message-part message=""/></action-report>"#,
    )
    .unwrap()
}

/// Records every UI call as a short string
#[derive(Default)]
pub struct RecordingUi {
    events: Mutex<Vec<String>>,
}

impl RecordingUi {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.events().iter().any(|e| e.starts_with(prefix))
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl DeployUi for RecordingUi {
    fn show_warning(&self, message: &str) {
        self.push(format!("warning:{}", message));
    }

    fn show_error(&self, message: &str) {
        self.push(format!("error:{}", message));
    }

    fn reveal_output(&self, target: &str) {
        self.push(format!("reveal:{}", target));
    }

    fn open_application(&self, target: &str, application: &str) {
        self.push(format!("open:{}:{}", target, application));
    }

    fn refresh_applications(&self, target: &str) {
        self.push(format!("refresh-apps:{}", target));
    }

    fn refresh_server_list(&self) {
        self.push("refresh-servers".to_string());
    }

    fn publish_status(&self, scope: &str, message: &str) {
        self.push(format!("status:{}:{}", scope, message));
    }

    fn hide_status(&self, scope: &str) {
        self.push(format!("hide:{}", scope));
    }
}

/// Returns a fixed artifact path, or fails
pub struct FakeBuild {
    artifact: Option<PathBuf>,
    pub requests: Mutex<Vec<BuildRequest>>,
}

impl FakeBuild {
    pub fn producing(artifact: impl Into<PathBuf>) -> Self {
        Self {
            artifact: Some(artifact.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            artifact: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl BuildRunner for FakeBuild {
    async fn build_project(&self, request: &BuildRequest) -> Result<PathBuf, DeployError> {
        self.requests.lock().unwrap().push(request.clone());
        self.artifact
            .clone()
            .ok_or_else(|| DeployError::BuildError("compilation failed".to_string()))
    }
}

/// Answers every request with the same result
pub struct FakeTransport {
    result: InvocationResult,
    pub requests: Mutex<Vec<TransportRequest>>,
}

impl FakeTransport {
    pub fn new(result: InvocationResult) -> Self {
        Self {
            result,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn invoke(&self, request: TransportRequest) -> InvocationResult {
        self.requests.lock().unwrap().push(request);
        self.result.clone()
    }
}

pub struct FakeProvider(pub Arc<FakeTransport>);

impl TransportProvider for FakeProvider {
    fn transport_for(&self, _target: &ServerTarget) -> Result<Arc<dyn Transport>, DeployError> {
        Ok(self.0.clone())
    }
}

/// Debugger with a scripted active session
pub struct FakeDebugger {
    port: u16,
    active: Mutex<Option<DebugSession>>,
    starts: AtomicUsize,
}

impl FakeDebugger {
    pub fn new(port: u16, active: Option<DebugSession>) -> Self {
        Self {
            port,
            active: Mutex::new(active),
            starts: AtomicUsize::new(0),
        }
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Debugger for FakeDebugger {
    fn default_server_config(&self) -> DebugServerConfig {
        DebugServerConfig {
            host: "localhost".to_string(),
            port: self.port,
        }
    }

    fn debug_configuration(
        &self,
        workspace: &Workspace,
        config: &DebugServerConfig,
    ) -> DebugConfiguration {
        DebugConfiguration {
            name: workspace.name.clone(),
            kind: JAVA_DEBUG_TYPE.to_string(),
            request: "attach".to_string(),
            host_name: config.host.clone(),
            port: config.port,
        }
    }

    fn active_session(&self) -> Option<DebugSession> {
        self.active.lock().unwrap().clone()
    }

    async fn start_debugging(
        &self,
        _workspace: &Workspace,
        configuration: &DebugConfiguration,
    ) -> Result<(), DeployError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.active.lock().unwrap() = Some(DebugSession::from(configuration));
        Ok(())
    }
}

/// Everything a test needs to drive and inspect one orchestrator
pub struct Harness {
    pub ui: Arc<RecordingUi>,
    pub build: Arc<FakeBuild>,
    pub transport: Arc<FakeTransport>,
    pub debugger: Arc<FakeDebugger>,
    pub orchestrator: Arc<DeploymentOrchestrator>,
}

impl Harness {
    pub fn new(build: FakeBuild, result: InvocationResult, debugger: FakeDebugger) -> Self {
        let ui = Arc::new(RecordingUi::default());
        let build = Arc::new(build);
        let transport = Arc::new(FakeTransport::new(result));
        let debugger = Arc::new(debugger);

        let status = Arc::new(StatusBoard::new(ui.clone(), HIDE_DELAY));
        let handler = DeployOutcomeHandler::new(ui.clone(), debugger.clone(), status);
        let workspaces = WorkspaceRegistry::new(vec![Workspace::new("shop", "/home/u/shop")]);

        let orchestrator = Arc::new(DeploymentOrchestrator::new(
            build.clone(),
            Arc::new(FakeProvider(transport.clone())),
            handler,
            ui.clone(),
            workspaces,
        ));

        Self {
            ui,
            build,
            transport,
            debugger,
            orchestrator,
        }
    }

    pub fn deploying(artifact: &str, result: InvocationResult) -> Self {
        Self::new(FakeBuild::producing(artifact), result, FakeDebugger::new(9009, None))
    }
}
