//! Transport contract between the deployer and an admin endpoint

use std::path::PathBuf;
use std::sync::Arc;

use action_report::ActionReport;
use async_trait::async_trait;

use crate::errors::DeployError;
use crate::models::target::ServerTarget;

/// Content type the admin endpoint is asked to answer with
pub const REPORT_CONTENT_TYPE: &str = "application/xml";

/// A single admin command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Command plus query string, e.g. `deploy?force=true&name=app`
    pub operation_path: String,

    /// Accepted response content type
    pub content_type: String,

    /// File streamed as the request body
    pub upload_file: Option<PathBuf>,
}

/// Result of one invocation. Exactly one value is produced per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    /// The command completed and returned a report
    Completed(ActionReport),

    /// Success status, but the body is not an action report
    Unreadable { status: u16, detail: String },

    /// Non-success status, failed command or transport error
    Failed {
        status: Option<u16>,
        message: String,
    },
}

/// Sends admin commands
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, request: TransportRequest) -> InvocationResult;
}

/// Creates the transport for a server target
pub trait TransportProvider: Send + Sync {
    fn transport_for(&self, target: &ServerTarget) -> Result<Arc<dyn Transport>, DeployError>;
}
