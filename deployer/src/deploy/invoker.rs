//! Asynchronous deploy invocation

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::deploy::request::DeploymentRequest;
use crate::http::transport::{InvocationResult, Transport, TransportRequest, REPORT_CONTENT_TYPE};

/// Sends deploy requests without waiting for them
pub struct DeployInvoker {
    transport: Arc<dyn Transport>,
}

/// A deploy request in flight
pub struct PendingDeploy {
    handle: JoinHandle<InvocationResult>,
}

impl PendingDeploy {
    /// Wait for the single result of the invocation
    pub async fn wait(self) -> InvocationResult {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                error!("Deploy task ended abnormally: {}", e);
                InvocationResult::Failed {
                    status: None,
                    message: format!("Deploy task ended abnormally: {}", e),
                }
            }
        }
    }
}

impl DeployInvoker {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Start the invocation and return immediately
    pub fn invoke(&self, request: &DeploymentRequest) -> PendingDeploy {
        let transport_request = TransportRequest {
            operation_path: request.operation_path(),
            content_type: REPORT_CONTENT_TYPE.to_string(),
            upload_file: request.upload_file().map(|p| p.to_path_buf()),
        };
        debug!("Invoking {}", transport_request.operation_path);

        let transport = self.transport.clone();
        let handle = tokio::spawn(async move { transport.invoke(transport_request).await });
        PendingDeploy { handle }
    }
}
