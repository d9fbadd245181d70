//! HTTP client for the admin endpoint

use std::sync::Arc;
use std::time::Duration;

use action_report::ActionReport;
use async_trait::async_trait;
use reqwest::{header, Body, Client};
use secrecy::{ExposeSecret, SecretString};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};
use url::Url;

use crate::errors::DeployError;
use crate::http::transport::{InvocationResult, Transport, TransportProvider, TransportRequest};
use crate::models::target::ServerTarget;

/// Path of the admin command endpoint
const COMMAND_ROOT: &str = "__asadmin/";

/// Sent with every command; the server rejects state-changing calls without it
const REQUESTED_BY: &str = "asdeploy";

/// REST transport for one server target
pub struct RestTransport {
    client: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<SecretString>,
}

impl RestTransport {
    /// Create a transport for the target's admin endpoint
    pub fn new(target: &ServerTarget, timeout: Duration) -> Result<Self, DeployError> {
        let client = Client::builder().timeout(timeout).build()?;

        let base_url = Url::parse(&format!("{}/", target.admin_url()))
            .map_err(|e| DeployError::ConfigError(format!("Invalid admin URL: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            username: target.username.clone(),
            password: target
                .password
                .as_ref()
                .map(|p| SecretString::from(p.expose_secret().to_owned())),
        })
    }

    /// Full URL of an admin command
    pub fn endpoint(&self, operation_path: &str) -> Result<Url, DeployError> {
        self.base_url
            .join(&format!("{}{}", COMMAND_ROOT, operation_path))
            .map_err(|e| DeployError::ConfigError(format!("Invalid command path: {}", e)))
    }

    async fn send(&self, request: TransportRequest) -> Result<InvocationResult, DeployError> {
        let url = self.endpoint(&request.operation_path)?;
        debug!("POST {}", url);

        let mut builder = self
            .client
            .post(url)
            .header(header::ACCEPT, request.content_type.as_str())
            .header("X-Requested-By", REQUESTED_BY);

        if let Some(username) = &self.username {
            builder = builder.basic_auth(
                username,
                self.password.as_ref().map(|p| p.expose_secret()),
            );
        }

        if let Some(path) = &request.upload_file {
            let file = tokio::fs::File::open(path).await?;
            let length = file.metadata().await?.len();
            debug!("Uploading {} ({} bytes)", path.display(), length);
            builder = builder
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .header(header::CONTENT_LENGTH, length)
                .body(Body::wrap_stream(ReaderStream::new(file)));
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match ActionReport::parse(&body) {
            Ok(report) if status.is_success() && report.exit_code.is_success() => {
                Ok(InvocationResult::Completed(report))
            }
            Ok(report) => {
                let message = report
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status));
                error!("Command failed: {} - {}", status, message);
                Ok(InvocationResult::Failed {
                    status: Some(status.as_u16()),
                    message,
                })
            }
            Err(e) if status.is_success() => {
                warn!("Unreadable report with status {}: {}", status, e);
                Ok(InvocationResult::Unreadable {
                    status: status.as_u16(),
                    detail: e.to_string(),
                })
            }
            Err(e) => {
                error!("Unreadable report: {} - {}", status, e);
                let message = if body.trim().is_empty() {
                    format!("HTTP {}: {}", status, e)
                } else {
                    body
                };
                Ok(InvocationResult::Failed {
                    status: Some(status.as_u16()),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn invoke(&self, request: TransportRequest) -> InvocationResult {
        match self.send(request).await {
            Ok(result) => result,
            Err(e) => {
                error!("Request to {} failed: {}", self.base_url, e);
                InvocationResult::Failed {
                    status: None,
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Builds a [`RestTransport`] per target
#[derive(Debug, Clone)]
pub struct RestTransportProvider {
    timeout: Duration,
}

impl RestTransportProvider {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl TransportProvider for RestTransportProvider {
    fn transport_for(&self, target: &ServerTarget) -> Result<Arc<dyn Transport>, DeployError> {
        Ok(Arc::new(RestTransport::new(target, self.timeout)?))
    }
}
