//! User-facing notifications

use tracing::{error, info, warn};

/// Everything the deployer shows to the user
pub trait DeployUi: Send + Sync {
    fn show_warning(&self, message: &str);

    fn show_error(&self, message: &str);

    /// Bring the target's output log to the front
    fn reveal_output(&self, target: &str);

    /// Open a freshly deployed application
    fn open_application(&self, target: &str, application: &str);

    /// Reload the list of applications running on a target
    fn refresh_applications(&self, target: &str);

    /// Reload the server list view
    fn refresh_server_list(&self);

    /// Show a status message for a scope, replacing any previous one
    fn publish_status(&self, scope: &str, message: &str);

    fn hide_status(&self, scope: &str);
}

/// Renders notifications as log events
#[derive(Debug, Clone, Default)]
pub struct TracingUi;

impl DeployUi for TracingUi {
    fn show_warning(&self, message: &str) {
        warn!("{}", message);
    }

    fn show_error(&self, message: &str) {
        error!("{}", message);
    }

    fn reveal_output(&self, target: &str) {
        info!(target_name = target, "Deployment output follows");
    }

    fn open_application(&self, target: &str, application: &str) {
        info!(target_name = target, "Application {} is available", application);
    }

    fn refresh_applications(&self, target: &str) {
        info!(target_name = target, "Refreshing applications");
    }

    fn refresh_server_list(&self) {
        info!("Refreshing server list");
    }

    fn publish_status(&self, scope: &str, message: &str) {
        info!(scope, "{}", message);
    }

    fn hide_status(&self, scope: &str) {
        info!(scope, "Status cleared");
    }
}
