//! Target classification

use crate::models::target::{InstanceKind, Location, ServerTarget};

/// How the artifact reaches the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Server reads the artifact from this machine's filesystem
    LocalDefault,

    /// Server reads the artifact through a container mount
    RemoteDocker {
        host_path: String,
        container_path: String,
    },

    /// Server runs under WSL and reads the artifact through `/mnt/<drive>`
    RemoteWsl,

    /// Artifact is uploaded in the request body
    RemoteUpload,
}

impl Strategy {
    /// Whether the artifact is sent in the request body
    pub fn is_upload(&self) -> bool {
        matches!(self, Strategy::RemoteUpload)
    }
}

/// Classify a target. Must be called per deployment since target
/// configuration can change between attempts.
pub fn classify(target: &ServerTarget) -> Strategy {
    match &target.location {
        Location::Local => Strategy::LocalDefault,
        Location::Remote {
            instance_kind: InstanceKind::Docker,
            host_path: Some(host_path),
            container_path: Some(container_path),
            ..
        } if !host_path.is_empty() && !container_path.is_empty() => Strategy::RemoteDocker {
            host_path: host_path.clone(),
            container_path: container_path.clone(),
        },
        Location::Remote {
            instance_kind: InstanceKind::Wsl,
            ..
        } => Strategy::RemoteWsl,
        Location::Remote { .. } => Strategy::RemoteUpload,
    }
}
