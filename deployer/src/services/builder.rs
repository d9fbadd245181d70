//! Build collaborators

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::DeployError;
use crate::models::target::InstanceKind;
use crate::storage::settings::BuildSettings;

/// What to build, and for which kind of target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Project directory (or a prebuilt artifact)
    pub project: PathBuf,

    pub remote: bool,

    pub remote_kind: Option<InstanceKind>,

    pub auto_deploy: bool,
}

/// Produces the artifact to deploy
#[async_trait]
pub trait BuildRunner: Send + Sync {
    /// Build and return the artifact path
    async fn build_project(&self, request: &BuildRequest) -> Result<PathBuf, DeployError>;
}

/// Runs a build command in the project directory
#[derive(Debug, Clone)]
pub struct CommandBuild {
    program: String,
    args: Vec<String>,
    artifact: PathBuf,
}

impl CommandBuild {
    pub fn new(program: impl Into<String>, args: Vec<String>, artifact: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            artifact: artifact.into(),
        }
    }
}

impl From<&BuildSettings> for CommandBuild {
    fn from(settings: &BuildSettings) -> Self {
        Self::new(
            settings.program.clone(),
            settings.args.clone(),
            settings.artifact.clone(),
        )
    }
}

#[async_trait]
impl BuildRunner for CommandBuild {
    async fn build_project(&self, request: &BuildRequest) -> Result<PathBuf, DeployError> {
        info!(
            "Building {} with {} {}",
            request.project.display(),
            self.program,
            self.args.join(" ")
        );

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&request.project)
            .status()
            .await
            .map_err(|e| DeployError::BuildError(format!("Failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(DeployError::BuildError(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        let artifact = request.project.join(&self.artifact);
        ensure_exists(&artifact).await?;
        debug!("Build produced {}", artifact.display());
        Ok(artifact)
    }
}

/// Deploys an artifact that already exists
#[derive(Debug, Clone, Default)]
pub struct PrebuiltArtifact;

#[async_trait]
impl BuildRunner for PrebuiltArtifact {
    async fn build_project(&self, request: &BuildRequest) -> Result<PathBuf, DeployError> {
        ensure_exists(&request.project).await?;
        Ok(request.project.clone())
    }
}

async fn ensure_exists(artifact: &Path) -> Result<(), DeployError> {
    if tokio::fs::metadata(artifact).await.is_err() {
        return Err(DeployError::BuildError(format!(
            "Artifact not found: {}",
            artifact.display()
        )));
    }
    Ok(())
}
