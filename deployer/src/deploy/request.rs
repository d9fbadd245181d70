//! Deployment request construction

use std::path::{Path, PathBuf};

use urlencoding::encode;

use crate::deploy::strategy::Strategy;
use crate::errors::DeployError;
use crate::models::target::DeployMode;

/// Admin command used for deployments
pub const DEPLOY_OPERATION: &str = "deploy";

/// Extensions stripped when deriving the application name
const ARCHIVE_EXTENSIONS: [&str; 3] = ["ear", "war", "jar"];

/// A deploy command ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// Query parameters in emission order, values already percent-encoded
    params: Vec<(&'static str, String)>,
    upload_file: Option<PathBuf>,
    application_name: String,
}

impl DeploymentRequest {
    /// Query string without the leading `?`
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Command path relative to the admin endpoint, e.g. `deploy?force=true&...`
    pub fn operation_path(&self) -> String {
        format!("{}?{}", DEPLOY_OPERATION, self.query_string())
    }

    /// Encoded value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Local file streamed as the request body, upload strategy only
    pub fn upload_file(&self) -> Option<&Path> {
        self.upload_file.as_deref()
    }

    /// Logical name the application is deployed under
    pub fn application_name(&self) -> &str {
        &self.application_name
    }
}

/// Build the deploy request for an artifact
pub fn build_request(
    artifact: &Path,
    strategy: &Strategy,
    deploy_mode: DeployMode,
    metadata_changed: bool,
    sources_changed: &[String],
) -> Result<DeploymentRequest, DeployError> {
    let raw_path = artifact.to_string_lossy();
    let name = application_name(&raw_path)?;

    let mut params: Vec<(&'static str, String)> = vec![("force", "true".to_string())];
    let mut upload_file = None;

    match strategy {
        Strategy::LocalDefault => {
            params.push(("DEFAULT", encode(&raw_path).into_owned()));
        }
        Strategy::RemoteDocker {
            host_path,
            container_path,
        } => {
            let path = to_container_path(&raw_path, host_path, container_path)?;
            params.push(("DEFAULT", encode(&path).into_owned()));
        }
        Strategy::RemoteWsl => {
            params.push(("DEFAULT", encode(&to_wsl_path(&raw_path)).into_owned()));
        }
        Strategy::RemoteUpload => {
            params.push(("upload", "true".to_string()));
            upload_file = Some(artifact.to_path_buf());
        }
    }
    params.push(("name", encode(&name).into_owned()));

    if deploy_mode == DeployMode::HotReload {
        params.push(("hotDeploy", "true".to_string()));
        if metadata_changed {
            params.push(("metadataChanged", "true".to_string()));
        }
        if !sources_changed.is_empty() {
            let sources = sources_changed
                .iter()
                .map(|s| encode(s).into_owned())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("sourcesChanged", sources));
        }
    }

    Ok(DeploymentRequest {
        params,
        upload_file,
        application_name: name,
    })
}

/// Base name of the artifact, without `.ear`/`.war`/`.jar`
pub fn application_name(artifact: &str) -> Result<String, DeployError> {
    let normalized = normalize_separators(artifact);
    let base = normalized
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let name = match base.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && ARCHIVE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem
        }
        _ => base,
    };

    if name.is_empty() {
        return Err(DeployError::Precondition(format!(
            "Cannot derive an application name from '{}'",
            artifact
        )));
    }
    Ok(name.to_string())
}

/// Replace the mounted host directory with its container counterpart
pub fn to_container_path(
    artifact: &str,
    host_path: &str,
    container_path: &str,
) -> Result<String, DeployError> {
    let artifact = normalize_separators(artifact);
    let host = normalize_separators(host_path);
    let host = host.trim_end_matches('/');

    let relative = artifact
        .strip_prefix(host)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .ok_or_else(|| {
            DeployError::Precondition(format!(
                "Artifact '{}' is not under the mounted directory '{}'",
                artifact, host_path
            ))
        })?;

    let container = normalize_separators(container_path);
    Ok(format!("{}{}", container.trim_end_matches('/'), relative))
}

/// `C:\Users\u\app.war` -> `/mnt/c/Users/u/app.war`
pub fn to_wsl_path(artifact: &str) -> String {
    let normalized = normalize_separators(artifact);
    let bytes = normalized.as_bytes();
    let has_drive = bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/');

    if has_drive {
        let drive = (bytes[0] as char).to_ascii_lowercase();
        format!("/mnt/{}{}", drive, &normalized[2..])
    } else {
        normalized
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}
