//! Server target models

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// How a target applies new deployments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployMode {
    /// Full redeploy of the artifact
    #[default]
    Default,

    /// Apply changed classes and metadata in place
    HotReload,
}

/// Execution environment of a remote instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceKind {
    #[default]
    Generic,
    Docker,
    Wsl,
}

/// Where the server instance runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Location {
    /// Same machine as the deployer
    Local,

    /// Another host, or a container/WSL distribution on this one
    Remote {
        #[serde(default)]
        instance_kind: InstanceKind,

        /// Whether the admin endpoint may currently be contacted
        #[serde(default = "default_true")]
        connection_allowed: bool,

        /// Docker only: directory on this machine mounted into the container
        #[serde(default)]
        host_path: Option<String>,

        /// Docker only: where `host_path` appears inside the container
        #[serde(default)]
        container_path: Option<String>,
    },
}

fn default_true() -> bool {
    true
}

impl Location {
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Remote { .. })
    }

    /// Instance kind for remote targets
    pub fn instance_kind(&self) -> Option<InstanceKind> {
        match self {
            Location::Local => None,
            Location::Remote { instance_kind, .. } => Some(*instance_kind),
        }
    }
}

/// An application server instance deployments are sent to
#[derive(Debug, Deserialize)]
pub struct ServerTarget {
    /// Display name, unique among configured targets
    pub name: String,

    /// Admin endpoint host
    #[serde(default = "default_host")]
    pub host: String,

    /// Admin endpoint port
    #[serde(default = "default_admin_port")]
    pub admin_port: u16,

    /// Use HTTPS for the admin endpoint
    #[serde(default)]
    pub https: bool,

    /// Admin user
    #[serde(default)]
    pub username: Option<String>,

    /// Admin password
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,

    #[serde(default)]
    pub deploy_mode: DeployMode,

    pub location: Location,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_admin_port() -> u16 {
    4848
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(SecretString::from))
}

impl ServerTarget {
    /// Create a local target on the default admin port
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: default_host(),
            admin_port: default_admin_port(),
            https: false,
            username: None,
            password: None,
            deploy_mode: DeployMode::Default,
            location: Location::Local,
        }
    }

    /// Create a remote target
    pub fn remote(name: impl Into<String>, host: impl Into<String>, instance_kind: InstanceKind) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            admin_port: default_admin_port(),
            https: false,
            username: None,
            password: None,
            deploy_mode: DeployMode::Default,
            location: Location::Remote {
                instance_kind,
                connection_allowed: true,
                host_path: None,
                container_path: None,
            },
        }
    }

    /// Set the docker mount mapping
    pub fn with_mount(mut self, host: impl Into<String>, container: impl Into<String>) -> Self {
        if let Location::Remote {
            host_path,
            container_path,
            ..
        } = &mut self.location
        {
            *host_path = Some(host.into());
            *container_path = Some(container.into());
        }
        self
    }

    pub fn with_deploy_mode(mut self, deploy_mode: DeployMode) -> Self {
        self.deploy_mode = deploy_mode;
        self
    }

    pub fn with_connection_allowed(mut self, allowed: bool) -> Self {
        if let Location::Remote {
            connection_allowed, ..
        } = &mut self.location
        {
            *connection_allowed = allowed;
        }
        self
    }

    pub fn is_remote(&self) -> bool {
        self.location.is_remote()
    }

    /// Remote targets can be switched off by the operator; local targets always connect
    pub fn is_connection_allowed(&self) -> bool {
        match &self.location {
            Location::Local => true,
            Location::Remote {
                connection_allowed, ..
            } => *connection_allowed,
        }
    }

    /// Base URL of the admin endpoint
    pub fn admin_url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", scheme, self.host, self.admin_port)
        } else {
            format!("{}://{}:{}", scheme, self.host, self.admin_port)
        }
    }
}
