//! Workspace models

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A project root the deployer knows about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Display name
    pub name: String,

    /// Root directory
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    /// Whether the path lies inside this workspace
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

/// Registered workspaces
#[derive(Debug, Clone, Default)]
pub struct WorkspaceRegistry {
    workspaces: Vec<Workspace>,
}

impl WorkspaceRegistry {
    pub fn new(workspaces: Vec<Workspace>) -> Self {
        Self { workspaces }
    }

    /// Workspace owning the path; the deepest root wins when roots nest
    pub fn owner_of(&self, path: &Path) -> Option<&Workspace> {
        self.workspaces
            .iter()
            .filter(|ws| ws.contains(path))
            .max_by_key(|ws| ws.root.components().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_prefers_nested_root() {
        let registry = WorkspaceRegistry::new(vec![
            Workspace::new("mono", "/home/u/mono"),
            Workspace::new("shop", "/home/u/mono/shop"),
        ]);

        let owner = registry
            .owner_of(Path::new("/home/u/mono/shop/target/shop.war"))
            .unwrap();
        assert_eq!(owner.name, "shop");

        let owner = registry
            .owner_of(Path::new("/home/u/mono/lib/target/lib.jar"))
            .unwrap();
        assert_eq!(owner.name, "mono");
    }

    #[test]
    fn test_owner_requires_component_boundary() {
        let registry = WorkspaceRegistry::new(vec![Workspace::new("app", "/home/u/app")]);
        assert!(registry.owner_of(Path::new("/home/u/application/x.war")).is_none());
    }
}
