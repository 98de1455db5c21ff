//! Registry store for loading and saving registry.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{RegistryFile, parser};

pub const REGISTRY_FILE: &str = "registry.toml";
pub const TOPOLOGY_DIR: &str = "topology";

#[derive(Debug, Clone)]
pub struct RegistryStore {
    root: PathBuf,
}

impl RegistryStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Store rooted at `<config_dir>/cmctl`.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let root = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("cmctl");
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry_path(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    /// Directory holding the topology snapshots of one server entry.
    pub fn topology_dir(&self, server: &str) -> PathBuf {
        self.root.join(TOPOLOGY_DIR).join(server)
    }

    pub fn exists(&self) -> bool {
        self.registry_path().exists()
    }

    pub fn load(&self) -> anyhow::Result<RegistryFile> {
        let path = self.registry_path();
        if !path.exists() {
            return Ok(RegistryFile::new());
        }
        parser::parse_registry_toml(&path)
    }

    pub fn save(&self, registry: &RegistryFile) -> anyhow::Result<()> {
        registry.validate()?;
        let content = parser::to_toml(registry).context("Failed to serialize registry to TOML")?;
        std::fs::create_dir_all(&self.root).with_context(|| {
            format!("Failed to create registry directory: {}", self.root.display())
        })?;
        let path = self.registry_path();
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write registry file: {}", path.display()))?;
        Ok(())
    }
}
