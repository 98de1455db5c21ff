//! Registry command implementation.
//!
//! Manages server entries and connection profiles in registry.toml.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::registry::{ConnectionProfile, Protocol, RegistryFile, RegistryStore, ServerEntry};

/// Options for registering a server
#[derive(Debug, Clone)]
pub struct CreateServerOptions {
    /// Entry name
    pub name: String,
    /// Cluster manager host name
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub username: String,
    /// Default cluster
    pub cluster: Option<String>,
}

impl CreateServerOptions {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: 7180,
            protocol: Protocol::Http,
            username: "admin".to_string(),
            cluster: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }
}

/// Options for creating a connection profile
#[derive(Debug, Clone)]
pub struct CreateProfileOptions {
    pub name: String,
    /// SSH private key path; a leading `~` is expanded
    pub key_path: String,
    pub port: u16,
    pub username: String,
}

impl CreateProfileOptions {
    pub fn new(name: impl Into<String>, key_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_path: key_path.into(),
            port: 22,
            username: "cloudbreak".to_string(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }
}

/// Result of a registry operation
#[derive(Debug, Clone)]
pub struct RegistryReport {
    /// Entry name
    pub name: String,
    /// Whether the operation changed anything
    pub changed: bool,
    /// Any warnings generated
    pub warnings: Vec<String>,
}

impl RegistryReport {
    fn changed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            changed: true,
            warnings: Vec::new(),
        }
    }
}

/// Listed server entry
#[derive(Debug, Clone)]
pub struct ServerListing {
    pub name: String,
    pub entry: ServerEntry,
}

/// Listed connection profile
#[derive(Debug, Clone)]
pub struct ProfileListing {
    pub name: String,
    pub profile: ConnectionProfile,
}

/// Registry command orchestrator
#[derive(Debug, Clone)]
pub struct RegistryCommand {
    store: RegistryStore,
}

impl RegistryCommand {
    pub fn new(store: RegistryStore) -> Self {
        Self { store }
    }

    /// Create a registry command with the default store location
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(RegistryStore::with_defaults()?))
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// Create an empty registry file. Returns false when one already exists.
    pub fn init(&self) -> anyhow::Result<bool> {
        if self.store.exists() {
            return Ok(false);
        }
        self.store.save(&RegistryFile::new())?;
        tracing::info!(path = %self.store.registry_path().display(), "registry initialized");
        Ok(true)
    }

    /// Register a new server and make it the active one
    pub fn create(&self, options: &CreateServerOptions) -> anyhow::Result<RegistryReport> {
        if options.name.is_empty() {
            anyhow::bail!("Server entry name must not be empty");
        }
        if options.host.is_empty() {
            anyhow::bail!("Server host must not be empty");
        }

        let mut registry = self.store.load()?;
        if registry.servers.contains_key(&options.name) {
            anyhow::bail!("CM server entry already exists with id {}", options.name);
        }

        registry.deactivate_all();
        registry.servers.insert(
            options.name.clone(),
            ServerEntry {
                host: options.host.clone(),
                port: options.port,
                protocol: options.protocol,
                username: options.username.clone(),
                cluster: options.cluster.clone(),
                profile: None,
                active: true,
                created_at: Utc::now(),
            },
        );
        self.store.save(&registry)?;

        tracing::info!(name = %options.name, host = %options.host, "server entry registered");
        Ok(RegistryReport::changed(&options.name))
    }

    pub fn list(&self) -> anyhow::Result<Vec<ServerListing>> {
        let registry = self.store.load()?;
        Ok(registry
            .servers
            .into_iter()
            .map(|(name, entry)| ServerListing { name, entry })
            .collect())
    }

    /// The active server, if one is selected
    pub fn active(&self) -> anyhow::Result<Option<ServerListing>> {
        let registry = self.store.load()?;
        Ok(registry.active_server().map(|(name, entry)| ServerListing {
            name: name.clone(),
            entry: entry.clone(),
        }))
    }

    pub fn delete(&self, name: &str) -> anyhow::Result<RegistryReport> {
        let mut registry = self.store.load()?;
        let Some(removed) = registry.servers.remove(name) else {
            anyhow::bail!("CM registry entry does not exist with id {}", name);
        };
        self.store.save(&registry)?;

        let mut report = RegistryReport::changed(name);
        if removed.active {
            report
                .warnings
                .push("Deleted the active server; select another with 'use'".to_string());
        }
        tracing::info!(name, "server entry deleted");
        Ok(report)
    }

    /// Make `name` the only active server
    pub fn use_server(&self, name: &str) -> anyhow::Result<RegistryReport> {
        let mut registry = self.store.load()?;
        if !registry.servers.contains_key(name) {
            anyhow::bail!("CM server entry does not exist with id {}", name);
        }

        registry.deactivate_all();
        if let Some(entry) = registry.servers.get_mut(name) {
            entry.active = true;
        }
        self.store.save(&registry)?;

        tracing::info!(name, "server entry selected");
        Ok(RegistryReport::changed(name))
    }

    /// Drop all server entries. Returns how many were removed.
    pub fn clear(&self) -> anyhow::Result<usize> {
        let mut registry = self.store.load()?;
        let removed = registry.servers.len();
        registry.servers.clear();
        self.store.save(&registry)?;
        Ok(removed)
    }

    pub fn create_profile(&self, options: &CreateProfileOptions) -> anyhow::Result<RegistryReport> {
        if options.name.is_empty() {
            anyhow::bail!("Connection profile name must not be empty");
        }

        let mut registry = self.store.load()?;
        if registry.profiles.contains_key(&options.name) {
            anyhow::bail!(
                "Connection profile entry already exists with id {}",
                options.name
            );
        }

        let key_path = expand_home(&options.key_path, dirs::home_dir().as_deref());
        if !options.key_path.is_empty() && !key_path.exists() {
            anyhow::bail!("SSH key does not exist: {}", key_path.display());
        }

        registry.profiles.insert(
            options.name.clone(),
            ConnectionProfile {
                key_path,
                port: options.port,
                username: options.username.clone(),
                created_at: Utc::now(),
            },
        );
        self.store.save(&registry)?;

        tracing::info!(name = %options.name, "connection profile created");
        Ok(RegistryReport::changed(&options.name))
    }

    pub fn list_profiles(&self) -> anyhow::Result<Vec<ProfileListing>> {
        let registry = self.store.load()?;
        Ok(registry
            .profiles
            .into_iter()
            .map(|(name, profile)| ProfileListing { name, profile })
            .collect())
    }

    /// Delete a profile and detach it from every server using it
    pub fn delete_profile(&self, name: &str) -> anyhow::Result<RegistryReport> {
        let mut registry = self.store.load()?;
        if registry.profiles.remove(name).is_none() {
            anyhow::bail!("Connection profile entry does not exist with id {}", name);
        }

        let mut report = RegistryReport::changed(name);
        for (server, entry) in registry.servers.iter_mut() {
            if entry.profile.as_deref() == Some(name) {
                entry.profile = None;
                report
                    .warnings
                    .push(format!("Detached profile from server '{}'", server));
            }
        }
        self.store.save(&registry)?;
        Ok(report)
    }

    /// Drop all profiles. Returns how many were removed.
    pub fn clear_profiles(&self) -> anyhow::Result<usize> {
        let mut registry = self.store.load()?;
        let removed = registry.profiles.len();
        registry.profiles.clear();
        for entry in registry.servers.values_mut() {
            entry.profile = None;
        }
        self.store.save(&registry)?;
        Ok(removed)
    }

    /// Attach `profile` to `server`, or to the active server when `None`
    pub fn attach(&self, profile: &str, server: Option<&str>) -> anyhow::Result<RegistryReport> {
        let mut registry = self.store.load()?;

        let server_name = match server {
            Some(name) => {
                if !registry.servers.contains_key(name) {
                    anyhow::bail!("Cannot find specific CM server entry: {}", name);
                }
                name.to_string()
            }
            None => registry
                .active_server()
                .map(|(name, _)| name.clone())
                .ok_or_else(|| anyhow::anyhow!("No active CM selected"))?,
        };

        if !registry.profiles.contains_key(profile) {
            anyhow::bail!("Cannot find specific connection profile entry: {}", profile);
        }

        if let Some(entry) = registry.servers.get_mut(&server_name) {
            entry.profile = Some(profile.to_string());
        }
        self.store.save(&registry)?;

        tracing::info!(profile, server = %server_name, "profile attached");
        Ok(RegistryReport::changed(server_name))
    }
}

/// Replace a leading `~` with the home directory.
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(path),
    }
}
