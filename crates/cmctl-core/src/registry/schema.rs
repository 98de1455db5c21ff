//! Schema for registry.toml
//!
//! ```toml
//! [servers.vagrant]
//! host = "c7401.ambari.apache.org"
//! port = 7180
//! protocol = "http"
//! username = "admin"
//! cluster = "cl1"
//! profile = "vagrant-ssh"
//! active = true
//!
//! [profiles.vagrant-ssh]
//! key_path = "/home/me/.ssh/id_rsa"
//! port = 22
//! username = "vagrant"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Root structure of registry.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Cluster manager servers by entry name
    #[serde(default)]
    pub servers: BTreeMap<String, ServerEntry>,

    /// SSH connection profiles by name
    #[serde(default)]
    pub profiles: BTreeMap<String, ConnectionProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => f.write_str("http"),
            Protocol::Https => f.write_str("https"),
        }
    }
}

impl FromStr for Protocol {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            _ => anyhow::bail!("Use 'http' or 'https' value for protocol option"),
        }
    }
}

/// A registered cluster manager server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEntry {
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,

    #[serde(default)]
    pub protocol: Protocol,

    #[serde(default = "default_username")]
    pub username: String,

    /// Default cluster for this server
    #[serde(default)]
    pub cluster: Option<String>,

    /// Attached connection profile name
    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default)]
    pub active: bool,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_server_port() -> u16 {
    7180
}

fn default_username() -> String {
    "admin".to_string()
}

impl ServerEntry {
    /// Base URL of the cluster manager REST API.
    pub fn base_url(&self) -> anyhow::Result<Url> {
        let raw = format!("{}://{}:{}/api/", self.protocol, self.host, self.port);
        Url::parse(&raw).map_err(|e| anyhow::anyhow!("Invalid server address '{}': {}", raw, e))
    }
}

/// SSH connection settings used to reach cluster hosts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub key_path: PathBuf,

    #[serde(default = "default_ssh_port")]
    pub port: u16,

    pub username: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_ssh_port() -> u16 {
    22
}

impl RegistryFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active server, if one is selected.
    pub fn active_server(&self) -> Option<(&String, &ServerEntry)> {
        self.servers.iter().find(|(_, entry)| entry.active)
    }

    pub fn deactivate_all(&mut self) {
        for entry in self.servers.values_mut() {
            entry.active = false;
        }
    }

    /// Validate cross-entry consistency
    pub fn validate(&self) -> anyhow::Result<()> {
        let active: Vec<&String> = self
            .servers
            .iter()
            .filter(|(_, entry)| entry.active)
            .map(|(name, _)| name)
            .collect();
        if active.len() > 1 {
            anyhow::bail!(
                "Only one server entry can be active, found: {}",
                active
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        for (name, entry) in &self.servers {
            if entry.host.is_empty() {
                anyhow::bail!("Server entry '{}' has no host", name);
            }
            if let Some(profile) = &entry.profile {
                if !self.profiles.contains_key(profile) {
                    anyhow::bail!(
                        "Server entry '{}' references unknown connection profile '{}'",
                        name,
                        profile
                    );
                }
            }
        }

        Ok(())
    }
}
