//! Topology read from JSON snapshots of the cluster manager API.
//!
//! Layout of a snapshot directory:
//! - `hosts.json`: host list (`{"items": [...]}`)
//! - `deployment.json`: full deployment export
//! - `clusters.json` (optional): cluster list
//! - `services/<cluster>.json` (optional): service list of one cluster
//!
//! Optional files fall back to what `deployment.json` contains.

use std::path::{Path, PathBuf};

use super::schema::{decode_clusters, decode_deployment, decode_hosts, decode_services};
use super::source::{TopologySource, TransportError};
use super::{Cluster, DeploymentTree, Host, Service};

pub const HOSTS_FILE: &str = "hosts.json";
pub const DEPLOYMENT_FILE: &str = "deployment.json";
pub const CLUSTERS_FILE: &str = "clusters.json";
pub const SERVICES_DIR: &str = "services";

#[derive(Debug, Clone)]
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, resource: &'static str, path: PathBuf) -> Result<String, TransportError> {
        tracing::debug!(path = %path.display(), "reading {resource} snapshot");
        std::fs::read_to_string(&path).map_err(|source| TransportError::Io {
            resource,
            path,
            source,
        })
    }
}

impl TopologySource for SnapshotSource {
    fn fetch_hosts(&self) -> Result<Vec<Host>, TransportError> {
        let content = self.read("hosts", self.dir.join(HOSTS_FILE))?;
        decode_hosts(&content)
    }

    fn fetch_deployment(&self) -> Result<DeploymentTree, TransportError> {
        let content = self.read("deployment", self.dir.join(DEPLOYMENT_FILE))?;
        decode_deployment(&content)
    }

    fn fetch_clusters(&self) -> Result<Vec<Cluster>, TransportError> {
        let path = self.dir.join(CLUSTERS_FILE);
        if path.exists() {
            let content = self.read("clusters", path)?;
            return decode_clusters(&content);
        }
        Ok(self.fetch_deployment()?.clusters())
    }

    fn fetch_services(&self, cluster: &str) -> Result<Vec<Service>, TransportError> {
        if cluster.is_empty() || cluster.contains(['/', '\\']) || cluster.contains("..") {
            return Err(TransportError::Invalid {
                resource: "services",
                message: format!("cluster name '{cluster}' is not a valid snapshot file name"),
            });
        }

        let path = self
            .dir
            .join(SERVICES_DIR)
            .join(format!("{cluster}.json"));
        if path.exists() {
            let content = self.read("services", path)?;
            return decode_services(&content, cluster);
        }

        let deployment = self.fetch_deployment()?;
        if deployment.cluster(cluster).is_none() {
            return Err(TransportError::Unavailable {
                resource: "services",
                message: format!("cluster '{cluster}' is not part of the deployment"),
            });
        }
        Ok(deployment.services(cluster))
    }
}
