//! Cluster manager topology: hosts, clusters, services and the deployment tree.
//!
//! These are the parsed collections the resolver works on. How they are
//! obtained is left to a [`TopologySource`] implementation.

pub mod schema;
pub mod snapshot;
pub mod source;

use serde::{Deserialize, Serialize};

pub use schema::{decode_clusters, decode_deployment, decode_hosts, decode_services};
pub use snapshot::SnapshotSource;
pub use source::{TopologySource, TransportError};

/// A host registered in the cluster manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub host_id: String,
    pub host_name: String,
    pub ip_address: String,
    /// Cluster the host is assigned to, if any
    pub cluster_name: Option<String>,
    pub rack_id: Option<String>,
}

impl Host {
    pub fn new(
        host_id: impl Into<String>,
        host_name: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            host_id: host_id.into(),
            host_name: host_name.into(),
            ip_address: ip_address.into(),
            cluster_name: None,
            rack_id: None,
        }
    }

    pub fn in_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster_name = Some(cluster.into());
        self
    }

    pub fn belongs_to(&self, cluster: &str) -> bool {
        self.cluster_name.as_deref() == Some(cluster)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub display_name: String,
    pub version: Option<String>,
    pub full_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub service_type: String,
    pub display_name: String,
    pub state: Option<String>,
    pub cluster_name: String,
}

/// Full deployment: clusters, their services, and role placements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTree {
    pub clusters: Vec<DeployedCluster>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedCluster {
    pub name: String,
    pub display_name: String,
    pub version: Option<String>,
    pub services: Vec<DeployedService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedService {
    pub name: String,
    /// Service type such as `HDFS`; inventory lookups are keyed by this
    pub service_type: String,
    pub roles: Vec<RoleAssignment>,
}

/// One role instance placed on one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub name: String,
    /// Role type such as `NAMENODE`
    pub role_type: String,
    pub host_id: String,
}

impl DeploymentTree {
    pub fn cluster(&self, name: &str) -> Option<&DeployedCluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// Clusters in deployment order, without their services.
    pub fn clusters(&self) -> Vec<Cluster> {
        self.clusters
            .iter()
            .map(|c| Cluster {
                name: c.name.clone(),
                display_name: c.display_name.clone(),
                version: c.version.clone(),
                full_version: None,
            })
            .collect()
    }

    /// Services of one cluster; empty when the cluster is not deployed.
    pub fn services(&self, cluster: &str) -> Vec<Service> {
        self.cluster(cluster)
            .map(|c| {
                c.services
                    .iter()
                    .map(|s| Service {
                        name: s.name.clone(),
                        service_type: s.service_type.clone(),
                        display_name: s.name.clone(),
                        state: None,
                        cluster_name: c.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
