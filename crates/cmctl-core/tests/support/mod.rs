#![allow(dead_code)]

use std::cell::Cell;

use cmctl_core::topology::{
    Cluster, DeployedCluster, DeployedService, DeploymentTree, Host, RoleAssignment, Service,
    TopologySource, TransportError,
};

/// In-memory topology that counts how often each collection is fetched.
#[derive(Debug, Default)]
pub struct FakeTopology {
    pub hosts: Vec<Host>,
    pub deployment: DeploymentTree,
    pub fail: bool,
    pub host_fetches: Cell<usize>,
    pub deployment_fetches: Cell<usize>,
}

impl FakeTopology {
    pub fn new(hosts: Vec<Host>, deployment: DeploymentTree) -> Self {
        Self {
            hosts,
            deployment,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn fetches(&self) -> (usize, usize) {
        (self.host_fetches.get(), self.deployment_fetches.get())
    }

    fn check(&self, resource: &'static str) -> Result<(), TransportError> {
        if self.fail {
            return Err(TransportError::Unavailable {
                resource,
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

impl TopologySource for FakeTopology {
    fn fetch_hosts(&self) -> Result<Vec<Host>, TransportError> {
        self.host_fetches.set(self.host_fetches.get() + 1);
        self.check("hosts")?;
        Ok(self.hosts.clone())
    }

    fn fetch_deployment(&self) -> Result<DeploymentTree, TransportError> {
        self.deployment_fetches.set(self.deployment_fetches.get() + 1);
        self.check("deployment")?;
        Ok(self.deployment.clone())
    }

    fn fetch_clusters(&self) -> Result<Vec<Cluster>, TransportError> {
        self.check("clusters")?;
        Ok(self.deployment.clusters())
    }

    fn fetch_services(&self, cluster: &str) -> Result<Vec<Service>, TransportError> {
        self.check("services")?;
        Ok(self.deployment.services(cluster))
    }
}

pub fn role(service: &str, role_type: &str, host_id: &str) -> RoleAssignment {
    RoleAssignment {
        name: format!("{}-{}-{}", service.to_lowercase(), role_type, host_id),
        role_type: role_type.to_string(),
        host_id: host_id.to_string(),
    }
}

pub fn service(service_type: &str, roles: Vec<RoleAssignment>) -> DeployedService {
    DeployedService {
        name: service_type.to_lowercase(),
        service_type: service_type.to_string(),
        roles,
    }
}

pub fn cluster(name: &str, services: Vec<DeployedService>) -> DeployedCluster {
    DeployedCluster {
        name: name.to_string(),
        display_name: name.to_string(),
        version: Some("CDH6".to_string()),
        services,
    }
}

/// Two clusters:
/// - c1: h1 (HDFS NAMENODE), h2 (HDFS DATANODE, YARN NODEMANAGER)
/// - c2: h3 (HDFS DATANODE, ZOOKEEPER SERVER)
/// h4 is registered but not assigned to any cluster.
pub fn sample_topology() -> FakeTopology {
    let hosts = vec![
        Host::new("id-1", "h1", "10.0.0.1").in_cluster("c1"),
        Host::new("id-2", "h2", "10.0.0.2").in_cluster("c1"),
        Host::new("id-3", "h3", "10.0.0.3").in_cluster("c2"),
        Host::new("id-4", "h4", "10.0.0.4"),
    ];

    let deployment = DeploymentTree {
        clusters: vec![
            cluster(
                "c1",
                vec![
                    service(
                        "HDFS",
                        vec![role("HDFS", "NAMENODE", "id-1"), role("HDFS", "DATANODE", "id-2")],
                    ),
                    service("YARN", vec![role("YARN", "NODEMANAGER", "id-2")]),
                ],
            ),
            cluster(
                "c2",
                vec![
                    service("HDFS", vec![role("HDFS", "DATANODE", "id-3")]),
                    service("ZOOKEEPER", vec![role("ZOOKEEPER", "SERVER", "id-3")]),
                ],
            ),
        ],
    };

    FakeTopology::new(hosts, deployment)
}

pub fn addresses(values: &[&str]) -> std::collections::BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}
