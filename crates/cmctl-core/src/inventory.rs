//! Per-cluster inventory built from the topology.
//!
//! An inventory records which hosts belong to a cluster and, when built from
//! the deployment tree, which hosts run each service and each role. Lookups
//! are keyed by service type and role type.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::topology::{DeploymentTree, Host};

/// Service type -> host names running any role of the service.
pub type ServiceHostsMap = BTreeMap<String, BTreeSet<String>>;

/// Service type -> role type -> host names running that role.
pub type ServiceRoleHostsMap = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub cluster_name: String,
    pub hosts: Vec<Host>,
    pub service_hosts: ServiceHostsMap,
    pub service_role_hosts: ServiceRoleHostsMap,
}

impl Inventory {
    pub fn host_names(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(|h| h.host_name.as_str())
    }

    /// Hosts running `service`, `None` when the service is not deployed here.
    pub fn service_members(&self, service: &str) -> Option<&BTreeSet<String>> {
        self.service_hosts.get(service)
    }

    /// Role type -> hosts for `service`, `None` when it is not deployed here.
    pub fn role_members(&self, service: &str) -> Option<&BTreeMap<String, BTreeSet<String>>> {
        self.service_role_hosts.get(service)
    }
}

/// Inventory with host membership only; the service maps stay empty.
pub fn build_inventory(cluster: &str, hosts: &[Host]) -> Inventory {
    Inventory {
        cluster_name: cluster.to_string(),
        hosts: hosts.iter().filter(|h| h.belongs_to(cluster)).cloned().collect(),
        ..Inventory::default()
    }
}

/// One fully populated inventory per deployed cluster.
///
/// Role placements reference hosts by id; ids missing from `hosts` are
/// skipped.
pub fn inventories_from_deployment(deployment: &DeploymentTree, hosts: &[Host]) -> Vec<Inventory> {
    let names_by_id: HashMap<&str, &str> = hosts
        .iter()
        .map(|h| (h.host_id.as_str(), h.host_name.as_str()))
        .collect();

    deployment
        .clusters
        .iter()
        .map(|cluster| {
            let mut inventory = build_inventory(&cluster.name, hosts);

            for service in &cluster.services {
                for role in &service.roles {
                    let Some(host_name) = names_by_id.get(role.host_id.as_str()) else {
                        tracing::warn!(
                            cluster = %cluster.name,
                            role = %role.name,
                            host_id = %role.host_id,
                            "role assigned to unknown host, skipping"
                        );
                        continue;
                    };

                    inventory
                        .service_role_hosts
                        .entry(service.service_type.clone())
                        .or_default()
                        .entry(role.role_type.clone())
                        .or_default()
                        .insert(host_name.to_string());
                    inventory
                        .service_hosts
                        .entry(service.service_type.clone())
                        .or_default()
                        .insert(host_name.to_string());
                }
            }

            inventory
        })
        .collect()
}
