//! Resolve a [`Filter`] to the set of host addresses it targets.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::filter::{Filter, FilterError, TargetMode};
use crate::inventory::{Inventory, build_inventory, inventories_from_deployment};
use crate::topology::{Host, TopologySource, TransportError};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Validation(#[from] FilterError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Resolves filters against one controller's topology.
#[derive(Debug, Clone)]
pub struct HostResolver<S> {
    controller_address: String,
    source: S,
}

impl<S: TopologySource> HostResolver<S> {
    pub fn new(controller_address: impl Into<String>, source: S) -> Self {
        Self {
            controller_address: controller_address.into(),
            source,
        }
    }

    pub fn controller_address(&self) -> &str {
        &self.controller_address
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Compute the addresses targeted by `filter`.
    ///
    /// The filter is validated before anything is fetched. Only the
    /// collections the active mode needs are fetched, each at most once.
    pub fn resolve(&self, filter: &Filter) -> Result<BTreeSet<String>, ResolveError> {
        filter.validate()?;

        let mode = filter.mode();
        tracing::debug!(?mode, "resolving target hosts");

        if mode == TargetMode::TargetServer {
            return Ok(BTreeSet::from([self.controller_address.clone()]));
        }

        let hosts = self.source.fetch_hosts()?;
        let members = if mode.needs_deployment() {
            let deployment = self.source.fetch_deployment()?;
            let inventories = inventories_from_deployment(&deployment, &hosts);
            if mode == TargetMode::ByRoles {
                role_members(&inventories, filter)
            } else {
                service_members(&inventories, filter)
            }
        } else if mode == TargetMode::ByClusters {
            cluster_members(&filter.clusters, &hosts)
        } else {
            BTreeSet::new()
        };

        tracing::debug!(members = members.len(), hosts = hosts.len(), "selecting addresses");
        Ok(select_addresses(&hosts, filter, &members))
    }
}

/// Host names of every listed cluster.
pub fn cluster_members(clusters: &[String], hosts: &[Host]) -> BTreeSet<String> {
    clusters
        .iter()
        .flat_map(|cluster| {
            build_inventory(cluster, hosts)
                .hosts
                .into_iter()
                .map(|h| h.host_name)
        })
        .collect()
}

/// Hosts running any of `filter.roles` of the single service in the filter,
/// within the clusters the filter allows.
pub fn role_members(inventories: &[Inventory], filter: &Filter) -> BTreeSet<String> {
    let Some(service) = filter.services.first() else {
        return BTreeSet::new();
    };

    inventories
        .iter()
        .filter(|inventory| filter.allows_cluster(&inventory.cluster_name))
        .filter_map(|inventory| inventory.role_members(service))
        .flat_map(|roles| {
            roles
                .iter()
                .filter(|(role, _)| filter.roles.contains(role))
                .flat_map(|(_, hosts)| hosts.iter().cloned())
        })
        .collect()
}

/// Hosts running any of `filter.services`, within the clusters the filter
/// allows.
pub fn service_members(inventories: &[Inventory], filter: &Filter) -> BTreeSet<String> {
    inventories
        .iter()
        .filter(|inventory| filter.allows_cluster(&inventory.cluster_name))
        .flat_map(|inventory| {
            filter
                .services
                .iter()
                .filter_map(|service| inventory.service_members(service))
                .flat_map(|hosts| hosts.iter().cloned())
        })
        .collect()
}

/// Final selection over the fetched hosts.
///
/// Explicit host names restrict by name. A non-empty `members` set keeps a
/// host when it contains the host's name or address; an empty one keeps
/// every host.
pub fn select_addresses(hosts: &[Host], filter: &Filter, members: &BTreeSet<String>) -> BTreeSet<String> {
    hosts
        .iter()
        .filter(|host| filter.hosts.is_empty() || filter.hosts.contains(&host.host_name))
        .filter(|host| {
            members.is_empty()
                || members.contains(&host.host_name)
                || members.contains(&host.ip_address)
        })
        .map(|host| host.ip_address.clone())
        .collect()
}
