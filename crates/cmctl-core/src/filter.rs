//! Host selection filter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A role name is only meaningful within a single service.
    #[error("use exactly 1 service filter with roles filter")]
    RolesRequireSingleService { services: usize },
}

/// Which part of the filter drives host selection.
///
/// Derived from the populated fields in a fixed priority order: the server
/// flag, then explicit hosts, clusters, roles and services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetMode {
    /// The controller itself; no topology is consulted.
    TargetServer,
    ByHosts,
    ByClusters,
    ByRoles,
    ByServices,
    /// Nothing selected, every host matches.
    All,
}

impl TargetMode {
    /// Whether this mode needs the deployment tree in addition to hosts.
    pub fn needs_deployment(self) -> bool {
        matches!(self, TargetMode::ByRoles | TargetMode::ByServices)
    }
}

/// Selection criterion for target hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub hosts: Vec<String>,
    pub clusters: Vec<String>,
    pub services: Vec<String>,
    pub roles: Vec<String>,
    /// Target the controller only
    pub server: bool,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from comma separated selector strings and validate it.
    pub fn from_selectors(
        hosts: &str,
        clusters: &str,
        services: &str,
        roles: &str,
        server: bool,
    ) -> Result<Self, FilterError> {
        let filter = Self {
            hosts: split_selector(hosts),
            clusters: split_selector(clusters),
            services: split_selector(services),
            roles: split_selector(roles),
            server,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_clusters<I, S>(mut self, clusters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clusters = clusters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services = services.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_server(mut self, server: bool) -> Self {
        self.server = server;
        self
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if !self.roles.is_empty() && self.services.len() != 1 {
            return Err(FilterError::RolesRequireSingleService {
                services: self.services.len(),
            });
        }
        Ok(())
    }

    pub fn mode(&self) -> TargetMode {
        if self.server {
            TargetMode::TargetServer
        } else if !self.hosts.is_empty() {
            TargetMode::ByHosts
        } else if !self.clusters.is_empty() {
            TargetMode::ByClusters
        } else if !self.roles.is_empty() {
            TargetMode::ByRoles
        } else if !self.services.is_empty() {
            TargetMode::ByServices
        } else {
            TargetMode::All
        }
    }

    /// True when `cluster` passes the cluster constraint (none means any).
    pub fn allows_cluster(&self, cluster: &str) -> bool {
        self.clusters.is_empty() || self.clusters.iter().any(|c| c == cluster)
    }
}

fn split_selector(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_selector_keeps_order() {
        assert_eq!(split_selector("b,a,c"), vec!["b", "a", "c"]);
        assert!(split_selector("").is_empty());
    }

    #[test]
    fn test_split_selector_is_literal() {
        assert_eq!(split_selector("a, b"), vec!["a", " b"]);
        assert_eq!(split_selector("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_mode_priority() {
        let filter = Filter::new()
            .with_hosts(["h1"])
            .with_clusters(["c1"])
            .with_services(["HDFS"]);
        assert_eq!(filter.mode(), TargetMode::ByHosts);
        assert_eq!(filter.clone().with_server(true).mode(), TargetMode::TargetServer);
        assert_eq!(
            filter.with_hosts(Vec::<String>::new()).mode(),
            TargetMode::ByClusters
        );
    }

    #[test]
    fn test_roles_take_priority_over_services() {
        let filter = Filter::new().with_services(["HDFS"]).with_roles(["NAMENODE"]);
        assert_eq!(filter.mode(), TargetMode::ByRoles);
        assert!(filter.mode().needs_deployment());
    }

    #[test]
    fn test_empty_filter_selects_all() {
        assert_eq!(Filter::new().mode(), TargetMode::All);
        assert!(!TargetMode::All.needs_deployment());
    }
}
