//! Host resolution against the active server's topology.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::filter::Filter;
use crate::registry::RegistryStore;
use crate::resolver::{HostResolver, ResolveError};
use crate::topology::{Cluster, Service, SnapshotSource, TopologySource, TransportError};

#[derive(Debug, Clone)]
pub struct ResolveCommand {
    server_name: String,
    resolver: HostResolver<SnapshotSource>,
}

impl ResolveCommand {
    /// Build against the active server entry.
    ///
    /// Topology snapshots are read from `topology_dir` when given, otherwise
    /// from the server's directory in the store.
    pub fn for_active_server(
        store: &RegistryStore,
        topology_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let registry = store.load()?;
        let (name, entry) = registry
            .active_server()
            .ok_or_else(|| anyhow::anyhow!("No active CM selected"))?;

        let dir = topology_dir.unwrap_or_else(|| store.topology_dir(name));
        tracing::debug!(server = %name, topology = %dir.display(), "using topology snapshots");

        Ok(Self {
            server_name: name.clone(),
            resolver: HostResolver::new(entry.host.clone(), SnapshotSource::new(dir)),
        })
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn resolve(&self, filter: &Filter) -> Result<BTreeSet<String>, ResolveError> {
        self.resolver.resolve(filter)
    }

    pub fn clusters(&self) -> Result<Vec<Cluster>, TransportError> {
        self.resolver.source().fetch_clusters()
    }

    pub fn services(&self, cluster: &str) -> Result<Vec<Service>, TransportError> {
        self.resolver.source().fetch_services(cluster)
    }
}
