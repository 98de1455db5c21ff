//! cmctl Core Library
//!
//! Resolves target hosts of a cluster manager from a declarative filter over
//! clusters, services, roles and host names, and keeps the local registry of
//! cluster manager servers.

pub mod commands;
pub mod filter;
pub mod inventory;
pub mod registry;
pub mod resolver;
pub mod topology;

/// Re-exports of commonly used types
pub mod prelude {
    // Selection
    pub use crate::filter::{Filter, FilterError, TargetMode};
    pub use crate::resolver::{HostResolver, ResolveError};

    // Topology
    pub use crate::inventory::{Inventory, build_inventory, inventories_from_deployment};
    pub use crate::topology::{
        Cluster, DeploymentTree, Host, Service, SnapshotSource, TopologySource, TransportError,
    };

    // Registry
    pub use crate::registry::{ConnectionProfile, Protocol, RegistryFile, RegistryStore, ServerEntry};
}
