//! Topology fetching seam.

use std::path::PathBuf;

use thiserror::Error;

use super::{Cluster, DeploymentTree, Host, Service};

/// Failure to obtain or decode a topology collection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to read {resource} from {}", .path.display())]
    Io {
        resource: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {resource}: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {resource}: {message}")]
    Invalid {
        resource: &'static str,
        message: String,
    },

    #[error("Failed to fetch {resource}: {message}")]
    Unavailable {
        resource: &'static str,
        message: String,
    },
}

/// Supplies raw topology collections from a cluster manager.
///
/// Implementations decide how the data is obtained. The resolver calls each
/// method at most once per resolution and treats any error as fatal.
pub trait TopologySource {
    fn fetch_hosts(&self) -> Result<Vec<Host>, TransportError>;

    fn fetch_deployment(&self) -> Result<DeploymentTree, TransportError>;

    fn fetch_clusters(&self) -> Result<Vec<Cluster>, TransportError>;

    fn fetch_services(&self, cluster: &str) -> Result<Vec<Service>, TransportError>;
}

impl<T: TopologySource + ?Sized> TopologySource for &T {
    fn fetch_hosts(&self) -> Result<Vec<Host>, TransportError> {
        (**self).fetch_hosts()
    }

    fn fetch_deployment(&self) -> Result<DeploymentTree, TransportError> {
        (**self).fetch_deployment()
    }

    fn fetch_clusters(&self) -> Result<Vec<Cluster>, TransportError> {
        (**self).fetch_clusters()
    }

    fn fetch_services(&self, cluster: &str) -> Result<Vec<Service>, TransportError> {
        (**self).fetch_services(cluster)
    }
}
