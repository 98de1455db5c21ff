//! Cluster manager REST payload shapes.
//!
//! Collections arrive wrapped in `{"items": [...]}` with camelCase keys; the
//! deployment export nests clusters, services and roles. Unknown keys are
//! ignored so payloads from newer API versions still decode.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::source::TransportError;
use super::{Cluster, DeployedCluster, DeployedService, DeploymentTree, Host, RoleAssignment, Service};

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ItemList<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterRef {
    cluster_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostRef {
    host_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiHost {
    host_id: String,
    #[serde(rename = "hostname")]
    host_name: String,
    ip_address: String,
    #[serde(default)]
    rack_id: Option<String>,
    #[serde(default)]
    cluster_ref: Option<ClusterRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCluster {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    full_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiService {
    name: String,
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    service_state: Option<String>,
    #[serde(default)]
    cluster_ref: Option<ClusterRef>,
}

#[derive(Debug, Deserialize)]
struct ApiDeployment {
    #[serde(default)]
    clusters: Vec<ApiDeployedCluster>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiDeployedCluster {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    services: Vec<ApiDeployedService>,
}

#[derive(Debug, Deserialize)]
struct ApiDeployedService {
    name: String,
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    roles: Vec<ApiRole>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRole {
    name: String,
    #[serde(rename = "type")]
    role_type: String,
    host_ref: HostRef,
}

fn decode<T: DeserializeOwned>(resource: &'static str, content: &str) -> Result<T, TransportError> {
    serde_json::from_str(content).map_err(|source| TransportError::Decode { resource, source })
}

/// Decode a host list payload.
///
/// Rejects hosts without a host name or IP address.
pub fn decode_hosts(content: &str) -> Result<Vec<Host>, TransportError> {
    let list: ItemList<ApiHost> = decode("hosts", content)?;

    list.items
        .into_iter()
        .map(|host| {
            if host.host_name.is_empty() || host.ip_address.is_empty() {
                return Err(TransportError::Invalid {
                    resource: "hosts",
                    message: format!("host '{}' has no host name or IP address", host.host_id),
                });
            }
            Ok(Host {
                host_id: host.host_id,
                host_name: host.host_name,
                ip_address: host.ip_address,
                cluster_name: host.cluster_ref.map(|r| r.cluster_name),
                rack_id: host.rack_id,
            })
        })
        .collect()
}

pub fn decode_clusters(content: &str) -> Result<Vec<Cluster>, TransportError> {
    let list: ItemList<ApiCluster> = decode("clusters", content)?;

    Ok(list
        .items
        .into_iter()
        .map(|c| Cluster {
            display_name: c.display_name.unwrap_or_else(|| c.name.clone()),
            name: c.name,
            version: c.version,
            full_version: c.full_version,
        })
        .collect())
}

/// Decode the service list of `cluster`.
///
/// The cluster reference inside each item wins over `cluster` when present.
pub fn decode_services(content: &str, cluster: &str) -> Result<Vec<Service>, TransportError> {
    let list: ItemList<ApiService> = decode("services", content)?;

    Ok(list
        .items
        .into_iter()
        .map(|s| Service {
            display_name: s.display_name.unwrap_or_else(|| s.name.clone()),
            name: s.name,
            service_type: s.service_type,
            state: s.service_state,
            cluster_name: s
                .cluster_ref
                .map(|r| r.cluster_name)
                .unwrap_or_else(|| cluster.to_string()),
        })
        .collect())
}

pub fn decode_deployment(content: &str) -> Result<DeploymentTree, TransportError> {
    let deployment: ApiDeployment = decode("deployment", content)?;

    let clusters = deployment
        .clusters
        .into_iter()
        .map(|c| DeployedCluster {
            display_name: c.display_name.unwrap_or_else(|| c.name.clone()),
            name: c.name,
            version: c.version,
            services: c
                .services
                .into_iter()
                .map(|s| DeployedService {
                    name: s.name,
                    service_type: s.service_type,
                    roles: s
                        .roles
                        .into_iter()
                        .map(|r| RoleAssignment {
                            name: r.name,
                            role_type: r.role_type,
                            host_id: r.host_ref.host_id,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Ok(DeploymentTree { clusters })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hosts_with_cluster_ref() {
        let json = r#"{
            "items": [
                {
                    "hostId": "id-1",
                    "hostname": "h1.example.com",
                    "ipAddress": "10.0.0.1",
                    "rackId": "/default",
                    "clusterRef": {"clusterName": "c1"},
                    "healthSummary": "GOOD"
                },
                {
                    "hostId": "id-2",
                    "hostname": "h2.example.com",
                    "ipAddress": "10.0.0.2"
                }
            ]
        }"#;

        let hosts = decode_hosts(json).unwrap();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].host_name, "h1.example.com");
        assert_eq!(hosts[0].cluster_name.as_deref(), Some("c1"));
        assert_eq!(hosts[0].rack_id.as_deref(), Some("/default"));
        assert!(hosts[1].cluster_name.is_none());
    }

    #[test]
    fn test_decode_hosts_rejects_empty_address() {
        let json = r#"{"items": [{"hostId": "id-1", "hostname": "h1", "ipAddress": ""}]}"#;
        let err = decode_hosts(json).unwrap_err();
        assert!(matches!(err, TransportError::Invalid { .. }));
    }

    #[test]
    fn test_decode_hosts_malformed_json() {
        let err = decode_hosts("{ not json").unwrap_err();
        assert!(err.to_string().contains("Failed to decode hosts"));
    }

    #[test]
    fn test_decode_empty_item_list() {
        assert!(decode_hosts("{}").unwrap().is_empty());
        assert!(decode_clusters(r#"{"items": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_decode_services_falls_back_to_requested_cluster() {
        let json = r#"{"items": [
            {"name": "hdfs", "type": "HDFS", "serviceState": "STARTED"},
            {"name": "yarn", "type": "YARN", "clusterRef": {"clusterName": "other"}}
        ]}"#;

        let services = decode_services(json, "c1").unwrap();
        assert_eq!(services[0].cluster_name, "c1");
        assert_eq!(services[0].display_name, "hdfs");
        assert_eq!(services[0].state.as_deref(), Some("STARTED"));
        assert_eq!(services[1].cluster_name, "other");
    }

    #[test]
    fn test_decode_deployment_tree() {
        let json = r#"{
            "timestamp": "2020-01-01T00:00:00.000Z",
            "clusters": [{
                "name": "c1",
                "displayName": "Cluster 1",
                "version": "CDH6",
                "services": [{
                    "name": "hdfs",
                    "type": "HDFS",
                    "roles": [
                        {"name": "hdfs-NAMENODE-1", "type": "NAMENODE", "hostRef": {"hostId": "id-1"}},
                        {"name": "hdfs-DATANODE-2", "type": "DATANODE", "hostRef": {"hostId": "id-2"}}
                    ]
                }]
            }]
        }"#;

        let tree = decode_deployment(json).unwrap();
        let cluster = tree.cluster("c1").unwrap();
        assert_eq!(cluster.display_name, "Cluster 1");
        assert_eq!(cluster.services[0].service_type, "HDFS");
        assert_eq!(cluster.services[0].roles[1].role_type, "DATANODE");
        assert_eq!(cluster.services[0].roles[1].host_id, "id-2");
    }
}
