//! Tests for per-cluster inventory construction.

mod support;

use cmctl_core::inventory::{build_inventory, inventories_from_deployment};
use cmctl_core::topology::{DeploymentTree, Host};

use support::{cluster, role, sample_topology, service};

#[test]
fn cluster_inventory_has_membership_only() {
    let topology = sample_topology();

    let inventory = build_inventory("c1", &topology.hosts);

    assert_eq!(inventory.cluster_name, "c1");
    assert_eq!(inventory.host_names().collect::<Vec<_>>(), vec!["h1", "h2"]);
    assert!(inventory.service_hosts.is_empty());
    assert!(inventory.service_role_hosts.is_empty());
}

#[test]
fn unknown_cluster_inventory_is_empty() {
    let topology = sample_topology();
    let inventory = build_inventory("missing", &topology.hosts);
    assert!(inventory.hosts.is_empty());
}

#[test]
fn deployment_inventories_one_per_cluster() {
    let topology = sample_topology();

    let inventories = inventories_from_deployment(&topology.deployment, &topology.hosts);

    assert_eq!(inventories.len(), 2);
    assert_eq!(inventories[0].cluster_name, "c1");
    assert_eq!(inventories[1].cluster_name, "c2");
    assert_eq!(inventories[1].host_names().collect::<Vec<_>>(), vec!["h3"]);
}

#[test]
fn deployment_inventory_maps_services_and_roles() {
    let topology = sample_topology();

    let inventories = inventories_from_deployment(&topology.deployment, &topology.hosts);
    let c1 = &inventories[0];

    let hdfs: Vec<_> = c1.service_hosts["HDFS"].iter().cloned().collect();
    assert_eq!(hdfs, vec!["h1", "h2"]);
    let yarn: Vec<_> = c1.service_hosts["YARN"].iter().cloned().collect();
    assert_eq!(yarn, vec!["h2"]);

    let hdfs_roles = &c1.service_role_hosts["HDFS"];
    assert!(hdfs_roles["NAMENODE"].contains("h1"));
    assert!(hdfs_roles["DATANODE"].contains("h2"));
    assert!(!hdfs_roles.contains_key("NODEMANAGER"));
}

#[test]
fn every_role_host_appears_in_service_hosts() {
    let topology = sample_topology();

    for inventory in inventories_from_deployment(&topology.deployment, &topology.hosts) {
        for (service, roles) in &inventory.service_role_hosts {
            let service_hosts = &inventory.service_hosts[service];
            for hosts in roles.values() {
                assert!(hosts.is_subset(service_hosts));
            }
        }
    }
}

#[test]
fn roles_on_unknown_hosts_are_skipped() {
    let hosts = vec![Host::new("id-1", "h1", "10.0.0.1").in_cluster("c1")];
    let deployment = DeploymentTree {
        clusters: vec![cluster(
            "c1",
            vec![service(
                "HDFS",
                vec![role("HDFS", "NAMENODE", "id-1"), role("HDFS", "DATANODE", "id-9")],
            )],
        )],
    };

    let inventories = inventories_from_deployment(&deployment, &hosts);
    let roles = &inventories[0].service_role_hosts["HDFS"];

    assert!(roles.contains_key("NAMENODE"));
    assert!(!roles.contains_key("DATANODE"));
    assert_eq!(inventories[0].service_hosts["HDFS"].len(), 1);
}

#[test]
fn empty_deployment_yields_no_inventories() {
    let topology = sample_topology();
    let inventories = inventories_from_deployment(&DeploymentTree::default(), &topology.hosts);
    assert!(inventories.is_empty());
}
