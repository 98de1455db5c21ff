//! Tests for filter construction from selector strings.

use cmctl_core::filter::{Filter, FilterError, TargetMode};

#[test]
fn empty_selectors_leave_fields_empty() {
    let filter = Filter::from_selectors("", "", "", "", false).unwrap();
    assert_eq!(filter, Filter::new());
    assert_eq!(filter.mode(), TargetMode::All);
}

#[test]
fn selectors_split_on_commas() {
    let filter = Filter::from_selectors("h1,h2", "c1", "HDFS", "NAMENODE,DATANODE", false).unwrap();

    assert_eq!(filter.hosts, vec!["h1", "h2"]);
    assert_eq!(filter.clusters, vec!["c1"]);
    assert_eq!(filter.services, vec!["HDFS"]);
    assert_eq!(filter.roles, vec!["NAMENODE", "DATANODE"]);
    assert!(!filter.server);
}

#[test]
fn roles_without_service_are_rejected() {
    let err = Filter::from_selectors("", "", "", "DATANODE", false).unwrap_err();
    assert_eq!(err, FilterError::RolesRequireSingleService { services: 0 });
    assert_eq!(err.to_string(), "use exactly 1 service filter with roles filter");
}

#[test]
fn roles_with_two_services_are_rejected() {
    let result = Filter::from_selectors("", "", "HDFS,YARN", "DATANODE", false);
    assert!(matches!(
        result,
        Err(FilterError::RolesRequireSingleService { services: 2 })
    ));
}

#[test]
fn server_with_clusters_is_accepted() {
    let filter = Filter::from_selectors("", "c1", "", "", true).unwrap();
    assert_eq!(filter.mode(), TargetMode::TargetServer);
}

#[test]
fn services_without_roles_may_be_many() {
    let filter = Filter::from_selectors("", "", "HDFS,YARN,ZOOKEEPER", "", false).unwrap();
    assert_eq!(filter.mode(), TargetMode::ByServices);
    assert_eq!(filter.services.len(), 3);
}

#[test]
fn cluster_constraint() {
    let open = Filter::new();
    assert!(open.allows_cluster("anything"));

    let constrained = Filter::new().with_clusters(["c1", "c2"]);
    assert!(constrained.allows_cluster("c2"));
    assert!(!constrained.allows_cluster("c3"));
}
