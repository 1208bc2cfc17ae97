//! Integration tests for connection descriptor building and validation.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::time::Duration;

use rivulet::descriptor::{
    ConnectionDescriptor, DEFAULT_SENTINEL_PORT, DEFAULT_STANDALONE_PORT, DEFAULT_TIMEOUT,
    DescriptorError, Endpoint, Topology,
};

mod topology_selection {
    use super::*;

    #[test]
    fn standalone_with_defaults() {
        let descriptor = ConnectionDescriptor::standalone("localhost").build().unwrap();

        assert_eq!(
            descriptor.topology,
            Topology::Standalone {
                endpoint: Endpoint::new("localhost", DEFAULT_STANDALONE_PORT),
            }
        );
        assert_eq!(descriptor.timeout, DEFAULT_TIMEOUT);
        assert_eq!(descriptor.database, 0);
    }

    #[test]
    fn sentinel_requires_master_id() {
        let result = ConnectionDescriptor::builder()
            .sentinel(Endpoint::new("s1", 26379))
            .build();

        assert_eq!(result.err(), Some(DescriptorError::MissingMasterId));
    }

    #[test]
    fn sentinel_with_master_id_builds() {
        let descriptor = ConnectionDescriptor::sentinel("s1", "mymaster")
            .sentinel(Endpoint::new("s2", 26380))
            .build()
            .unwrap();

        assert_eq!(
            descriptor.topology,
            Topology::Sentinel {
                endpoints: vec![
                    Endpoint::new("s1", DEFAULT_SENTINEL_PORT),
                    Endpoint::new("s2", 26380),
                ],
                master_id: "mymaster".into(),
            }
        );
    }

    #[test]
    fn cluster_accumulates_endpoints() {
        let descriptor = ConnectionDescriptor::cluster("n1")
            .cluster(Endpoint::new("n2", 6380))
            .cluster(Endpoint::new("n3", 6381))
            .build()
            .unwrap();

        match descriptor.topology {
            Topology::Cluster { endpoints } => assert_eq!(endpoints.len(), 3),
            other => panic!("expected cluster topology, got {other:?}"),
        }
    }

    #[test]
    fn host_and_sentinels_conflict() {
        let result = ConnectionDescriptor::standalone("localhost")
            .sentinel(Endpoint::new("s1", 26379))
            .build();

        assert_eq!(
            result.err(),
            Some(DescriptorError::ConflictingTopology("standalone", "sentinel"))
        );
    }

    #[test]
    fn host_and_clusters_conflict() {
        let result = ConnectionDescriptor::standalone("localhost")
            .cluster(Endpoint::new("n1", 6379))
            .build();

        assert_eq!(
            result.err(),
            Some(DescriptorError::ConflictingTopology("standalone", "cluster"))
        );
    }

    #[test]
    fn sentinels_and_clusters_conflict() {
        let result = ConnectionDescriptor::builder()
            .sentinel(Endpoint::new("s1", 26379))
            .master_id("mymaster")
            .cluster(Endpoint::new("n1", 6379))
            .build();

        assert_eq!(
            result.err(),
            Some(DescriptorError::ConflictingTopology("sentinel", "cluster"))
        );
    }

    #[test]
    fn no_endpoints_is_rejected() {
        let result = ConnectionDescriptor::builder().database(2).build();

        assert_eq!(result.err(), Some(DescriptorError::MissingEndpoint));
    }

    #[test]
    fn empty_host_is_rejected() {
        let result = ConnectionDescriptor::builder().host("").build();

        assert_eq!(result.err(), Some(DescriptorError::EmptyHost));
    }
}

mod endpoints {
    use super::*;

    #[test]
    fn parses_host_and_port() {
        let endpoint: Endpoint = "cache.internal:6380".parse().unwrap();

        assert_eq!(endpoint, Endpoint::new("cache.internal", 6380));
    }

    #[test]
    fn rejects_out_of_range_ports() {
        for address in ["host:65536", "host:99999", "host:-1", "host:port"] {
            let result = address.parse::<Endpoint>();
            assert!(
                matches!(result, Err(DescriptorError::InvalidPort(_))),
                "{address} should have an invalid port"
            );
        }
    }

    #[test]
    fn rejects_addresses_without_separator_or_host() {
        assert_eq!(
            "justahost".parse::<Endpoint>().err(),
            Some(DescriptorError::MalformedEndpoint("justahost".into()))
        );
        assert_eq!(
            ":6379".parse::<Endpoint>().err(),
            Some(DescriptorError::MalformedEndpoint(":6379".into()))
        );
    }

    #[test]
    fn boundary_ports_are_accepted() {
        assert!("host:0".parse::<Endpoint>().is_ok());
        assert!("host:65535".parse::<Endpoint>().is_ok());
    }
}

mod options {
    use super::*;

    #[test]
    fn carries_auth_and_client_settings() {
        let descriptor = ConnectionDescriptor::standalone("localhost")
            .port(6380)
            .database(3)
            .client_name("rivulet-test")
            .password("secret")
            .timeout(Duration::from_millis(1500))
            .build()
            .unwrap();

        assert_eq!(descriptor.database, 3);
        assert_eq!(descriptor.client_name.as_deref(), Some("rivulet-test"));
        assert_eq!(descriptor.password.as_deref(), Some("secret"));
        assert_eq!(descriptor.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn display_names_the_selected_topology() {
        let descriptor = ConnectionDescriptor::standalone("localhost").build().unwrap();

        assert_eq!(descriptor.to_string(), "standalone localhost:6379 db=0");
    }
}
