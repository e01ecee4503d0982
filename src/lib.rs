//! Declarative VPC network-topology synthesizer
//!
//! Given one top-level address block, a set of availability zones, and a
//! small set of feature flags, this crate deterministically produces a
//! complete, internally consistent graph of infrastructure resource
//! definitions: segmented public/application/database subnet tiers,
//! routing, gateways, subnet groupings, and cross-stack outputs. It never
//! provisions anything; the graph serializes to the declarative template
//! JSON a downstream provisioning engine applies.
//!
//! # Example
//!
//! ```rust
//! use vpc_topology::{build_topology, PublicIpScope, TopologyConfig};
//!
//! let config = TopologyConfig {
//!     zones: Some(vec!["us-east-1a".to_string(), "us-east-1b".to_string()]),
//!     ..TopologyConfig::default()
//! };
//! let zones = config.zones.clone().unwrap();
//!
//! let topology = build_topology(&config, &zones, &PublicIpScope::OpenFallback).unwrap();
//! assert!(topology.resources.contains("PublicSubnet1"));
//! ```

pub mod builders;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod naming;
pub mod synthesizer;

// Re-export commonly used types
pub use config::{NatStrategy, SubnetGroupKind, TopologyConfig};
pub use discovery::{PublicIpDiscovery, PublicIpScope, ZoneDiscovery};
pub use domain::{CidrBlock, Tier, Zone};
pub use errors::{TopologyError, TopologyResult};
pub use graph::{Output, Parameter, ResourceDefinition, ResourceGraph};
pub use synthesizer::{build_topology, Topology, TopologySynthesizer};
