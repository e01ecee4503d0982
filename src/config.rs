// Copyright (c) 2025 - Cowboy AI, Inc.
//! Synthesis Configuration
//!
//! The immutable configuration snapshot for one synthesis run. The entire
//! resource graph is a pure function of this value (plus the resolved zone
//! list and public-IP scope); nothing mutates it during the build.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::CidrBlock;
use crate::errors::{TopologyError, TopologyResult};

/// NAT strategy chosen once per run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NatStrategy {
    /// No NAT: private tiers get no default route
    #[default]
    None,
    /// One NAT Gateway and Elastic IP per zone
    Gateway,
    /// A single NAT-capable compute instance shared by all zones
    Instance,
}

/// Managed-service subnet-group kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetGroupKind {
    Rds,
    Redshift,
    #[serde(rename = "elasticache")]
    ElastiCache,
    Dax,
}

impl SubnetGroupKind {
    /// All recognized kinds
    pub const ALL: [SubnetGroupKind; 4] = [
        SubnetGroupKind::Rds,
        SubnetGroupKind::Redshift,
        SubnetGroupKind::ElastiCache,
        SubnetGroupKind::Dax,
    ];

    /// Logical identifier of the grouping resource for this kind
    pub fn logical_id(&self) -> &'static str {
        match self {
            SubnetGroupKind::Rds => "RDSSubnetGroup",
            SubnetGroupKind::Redshift => "RedshiftSubnetGroup",
            SubnetGroupKind::ElastiCache => "ElastiCacheSubnetGroup",
            SubnetGroupKind::Dax => "DAXSubnetGroup",
        }
    }

    /// Declared resource type of the grouping resource
    pub fn resource_type(&self) -> &'static str {
        match self {
            SubnetGroupKind::Rds => "AWS::RDS::DBSubnetGroup",
            SubnetGroupKind::Redshift => "AWS::Redshift::ClusterSubnetGroup",
            SubnetGroupKind::ElastiCache => "AWS::ElastiCache::SubnetGroup",
            SubnetGroupKind::Dax => "AWS::DAX::SubnetGroup",
        }
    }
}

impl fmt::Display for SubnetGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            SubnetGroupKind::Rds => "rds",
            SubnetGroupKind::Redshift => "redshift",
            SubnetGroupKind::ElastiCache => "elasticache",
            SubnetGroupKind::Dax => "dax",
        };
        write!(f, "{tag}")
    }
}

/// Configuration snapshot for a synthesis run
///
/// Deserializes from the caller's option record; unknown subnet-group or
/// NAT-strategy tags are rejected during deserialization, everything else
/// at [`TopologyConfig::validate`] time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopologyConfig {
    /// Top-level address block
    pub cidr_block: CidrBlock,

    /// Zone names in order; absent means discover from `region`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,

    /// Region consulted by zone discovery when `zones` is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// NAT strategy for the private tiers
    pub nat_strategy: NatStrategy,

    /// Whether to create the Database tier
    pub create_database_subnets: bool,

    /// Cross-zone subnet groups to create from the Database tier
    pub subnet_groups: Vec<SubnetGroupKind>,

    /// Whether to create the bastion host subsystem
    pub create_bastion_host: bool,

    /// Existing key pair for the bastion host; required with the flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bastion_key_pair_name: Option<String>,

    /// Whether outputs carry stack-scoped export names
    pub export_outputs: bool,

    /// Whether to create flow logs delivered to an S3 bucket
    pub enable_flow_logs: bool,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            cidr_block: CidrBlock::parse("10.0.0.0/16").expect("valid default block"),
            zones: None,
            region: None,
            nat_strategy: NatStrategy::default(),
            create_database_subnets: false,
            subnet_groups: Vec::new(),
            create_bastion_host: false,
            bastion_key_pair_name: None,
            export_outputs: false,
            enable_flow_logs: false,
        }
    }
}

impl TopologyConfig {
    /// Validate the cross-field constraints
    ///
    /// Raised synchronously before any resource is emitted.
    pub fn validate(&self) -> TopologyResult<()> {
        if self.create_bastion_host
            && self
                .bastion_key_pair_name
                .as_deref()
                .map_or(true, str::is_empty)
        {
            return Err(TopologyError::Configuration(
                "bastionKeyPairName is required when createBastionHost is set".to_string(),
            ));
        }

        if !self.create_database_subnets && !self.subnet_groups.is_empty() {
            return Err(TopologyError::Configuration(
                "subnetGroups requires createDatabaseSubnets".to_string(),
            ));
        }

        for (index, kind) in self.subnet_groups.iter().enumerate() {
            if self.subnet_groups[..index].contains(kind) {
                return Err(TopologyError::Configuration(format!(
                    "subnetGroups contains duplicate entry: {kind}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_deserializes_camel_case_record() {
        let config: TopologyConfig = serde_json::from_str(
            r#"{
                "cidrBlock": "10.0.0.0/16",
                "zones": ["us-east-1a", "us-east-1b"],
                "natStrategy": "gateway",
                "createDatabaseSubnets": true,
                "subnetGroups": ["rds", "elasticache"],
                "exportOutputs": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.nat_strategy, NatStrategy::Gateway);
        assert_eq!(
            config.subnet_groups,
            vec![SubnetGroupKind::Rds, SubnetGroupKind::ElastiCache]
        );
        assert!(config.export_outputs);
        assert!(!config.create_bastion_host);
    }

    #[test]
    fn test_rejects_unknown_subnet_group_tag() {
        let result = serde_json::from_str::<TopologyConfig>(
            r#"{ "cidrBlock": "10.0.0.0/16", "subnetGroups": ["dynamodb"] }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bastion_requires_key_pair() {
        let config = TopologyConfig {
            zones: Some(vec!["us-east-1a".to_string()]),
            create_bastion_host: true,
            ..TopologyConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, TopologyError::Configuration(_)));
        assert!(err.to_string().contains("bastionKeyPairName"));
    }

    #[test]
    fn test_rejects_duplicate_subnet_groups() {
        let config = TopologyConfig {
            zones: Some(vec!["a".to_string(), "b".to_string()]),
            create_database_subnets: true,
            subnet_groups: vec![SubnetGroupKind::Rds, SubnetGroupKind::Rds],
            ..TopologyConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, TopologyError::Configuration(_)));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_subnet_groups_require_database_tier() {
        let config = TopologyConfig {
            zones: Some(vec!["a".to_string(), "b".to_string()]),
            subnet_groups: vec![SubnetGroupKind::Rds],
            ..TopologyConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test_case(SubnetGroupKind::Rds, "RDSSubnetGroup", "AWS::RDS::DBSubnetGroup")]
    #[test_case(SubnetGroupKind::Redshift, "RedshiftSubnetGroup", "AWS::Redshift::ClusterSubnetGroup")]
    #[test_case(SubnetGroupKind::ElastiCache, "ElastiCacheSubnetGroup", "AWS::ElastiCache::SubnetGroup")]
    #[test_case(SubnetGroupKind::Dax, "DAXSubnetGroup", "AWS::DAX::SubnetGroup")]
    fn test_subnet_group_mapping(kind: SubnetGroupKind, id: &str, resource_type: &str) {
        assert_eq!(kind.logical_id(), id);
        assert_eq!(kind.resource_type(), resource_type);
    }
}
