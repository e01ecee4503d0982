// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cross-Zone Subnet Groups
//!
//! One grouping resource per requested kind, each referencing every
//! Database-tier subnet in zone-position order. A group with fewer than
//! two member subnets is not emitted.

use serde_json::{json, Value};

use crate::config::SubnetGroupKind;
use crate::domain::Tier;
use crate::errors::TopologyResult;
use crate::graph::{reference, ResourceDefinition, ResourceGraph};
use crate::naming;

/// Build the requested subnet-group resources for the given zone count
///
/// Returns an empty contribution below two zones or with no kinds
/// requested.
pub fn build_subnet_groups(
    zone_count: usize,
    kinds: &[SubnetGroupKind],
) -> TopologyResult<ResourceGraph> {
    let mut graph = ResourceGraph::new();
    if zone_count < 2 {
        return Ok(graph);
    }

    for kind in kinds {
        graph.merge(build_subnet_group(*kind, zone_count))?;
    }

    Ok(graph)
}

/// Build one grouping resource referencing every Database-tier subnet
pub fn build_subnet_group(kind: SubnetGroupKind, zone_count: usize) -> ResourceGraph {
    let subnet_ids: Vec<Value> = (1..=zone_count)
        .map(|position| reference(naming::subnet(Tier::Database, position)))
        .collect();

    let stack_name = reference(naming::STACK_NAME);
    let properties = match kind {
        SubnetGroupKind::Rds => json!({
            "DBSubnetGroupName": stack_name,
            "DBSubnetGroupDescription": reference(naming::STACK_NAME),
            "SubnetIds": subnet_ids,
        }),
        SubnetGroupKind::Redshift => json!({
            "Description": stack_name,
            "SubnetIds": subnet_ids,
        }),
        SubnetGroupKind::ElastiCache => json!({
            "CacheSubnetGroupName": stack_name,
            "Description": reference(naming::STACK_NAME),
            "SubnetIds": subnet_ids,
        }),
        SubnetGroupKind::Dax => json!({
            "SubnetGroupName": stack_name,
            "Description": reference(naming::STACK_NAME),
            "SubnetIds": subnet_ids,
        }),
    };

    ResourceGraph::of(
        kind.logical_id(),
        ResourceDefinition::new(kind.resource_type(), properties),
    )
}
