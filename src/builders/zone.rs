// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-Zone Topology Builder
//!
//! For each zone, emits one subnet, route table, and association per active
//! tier, and wires each tier's default route to the gateway plan's target.
//! Identifiers depend only on the (tier, position) pair, so a stable zone
//! ordering reproduces identical identifiers across runs.

use serde_json::json;

use crate::builders::gateway::{build_route, GatewayPlan};
use crate::domain::{CidrBlock, Tier, Zone};
use crate::errors::TopologyResult;
use crate::graph::{name_tag, reference, ResourceDefinition, ResourceGraph};
use crate::naming;

/// One zone's partial graph plus its Database-tier subnet identifiers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneResources {
    pub resources: ResourceGraph,
    pub database_subnets: Vec<String>,
}

/// Build the subnet, routing, and route resources for one zone
///
/// `allocations` holds the zone's tier allocations from the precomputed
/// matrix, in tier order.
pub fn build_zone(
    zone: &Zone,
    allocations: &[(Tier, CidrBlock)],
    plan: &GatewayPlan,
) -> TopologyResult<ZoneResources> {
    let mut built = ZoneResources::default();

    for (tier, block) in allocations {
        built
            .resources
            .merge(build_subnet(*tier, zone, *block))?;
        built.resources.merge(build_route_table(*tier, zone))?;
        built
            .resources
            .merge(build_route_table_association(*tier, zone.position))?;

        let target = if tier.is_public() {
            Some(plan.public_target())
        } else {
            plan.private_target(zone.position)
        };
        if target.is_some() {
            built
                .resources
                .merge(build_route(*tier, zone.position, target)?)?;
        }

        if *tier == Tier::Database {
            built
                .database_subnets
                .push(naming::subnet(*tier, zone.position));
        }
    }

    Ok(built)
}

/// Build one tier subnet in the given zone
pub fn build_subnet(tier: Tier, zone: &Zone, block: CidrBlock) -> ResourceGraph {
    ResourceGraph::of(
        naming::subnet(tier, zone.position),
        ResourceDefinition::new(
            "AWS::EC2::Subnet",
            json!({
                "AvailabilityZone": zone.name,
                "CidrBlock": block.to_string(),
                "Tags": [name_tag(&[tier.slug(), &zone.name])],
                "VpcId": reference(naming::VPC),
            }),
        ),
    )
}

/// Build one tier route table in the given zone
pub fn build_route_table(tier: Tier, zone: &Zone) -> ResourceGraph {
    ResourceGraph::of(
        naming::route_table(tier, zone.position),
        ResourceDefinition::new(
            "AWS::EC2::RouteTable",
            json!({
                "VpcId": reference(naming::VPC),
                "Tags": [name_tag(&[tier.slug(), &zone.name])],
            }),
        ),
    )
}

/// Build the association binding a tier's subnet to its route table
pub fn build_route_table_association(tier: Tier, position: usize) -> ResourceGraph {
    ResourceGraph::of(
        naming::route_table_association(tier, position),
        ResourceDefinition::new(
            "AWS::EC2::SubnetRouteTableAssociation",
            json!({
                "RouteTableId": reference(naming::route_table(tier, position)),
                "SubnetId": reference(naming::subnet(tier, position)),
            }),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::gateway::plan_gateways;
    use crate::config::NatStrategy;
    use crate::domain::allocate_tier_blocks;
    use pretty_assertions::assert_eq;

    fn parse(cidr: &str) -> CidrBlock {
        CidrBlock::parse(cidr).unwrap()
    }

    fn zone(position: usize) -> Zone {
        Zone {
            name: format!("us-east-1{}", (b'a' + position as u8 - 1) as char),
            position,
        }
    }

    fn plan(strategy: NatStrategy, zone_count: usize) -> GatewayPlan {
        let zones: Vec<Zone> = (1..=zone_count).map(zone).collect();
        let matrix =
            allocate_tier_blocks(parse("10.0.0.0/16"), zone_count, &Tier::active(true)).unwrap();
        plan_gateways(strategy, &zones, &matrix.tier_blocks(Tier::Application)).unwrap()
    }

    #[test]
    fn test_subnet_definition() {
        let graph = build_subnet(Tier::Application, &zone(1), parse("10.0.16.0/20"));
        let subnet = graph.get("AppSubnet1").unwrap();

        assert_eq!(
            serde_json::to_value(subnet).unwrap(),
            json!({
                "Type": "AWS::EC2::Subnet",
                "Properties": {
                    "AvailabilityZone": "us-east-1a",
                    "CidrBlock": "10.0.16.0/20",
                    "Tags": [{
                        "Key": "Name",
                        "Value": { "Fn::Join": ["-", [
                            { "Ref": "AWS::StackName" }, "app", "us-east-1a",
                        ]] },
                    }],
                    "VpcId": { "Ref": "VPC" },
                },
            })
        );
    }

    #[test]
    fn test_association_binds_subnet_to_table() {
        let graph = build_route_table_association(Tier::Database, 2);
        let assoc = graph.get("DBRouteTableAssociation2").unwrap();
        assert_eq!(
            assoc.properties["RouteTableId"],
            json!({ "Ref": "DBRouteTable2" })
        );
        assert_eq!(assoc.properties["SubnetId"], json!({ "Ref": "DBSubnet2" }));
    }

    #[test]
    fn test_zone_with_gateway_strategy_routes_all_tiers() {
        let allocations = vec![
            (Tier::Public, parse("10.0.0.0/20")),
            (Tier::Application, parse("10.0.16.0/20")),
            (Tier::Database, parse("10.0.32.0/20")),
        ];
        let built = build_zone(&zone(1), &allocations, &plan(NatStrategy::Gateway, 1)).unwrap();

        // 3 tiers x (subnet + table + association + route)
        assert_eq!(built.resources.len(), 12);
        assert_eq!(built.database_subnets, vec!["DBSubnet1".to_string()]);

        let public_route = built.resources.get("PublicRoute1").unwrap();
        assert_eq!(
            public_route.properties["GatewayId"],
            json!({ "Ref": "InternetGateway" })
        );

        let app_route = built.resources.get("AppRoute1").unwrap();
        assert_eq!(
            app_route.properties["NatGatewayId"],
            json!({ "Ref": "NatGateway1" })
        );
    }

    #[test]
    fn test_zone_without_nat_leaves_private_tiers_unrouted() {
        let allocations = vec![
            (Tier::Public, parse("10.0.0.0/20")),
            (Tier::Application, parse("10.0.16.0/20")),
        ];
        let built = build_zone(&zone(1), &allocations, &plan(NatStrategy::None, 1)).unwrap();

        assert!(built.resources.contains("PublicRoute1"));
        assert!(!built.resources.contains("AppRoute1"));
        assert!(built.database_subnets.is_empty());
    }

    #[test]
    fn test_second_zone_uses_its_own_position() {
        let allocations = vec![
            (Tier::Public, parse("10.0.48.0/20")),
            (Tier::Application, parse("10.0.64.0/20")),
            (Tier::Database, parse("10.0.80.0/20")),
        ];
        let built = build_zone(&zone(2), &allocations, &plan(NatStrategy::Gateway, 2)).unwrap();

        assert!(built.resources.contains("PublicSubnet2"));
        let app_route = built.resources.get("AppRoute2").unwrap();
        assert_eq!(
            app_route.properties["NatGatewayId"],
            json!({ "Ref": "NatGateway2" })
        );
    }
}
