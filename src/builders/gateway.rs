// Copyright (c) 2025 - Cowboy AI, Inc.
//! Gateway Strategy
//!
//! Builds the Internet Gateway unconditionally, plus the NAT resources the
//! configured strategy calls for: one NAT Gateway and Elastic IP per zone,
//! or a single NAT-capable instance with a security group derived from the
//! Application-tier address blocks. Callers consume the result through the
//! uniform [`RouteTarget`] abstraction.

use serde_json::{json, Value};

use crate::config::NatStrategy;
use crate::domain::{CidrBlock, Tier, Zone};
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{get_att, name_tag, reference, ResourceDefinition, ResourceGraph};
use crate::naming;

/// A default-route target by logical identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    InternetGateway(String),
    NatGateway(String),
    NatInstance(String),
}

impl RouteTarget {
    /// The route property carrying this target kind
    fn route_property(&self) -> (&'static str, Value) {
        match self {
            RouteTarget::InternetGateway(name) => ("GatewayId", reference(name.clone())),
            RouteTarget::NatGateway(name) => ("NatGatewayId", reference(name.clone())),
            RouteTarget::NatInstance(name) => ("InstanceId", reference(name.clone())),
        }
    }
}

/// Per-zone routing exposed by the gateway plan
#[derive(Debug, Clone, PartialEq, Eq)]
enum PrivateTargets {
    /// Private tiers get no default route
    None,
    /// Each zone routes through its own NAT Gateway
    PerZone(Vec<RouteTarget>),
    /// Every zone routes through the shared NAT instance
    Shared(RouteTarget),
}

/// The gateway resources for a run plus their route-target abstraction
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayPlan {
    pub resources: ResourceGraph,
    public_target: RouteTarget,
    private_targets: PrivateTargets,
}

impl GatewayPlan {
    /// The Public tier's default-route target (always the Internet Gateway)
    pub fn public_target(&self) -> &RouteTarget {
        &self.public_target
    }

    /// The private tiers' default-route target for a zone (1-based position)
    ///
    /// Position 0 is outside the contract and resolves to no target.
    pub fn private_target(&self, position: usize) -> Option<&RouteTarget> {
        match &self.private_targets {
            PrivateTargets::None => None,
            PrivateTargets::PerZone(targets) => {
                position.checked_sub(1).and_then(|index| targets.get(index))
            }
            PrivateTargets::Shared(target) => Some(target),
        }
    }
}

/// Build the gateway resources for the chosen strategy
///
/// `application_blocks` holds the Application-tier allocation per zone, in
/// position order; the instance strategy derives its ingress rules from it.
/// With no zones there is nothing to anchor NAT to, so only the Internet
/// Gateway and its attachment are emitted.
pub fn plan_gateways(
    strategy: NatStrategy,
    zones: &[Zone],
    application_blocks: &[CidrBlock],
) -> TopologyResult<GatewayPlan> {
    let mut resources = build_internet_gateway();
    resources.merge(build_internet_gateway_attachment())?;

    let public_target = RouteTarget::InternetGateway(naming::INTERNET_GATEWAY.to_string());

    let private_targets = match strategy {
        _ if zones.is_empty() => PrivateTargets::None,
        NatStrategy::None => PrivateTargets::None,
        NatStrategy::Gateway => {
            let mut targets = Vec::with_capacity(zones.len());
            for zone in zones {
                resources.merge(build_eip(zone.position))?;
                resources.merge(build_nat_gateway(zone.position, &zone.name))?;
                targets.push(RouteTarget::NatGateway(naming::nat_gateway(zone.position)));
            }
            PrivateTargets::PerZone(targets)
        }
        NatStrategy::Instance => {
            resources.merge(build_nat_security_group(application_blocks))?;
            resources.merge(build_nat_instance(&zones[0]))?;
            PrivateTargets::Shared(RouteTarget::NatInstance(naming::NAT_INSTANCE.to_string()))
        }
    };

    Ok(GatewayPlan {
        resources,
        public_target,
        private_targets,
    })
}

/// Build the Internet Gateway
pub fn build_internet_gateway() -> ResourceGraph {
    ResourceGraph::of(
        naming::INTERNET_GATEWAY,
        ResourceDefinition::new(
            "AWS::EC2::InternetGateway",
            json!({ "Tags": [name_tag(&[])] }),
        ),
    )
}

/// Build the attachment binding the Internet Gateway to the network
pub fn build_internet_gateway_attachment() -> ResourceGraph {
    ResourceGraph::of(
        naming::INTERNET_GATEWAY_ATTACHMENT,
        ResourceDefinition::new(
            "AWS::EC2::VPCGatewayAttachment",
            json!({
                "InternetGatewayId": reference(naming::INTERNET_GATEWAY),
                "VpcId": reference(naming::VPC),
            }),
        ),
    )
}

/// Build the Elastic IP for one zone's NAT Gateway
pub fn build_eip(position: usize) -> ResourceGraph {
    ResourceGraph::of(
        naming::eip(position),
        ResourceDefinition::new("AWS::EC2::EIP", json!({ "Domain": "vpc" })),
    )
}

/// Build one zone's NAT Gateway, anchored to that zone's Public subnet
pub fn build_nat_gateway(position: usize, zone_name: &str) -> ResourceGraph {
    ResourceGraph::of(
        naming::nat_gateway(position),
        ResourceDefinition::new(
            "AWS::EC2::NatGateway",
            json!({
                "AllocationId": get_att(naming::eip(position), "AllocationId"),
                "SubnetId": reference(naming::subnet(Tier::Public, position)),
                "Tags": [name_tag(&[zone_name])],
            }),
        ),
    )
}

/// Build the security group protecting the NAT instance
///
/// One HTTP/HTTPS ingress rule pair per Application subnet, scoped to that
/// subnet's block only, plus fixed egress to the open internet on 80/443.
pub fn build_nat_security_group(application_blocks: &[CidrBlock]) -> ResourceGraph {
    let mut ingress = Vec::new();
    for (index, block) in application_blocks.iter().enumerate() {
        let subnet = naming::subnet(Tier::Application, index + 1);
        for (protocol, port) in [("HTTP", 80), ("HTTPS", 443)] {
            ingress.push(json!({
                "Description": format!("Allow inbound {protocol} traffic from {subnet}"),
                "IpProtocol": "tcp",
                "FromPort": port,
                "ToPort": port,
                "CidrIp": block.to_string(),
            }));
        }
    }

    let egress: Vec<Value> = [("HTTP", 80), ("HTTPS", 443)]
        .iter()
        .map(|(protocol, port)| {
            json!({
                "Description": format!("Allow outbound {protocol} access to the Internet"),
                "IpProtocol": "tcp",
                "FromPort": port,
                "ToPort": port,
                "CidrIp": "0.0.0.0/0",
            })
        })
        .collect();

    ResourceGraph::of(
        naming::NAT_SECURITY_GROUP,
        ResourceDefinition::new(
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": "NAT Instance",
                "VpcId": reference(naming::VPC),
                "SecurityGroupEgress": egress,
                "SecurityGroupIngress": ingress,
                "Tags": [name_tag(&["nat"])],
            }),
        ),
    )
}

/// Build the single NAT-capable instance, anchored to the given zone's
/// Public subnet (the first zone of the run)
pub fn build_nat_instance(anchor: &Zone) -> ResourceGraph {
    ResourceGraph::of(
        naming::NAT_INSTANCE,
        ResourceDefinition::new(
            "AWS::EC2::Instance",
            json!({
                "AvailabilityZone": anchor.name,
                "BlockDeviceMappings": [
                    {
                        "DeviceName": "/dev/xvda",
                        "Ebs": {
                            "VolumeSize": 10,
                            "VolumeType": "gp2",
                            "DeleteOnTermination": true,
                        },
                    },
                ],
                "ImageId": reference(naming::LATEST_AMI_ID),
                "InstanceType": "t2.micro",
                "Monitoring": false,
                "NetworkInterfaces": [
                    {
                        "AssociatePublicIpAddress": true,
                        "DeleteOnTermination": true,
                        "Description": "eth0",
                        "DeviceIndex": "0",
                        "GroupSet": [reference(naming::NAT_SECURITY_GROUP)],
                        "SubnetId": reference(naming::subnet(Tier::Public, anchor.position)),
                    },
                ],
                "SourceDestCheck": false,
                "Tags": [name_tag(&["nat"])],
            }),
        )
        .depends_on(naming::INTERNET_GATEWAY_ATTACHMENT),
    )
}

/// Build a tier's default route pointing at the given target
///
/// Every route must have exactly one default-route target; a missing target
/// is a configuration defect.
pub fn build_route(
    tier: Tier,
    position: usize,
    target: Option<&RouteTarget>,
) -> TopologyResult<ResourceGraph> {
    let target = target.ok_or_else(|| {
        TopologyError::Configuration(format!(
            "unable to create route {}: no route target provided",
            naming::route(tier, position)
        ))
    })?;

    let (key, value) = target.route_property();

    Ok(ResourceGraph::of(
        naming::route(tier, position),
        ResourceDefinition::new(
            "AWS::EC2::Route",
            json!({
                "DestinationCidrBlock": "0.0.0.0/0",
                key: value,
                "RouteTableId": reference(naming::route_table(tier, position)),
            }),
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn zones(count: usize) -> Vec<Zone> {
        Zone::enumerate((0..count).map(|i| format!("us-east-1{}", (b'a' + i as u8) as char)))
    }

    fn app_blocks(count: usize) -> Vec<CidrBlock> {
        CidrBlock::parse("10.0.0.0/16")
            .unwrap()
            .split(16)
            .unwrap()
            .into_iter()
            .take(count)
            .collect()
    }

    #[test]
    fn test_none_strategy_builds_only_internet_gateway() {
        let plan = plan_gateways(NatStrategy::None, &zones(2), &app_blocks(2)).unwrap();

        assert_eq!(plan.resources.len(), 2);
        assert!(plan.resources.contains(naming::INTERNET_GATEWAY));
        assert!(plan.resources.contains(naming::INTERNET_GATEWAY_ATTACHMENT));
        assert_eq!(plan.private_target(1), None);
        assert_eq!(
            plan.public_target(),
            &RouteTarget::InternetGateway("InternetGateway".to_string())
        );
    }

    #[test]
    fn test_gateway_strategy_builds_one_nat_per_zone() {
        let plan = plan_gateways(NatStrategy::Gateway, &zones(3), &app_blocks(3)).unwrap();

        assert_eq!(plan.resources.of_type("AWS::EC2::EIP").count(), 3);
        assert_eq!(plan.resources.of_type("AWS::EC2::NatGateway").count(), 3);

        // each zone routes through its own gateway
        assert_eq!(
            plan.private_target(2),
            Some(&RouteTarget::NatGateway("NatGateway2".to_string()))
        );

        let nat = plan.resources.get("NatGateway2").unwrap();
        assert_eq!(nat.properties["SubnetId"], json!({ "Ref": "PublicSubnet2" }));
        assert_eq!(
            nat.properties["AllocationId"],
            json!({ "Fn::GetAtt": ["EIP2", "AllocationId"] })
        );
    }

    #[test]
    fn test_private_target_at_position_zero_resolves_to_none() {
        let plan = plan_gateways(NatStrategy::Gateway, &zones(2), &app_blocks(2)).unwrap();
        assert_eq!(plan.private_target(0), None);
        assert_eq!(plan.private_target(3), None);
    }

    #[test]
    fn test_instance_strategy_builds_one_instance_regardless_of_zones() {
        let plan = plan_gateways(NatStrategy::Instance, &zones(3), &app_blocks(3)).unwrap();

        assert_eq!(plan.resources.of_type("AWS::EC2::Instance").count(), 1);
        assert_eq!(plan.resources.of_type("AWS::EC2::SecurityGroup").count(), 1);
        assert_eq!(plan.resources.of_type("AWS::EC2::NatGateway").count(), 0);

        for position in 1..=3 {
            assert_eq!(
                plan.private_target(position),
                Some(&RouteTarget::NatInstance("NatInstance".to_string()))
            );
        }

        let instance = plan.resources.get(naming::NAT_INSTANCE).unwrap();
        assert_eq!(instance.properties["AvailabilityZone"], json!("us-east-1a"));
        assert_eq!(
            instance.depends_on,
            Some(json!("InternetGatewayAttachment"))
        );
    }

    #[test]
    fn test_nat_security_group_rule_pairs_per_application_subnet() {
        let graph = build_nat_security_group(&app_blocks(2));
        let group = graph.get(naming::NAT_SECURITY_GROUP).unwrap();

        let ingress = group.properties["SecurityGroupIngress"].as_array().unwrap();
        assert_eq!(ingress.len(), 4);
        assert_eq!(ingress[0]["CidrIp"], json!("10.0.0.0/20"));
        assert_eq!(
            ingress[0]["Description"],
            json!("Allow inbound HTTP traffic from AppSubnet1")
        );
        assert_eq!(ingress[3]["CidrIp"], json!("10.0.16.0/20"));
        assert_eq!(ingress[3]["FromPort"], json!(443));

        let egress = group.properties["SecurityGroupEgress"].as_array().unwrap();
        assert_eq!(egress.len(), 2);
        assert_eq!(egress[0]["CidrIp"], json!("0.0.0.0/0"));
    }

    #[test]
    fn test_zero_zones_emit_no_nat_resources() {
        for strategy in [NatStrategy::Gateway, NatStrategy::Instance] {
            let plan = plan_gateways(strategy, &[], &[]).unwrap();
            assert_eq!(plan.resources.len(), 2);
            assert_eq!(plan.private_target(1), None);
        }
    }

    #[test]
    fn test_route_with_nat_target() {
        let target = RouteTarget::NatGateway("NatGateway1".to_string());
        let graph = build_route(Tier::Application, 1, Some(&target)).unwrap();
        let route = graph.get("AppRoute1").unwrap();

        assert_eq!(
            serde_json::to_value(route).unwrap(),
            json!({
                "Type": "AWS::EC2::Route",
                "Properties": {
                    "DestinationCidrBlock": "0.0.0.0/0",
                    "NatGatewayId": { "Ref": "NatGateway1" },
                    "RouteTableId": { "Ref": "AppRouteTable1" },
                },
            })
        );
    }

    #[test]
    fn test_route_without_target_is_a_configuration_error() {
        let err = build_route(Tier::Application, 1, None).unwrap_err();
        assert!(matches!(err, TopologyError::Configuration(_)));
        assert!(err.to_string().contains("no route target provided"));
    }
}
