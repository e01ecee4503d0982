// Copyright (c) 2025 - Cowboy AI, Inc.
//! Logical Identifier Generation
//!
//! Deterministic, collision-free names for every resource in the graph.
//! Positional identifiers depend only on the (tier, position) pair, so a
//! stable zone ordering reproduces byte-identical identifiers across runs.
//! Uniqueness is guaranteed by callers never reusing a pair within a run.

use crate::domain::Tier;

/// The top-level network resource
pub const VPC: &str = "VPC";
/// The Internet Gateway shared by the whole network
pub const INTERNET_GATEWAY: &str = "InternetGateway";
/// Attachment binding the Internet Gateway to the network
pub const INTERNET_GATEWAY_ATTACHMENT: &str = "InternetGatewayAttachment";
/// The single NAT-capable compute instance (instance strategy)
pub const NAT_INSTANCE: &str = "NatInstance";
/// Security group protecting the NAT instance
pub const NAT_SECURITY_GROUP: &str = "NatSecurityGroup";
/// Security group used by functions executing inside the network
pub const LAMBDA_EXECUTION_SECURITY_GROUP: &str = "LambdaExecutionSecurityGroup";
/// SSM parameter resolved to the latest Amazon Linux 2 image
pub const LATEST_AMI_ID: &str = "LatestAmiId";
/// CloudFormation pseudo parameter for the enclosing stack's name
pub const STACK_NAME: &str = "AWS::StackName";
/// CloudFormation pseudo parameter for the enclosing region
pub const REGION: &str = "AWS::Region";
/// CloudFormation pseudo parameter for the account id
pub const ACCOUNT_ID: &str = "AWS::AccountId";

pub fn subnet(tier: Tier, position: usize) -> String {
    format!("{}Subnet{position}", tier.prefix())
}

pub fn route_table(tier: Tier, position: usize) -> String {
    format!("{}RouteTable{position}", tier.prefix())
}

pub fn route_table_association(tier: Tier, position: usize) -> String {
    format!("{}RouteTableAssociation{position}", tier.prefix())
}

pub fn route(tier: Tier, position: usize) -> String {
    format!("{}Route{position}", tier.prefix())
}

pub fn eip(position: usize) -> String {
    format!("EIP{position}")
}

pub fn nat_gateway(position: usize) -> String {
    format!("NatGateway{position}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_identifiers() {
        assert_eq!(subnet(Tier::Application, 1), "AppSubnet1");
        assert_eq!(subnet(Tier::Database, 3), "DBSubnet3");
        assert_eq!(route_table(Tier::Public, 2), "PublicRouteTable2");
        assert_eq!(
            route_table_association(Tier::Application, 1),
            "AppRouteTableAssociation1"
        );
        assert_eq!(route(Tier::Public, 1), "PublicRoute1");
        assert_eq!(eip(2), "EIP2");
        assert_eq!(nat_gateway(2), "NatGateway2");
    }

    #[test]
    fn test_distinct_pairs_never_collide() {
        let mut seen = std::collections::HashSet::new();
        for tier in Tier::active(true) {
            for position in 1..=5 {
                assert!(seen.insert(subnet(tier, position)));
                assert!(seen.insert(route_table(tier, position)));
                assert!(seen.insert(route(tier, position)));
            }
        }
    }
}
