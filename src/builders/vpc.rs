// Copyright (c) 2025 - Cowboy AI, Inc.
//! Top-Level Network Resources

use serde_json::json;

use crate::domain::CidrBlock;
use crate::graph::{name_tag, reference, ResourceDefinition, ResourceGraph};
use crate::naming;

/// Build the top-level network definition
pub fn build_vpc(cidr_block: CidrBlock) -> ResourceGraph {
    ResourceGraph::of(
        naming::VPC,
        ResourceDefinition::new(
            "AWS::EC2::VPC",
            json!({
                "CidrBlock": cidr_block.to_string(),
                "EnableDnsSupport": true,
                "EnableDnsHostnames": true,
                "InstanceTenancy": "default",
                "Tags": [name_tag(&[])],
            }),
        ),
    )
}

/// Build the security group used by functions executing inside the network
///
/// Always present; the output set references it unconditionally.
pub fn build_lambda_execution_security_group() -> ResourceGraph {
    ResourceGraph::of(
        naming::LAMBDA_EXECUTION_SECURITY_GROUP,
        ResourceDefinition::new(
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": "Lambda Execution Group",
                "VpcId": reference(naming::VPC),
                "Tags": [name_tag(&["lambda"])],
            }),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vpc_definition() {
        let graph = build_vpc(CidrBlock::parse("192.168.0.0/16").unwrap());
        let vpc = graph.get(naming::VPC).unwrap();

        assert_eq!(vpc.resource_type, "AWS::EC2::VPC");
        assert_eq!(vpc.properties["CidrBlock"], json!("192.168.0.0/16"));
        assert_eq!(vpc.properties["EnableDnsSupport"], json!(true));
    }

    #[test]
    fn test_lambda_security_group_is_vpc_scoped() {
        let graph = build_lambda_execution_security_group();
        let group = graph.get(naming::LAMBDA_EXECUTION_SECURITY_GROUP).unwrap();

        assert_eq!(group.resource_type, "AWS::EC2::SecurityGroup");
        assert_eq!(group.properties["VpcId"], json!({ "Ref": "VPC" }));
    }
}
