// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bastion Host Subsystem
//!
//! Elastic IP, IAM role and instance profile, security group scoped to the
//! discovered public IP, spot launch configuration, and a one-instance
//! auto-scaling group spanning the Public subnets. The auto-scaling group
//! needs at least one zone of capacity; everything else is emitted even
//! with zero zones.

use serde_json::{json, Value};

use crate::discovery::PublicIpScope;
use crate::domain::Tier;
use crate::errors::TopologyResult;
use crate::graph::{get_att, join, name_tag, reference, ResourceDefinition, ResourceGraph};
use crate::naming;

pub const BASTION_EIP: &str = "BastionEIP";
pub const BASTION_IAM_ROLE: &str = "BastionIamRole";
pub const BASTION_INSTANCE_PROFILE: &str = "BastionInstanceProfile";
pub const BASTION_SECURITY_GROUP: &str = "BastionSecurityGroup";
pub const BASTION_LAUNCH_CONFIGURATION: &str = "BastionLaunchConfiguration";
pub const BASTION_AUTO_SCALING_GROUP: &str = "BastionAutoScalingGroup";

/// Build the complete bastion subsystem
pub fn build_bastion(
    key_pair_name: &str,
    zone_count: usize,
    scope: &PublicIpScope,
) -> TopologyResult<ResourceGraph> {
    let mut graph = build_bastion_eip();
    graph.merge(build_bastion_iam_role())?;
    graph.merge(build_bastion_instance_profile())?;
    graph.merge(build_bastion_security_group(scope))?;
    graph.merge(build_bastion_launch_configuration(key_pair_name))?;
    graph.merge(build_bastion_auto_scaling_group(zone_count))?;
    Ok(graph)
}

/// Build the Elastic IP the bastion associates on boot
pub fn build_bastion_eip() -> ResourceGraph {
    ResourceGraph::of(
        BASTION_EIP,
        ResourceDefinition::new("AWS::EC2::EIP", json!({ "Domain": "vpc" })),
    )
}

/// Build the IAM role allowing the bastion to associate its Elastic IP
pub fn build_bastion_iam_role() -> ResourceGraph {
    ResourceGraph::of(
        BASTION_IAM_ROLE,
        ResourceDefinition::new(
            "AWS::IAM::Role",
            json!({
                "AssumeRolePolicyDocument": {
                    "Statement": [
                        {
                            "Effect": "Allow",
                            "Principal": { "Service": "ec2.amazonaws.com" },
                            "Action": "sts:AssumeRole",
                        },
                    ],
                },
                "Policies": [
                    {
                        "PolicyName": "AllowEIPAssociation",
                        "PolicyDocument": {
                            "Version": "2012-10-17",
                            "Statement": [
                                {
                                    "Action": "ec2:AssociateAddress",
                                    "Resource": "*",
                                    "Effect": "Allow",
                                },
                            ],
                        },
                    },
                ],
                "ManagedPolicyArns": [
                    "arn:aws:iam::aws:policy/service-role/AmazonEC2RoleforSSM",
                ],
            }),
        ),
    )
}

/// Build the instance profile wrapping the bastion role
pub fn build_bastion_instance_profile() -> ResourceGraph {
    ResourceGraph::of(
        BASTION_INSTANCE_PROFILE,
        ResourceDefinition::new(
            "AWS::IAM::InstanceProfile",
            json!({ "Roles": [reference(BASTION_IAM_ROLE)] }),
        ),
    )
}

/// Build the bastion security group
///
/// SSH and ICMP ingress are scoped to the discovered public IP, or to the
/// open internet when discovery fell back.
pub fn build_bastion_security_group(scope: &PublicIpScope) -> ResourceGraph {
    let source = scope.cidr();
    ResourceGraph::of(
        BASTION_SECURITY_GROUP,
        ResourceDefinition::new(
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": "Bastion Host",
                "VpcId": reference(naming::VPC),
                "SecurityGroupIngress": [
                    {
                        "Description": "Allow inbound SSH access to the bastion host",
                        "IpProtocol": "tcp",
                        "FromPort": 22,
                        "ToPort": 22,
                        "CidrIp": source,
                    },
                    {
                        "Description": "Allow inbound ICMP to the bastion host",
                        "IpProtocol": "icmp",
                        "FromPort": -1,
                        "ToPort": -1,
                        "CidrIp": source,
                    },
                ],
                "Tags": [name_tag(&["bastion"])],
            }),
        ),
    )
}

/// Build the spot launch configuration for the bastion auto-scaling group
///
/// The boot script associates the Elastic IP with the instance and signals
/// the auto-scaling group's creation policy.
pub fn build_bastion_launch_configuration(key_pair_name: &str) -> ResourceGraph {
    let user_data = join(
        "",
        vec![
            Value::String("#!/bin/bash -xe\n".to_string()),
            Value::String("/usr/bin/yum update -y\n".to_string()),
            Value::String("/usr/bin/yum install -y aws-cfn-bootstrap\n".to_string()),
            Value::String("EIP_ALLOCATION_ID=".to_string()),
            get_att(BASTION_EIP, "AllocationId"),
            Value::String("\n".to_string()),
            Value::String(
                "INSTANCE_ID=`/usr/bin/curl -sq http://169.254.169.254/latest/meta-data/instance-id`\n"
                    .to_string(),
            ),
            Value::String(
                "/usr/bin/aws ec2 associate-address --instance-id ${INSTANCE_ID} --allocation-id ${EIP_ALLOCATION_ID} --region "
                    .to_string(),
            ),
            reference(naming::REGION),
            Value::String("\n".to_string()),
            Value::String("/opt/aws/bin/cfn-signal --exit-code 0 --stack ".to_string()),
            reference(naming::STACK_NAME),
            Value::String(format!(" --resource {BASTION_AUTO_SCALING_GROUP} ")),
            Value::String(" --region ".to_string()),
            reference(naming::REGION),
            Value::String("\n".to_string()),
        ],
    );

    ResourceGraph::of(
        BASTION_LAUNCH_CONFIGURATION,
        ResourceDefinition::new(
            "AWS::AutoScaling::LaunchConfiguration",
            json!({
                "AssociatePublicIpAddress": true,
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
                "KeyName": key_pair_name,
                "ImageId": reference(naming::LATEST_AMI_ID),
                "InstanceMonitoring": false,
                "IamInstanceProfile": reference(BASTION_INSTANCE_PROFILE),
                "InstanceType": "t2.micro",
                "SecurityGroups": [reference(BASTION_SECURITY_GROUP)],
                // On-Demand price of t2.micro in us-east-1
                "SpotPrice": "0.0116",
                "UserData": { "Fn::Base64": user_data },
            }),
        ),
    )
}

/// Build the one-instance auto-scaling group spanning the Public subnets
///
/// Zero zones means zero capacity, so the group is omitted entirely.
pub fn build_bastion_auto_scaling_group(zone_count: usize) -> ResourceGraph {
    if zone_count < 1 {
        return ResourceGraph::new();
    }

    let zone_identifiers: Vec<Value> = (1..=zone_count)
        .map(|position| reference(naming::subnet(Tier::Public, position)))
        .collect();

    ResourceGraph::of(
        BASTION_AUTO_SCALING_GROUP,
        ResourceDefinition::new(
            "AWS::AutoScaling::AutoScalingGroup",
            json!({
                "LaunchConfigurationName": reference(BASTION_LAUNCH_CONFIGURATION),
                "VPCZoneIdentifier": zone_identifiers,
                "MinSize": 1,
                "MaxSize": 1,
                "Cooldown": "300",
                "DesiredCapacity": 1,
                "Tags": [
                    {
                        "Key": "Name",
                        "Value": join(
                            "-",
                            vec![reference(naming::STACK_NAME), json!("bastion")],
                        ),
                        "PropagateAtLaunch": true,
                    },
                ],
            }),
        )
        .creation_policy(json!({
            "ResourceSignal": { "Count": 1, "Timeout": "PT10M" },
        })),
    )
}
