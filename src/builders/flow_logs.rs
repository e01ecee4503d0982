// Copyright (c) 2025 - Cowboy AI, Inc.
//! VPC Flow Logs
//!
//! Optional traffic logging to an encrypted S3 bucket. The bucket is
//! retained on stack deletion; the flow log depends on the bucket policy
//! so delivery permissions exist before logging starts.

use serde_json::json;

use crate::errors::TopologyResult;
use crate::graph::{get_att, join, reference, ResourceDefinition, ResourceGraph};
use crate::naming;

pub const LOG_BUCKET: &str = "LogBucket";
pub const LOG_BUCKET_POLICY: &str = "LogBucketPolicy";
pub const FLOW_LOG: &str = "S3FlowLog";

/// Build the flow-log bucket, its delivery policy, and the flow log
pub fn build_flow_logs() -> TopologyResult<ResourceGraph> {
    let mut graph = build_log_bucket();
    graph.merge(build_log_bucket_policy())?;
    graph.merge(build_vpc_flow_log())?;
    Ok(graph)
}

/// Build the retained, encrypted log bucket
pub fn build_log_bucket() -> ResourceGraph {
    ResourceGraph::of(
        LOG_BUCKET,
        ResourceDefinition::new(
            "AWS::S3::Bucket",
            json!({
                "AccessControl": "LogDeliveryWrite",
                "BucketEncryption": {
                    "ServerSideEncryptionConfiguration": [
                        {
                            "ServerSideEncryptionByDefault": { "SSEAlgorithm": "AES256" },
                        },
                    ],
                },
                "PublicAccessBlockConfiguration": {
                    "BlockPublicAcls": true,
                    "BlockPublicPolicy": true,
                    "IgnorePublicAcls": true,
                    "RestrictPublicBuckets": true,
                },
                "Tags": [
                    {
                        "Key": "Name",
                        "Value": join(
                            " ",
                            vec![reference(naming::STACK_NAME), json!("Logs")],
                        ),
                    },
                ],
            }),
        )
        .deletion_policy("Retain"),
    )
}

/// Build the bucket policy granting the log-delivery service write access
pub fn build_log_bucket_policy() -> ResourceGraph {
    ResourceGraph::of(
        LOG_BUCKET_POLICY,
        ResourceDefinition::new(
            "AWS::S3::BucketPolicy",
            json!({
                "Bucket": reference(LOG_BUCKET),
                "PolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [
                        {
                            "Sid": "AWSLogDeliveryAclCheck",
                            "Effect": "Allow",
                            "Principal": { "Service": "delivery.logs.amazonaws.com" },
                            "Action": "s3:GetBucketAcl",
                            "Resource": get_att(LOG_BUCKET, "Arn"),
                        },
                        {
                            "Sid": "AWSLogDeliveryWrite",
                            "Effect": "Allow",
                            "Principal": { "Service": "delivery.logs.amazonaws.com" },
                            "Action": "s3:PutObject",
                            "Resource": join(
                                "",
                                vec![
                                    json!("arn:aws:s3:::"),
                                    reference(LOG_BUCKET),
                                    json!("/AWSLogs/"),
                                    reference(naming::ACCOUNT_ID),
                                    json!("/*"),
                                ],
                            ),
                            "Condition": {
                                "StringEquals": {
                                    "s3:x-amz-acl": "bucket-owner-full-control",
                                },
                            },
                        },
                    ],
                },
            }),
        ),
    )
}

/// Build the flow-log definition delivering to the log bucket
pub fn build_vpc_flow_log() -> ResourceGraph {
    ResourceGraph::of(
        FLOW_LOG,
        ResourceDefinition::new(
            "AWS::EC2::FlowLog",
            json!({
                "LogDestinationType": "s3",
                "LogDestination": get_att(LOG_BUCKET, "Arn"),
                "ResourceId": reference(naming::VPC),
                "ResourceType": "VPC",
                "TrafficType": "ALL",
            }),
        )
        .depends_on(LOG_BUCKET_POLICY),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bucket_is_retained_and_encrypted() {
        let graph = build_log_bucket();
        let bucket = graph.get(LOG_BUCKET).unwrap();

        assert_eq!(bucket.deletion_policy.as_deref(), Some("Retain"));
        assert_eq!(
            bucket.properties["BucketEncryption"]["ServerSideEncryptionConfiguration"][0]
                ["ServerSideEncryptionByDefault"]["SSEAlgorithm"],
            json!("AES256")
        );
    }

    #[test]
    fn test_flow_log_depends_on_bucket_policy() {
        let graph = build_vpc_flow_log();
        let flow_log = graph.get(FLOW_LOG).unwrap();

        assert_eq!(flow_log.depends_on, Some(json!("LogBucketPolicy")));
        assert_eq!(flow_log.properties["ResourceId"], json!({ "Ref": "VPC" }));
    }

    #[test]
    fn test_subsystem_builds_three_resources() {
        let graph = build_flow_logs().unwrap();
        assert_eq!(graph.len(), 3);
    }
}
