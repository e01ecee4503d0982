// Copyright (c) 2025 - Cowboy AI, Inc.
//! Output Assembly
//!
//! Composes the exported output set as a fold over the feature flags. The
//! export-name pass runs last so exported names always reflect the final
//! output set.

use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::builders::bastion::BASTION_EIP;
use crate::config::SubnetGroupKind;
use crate::graph::{join, reference, Output};
use crate::naming;

/// SSH username baked into the bastion image
pub const BASTION_SSH_USER: &str = "ec2-user";

/// Inputs to the output fold
///
/// `subnet_groups` and `database_subnets` hold what was actually emitted
/// into the graph, so every output reference resolves by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputContext<'a> {
    pub subnet_groups: &'a [SubnetGroupKind],
    pub database_subnets: &'a [String],
    pub create_bastion_host: bool,
    pub export_outputs: bool,
}

/// Assemble the output set for a run
pub fn assemble_outputs(context: OutputContext<'_>) -> BTreeMap<String, Output> {
    let mut outputs = BTreeMap::new();

    outputs.insert(
        naming::VPC.to_string(),
        Output::new("VPC logical resource ID", reference(naming::VPC)),
    );
    outputs.insert(
        "LambdaExecutionSecurityGroupId".to_string(),
        Output::new(
            "Security Group logical resource ID that the Lambda functions use when executing within the VPC",
            reference(naming::LAMBDA_EXECUTION_SECURITY_GROUP),
        ),
    );

    for kind in context.subnet_groups {
        outputs.insert(
            kind.logical_id().to_string(),
            Output::new(
                format!("Subnet Group for {kind}"),
                reference(kind.logical_id()),
            ),
        );
    }

    for subnet in context.database_subnets {
        outputs.insert(
            subnet.clone(),
            Output::new(
                format!("Database subnet {subnet} logical resource ID"),
                reference(subnet.clone()),
            ),
        );
    }

    if context.create_bastion_host {
        outputs.insert(
            "BastionSSHUser".to_string(),
            Output::new(
                "SSH username for the Bastion host",
                Value::String(BASTION_SSH_USER.to_string()),
            ),
        );
        outputs.insert(
            BASTION_EIP.to_string(),
            Output::new("Public IP of Bastion host", reference(BASTION_EIP)),
        );
    }

    if context.export_outputs {
        append_exports(&mut outputs);
    }

    outputs
}

/// Attach a stack-scoped export name to every accumulated output
fn append_exports(outputs: &mut BTreeMap<String, Output>) {
    for (name, output) in outputs.iter_mut() {
        output.export = Some(json!({
            "Name": join(
                "-",
                vec![reference(naming::STACK_NAME), Value::String(name.clone())],
            ),
        }));
    }
}
