// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Synthesis Orchestrator
//!
//! Resolves the zone list and public-IP scope through the injected
//! collaborators, then builds the whole graph through the pure core
//! [`build_topology`]. Construction is all-or-nothing: any failure
//! propagates before a graph is returned.

use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::builders::outputs::{assemble_outputs, OutputContext};
use crate::builders::{
    bastion, flow_logs, gateway::plan_gateways, subnet_groups::build_subnet_groups, vpc,
    zone::build_zone,
};
use crate::config::{SubnetGroupKind, TopologyConfig};
use crate::discovery::{
    resolve_public_ip_scope, PublicIpDiscovery, PublicIpScope, ZoneDiscovery,
};
use crate::domain::{allocate_tier_blocks, Tier, Zone};
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{Output, Parameter, ResourceGraph};
use crate::naming;

/// The complete result of one synthesis run
///
/// Serializes to the declarative template shape consumed by the
/// downstream provisioning engine. Ownership transfers fully to the
/// caller; the synthesizer holds no state between runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topology {
    #[serde(rename = "Parameters", skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Parameter>,

    #[serde(rename = "Resources")]
    pub resources: ResourceGraph,

    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

/// Build the full topology from resolved inputs
///
/// The pure, synchronous core: the result is a function of the
/// configuration, the ordered zone names, and the public-IP scope.
pub fn build_topology(
    config: &TopologyConfig,
    zone_names: &[String],
    public_ip: &PublicIpScope,
) -> TopologyResult<Topology> {
    config.validate()?;

    let zones = Zone::enumerate(zone_names.iter().cloned());
    let tiers = Tier::active(config.create_database_subnets);
    let matrix = allocate_tier_blocks(config.cidr_block, zones.len(), &tiers)?;

    let plan = plan_gateways(
        config.nat_strategy,
        &zones,
        &matrix.tier_blocks(Tier::Application),
    )?;

    let mut resources = vpc::build_vpc(config.cidr_block);
    resources.merge(vpc::build_lambda_execution_security_group())?;
    resources.merge(plan.resources.clone())?;

    let mut database_subnets = Vec::new();
    for zone in &zones {
        let allocations: Vec<_> = matrix.zone(zone.position - 1).collect();
        let built = build_zone(zone, &allocations, &plan)?;
        resources.merge(built.resources)?;
        database_subnets.extend(built.database_subnets);
    }

    let emitted_groups: &[SubnetGroupKind] =
        if config.create_database_subnets && zones.len() >= 2 {
            &config.subnet_groups
        } else {
            &[]
        };
    resources.merge(build_subnet_groups(zones.len(), emitted_groups)?)?;

    if config.create_bastion_host {
        let key_pair = config.bastion_key_pair_name.as_deref().ok_or_else(|| {
            TopologyError::Configuration(
                "bastionKeyPairName is required when createBastionHost is set".to_string(),
            )
        })?;
        resources.merge(bastion::build_bastion(key_pair, zones.len(), public_ip)?)?;
    }

    if config.enable_flow_logs {
        resources.merge(flow_logs::build_flow_logs()?)?;
    }

    let mut parameters = BTreeMap::new();
    if config.create_bastion_host || resources.contains(naming::NAT_INSTANCE) {
        parameters.insert(
            naming::LATEST_AMI_ID.to_string(),
            Parameter {
                parameter_type: "AWS::SSM::Parameter::Value<AWS::EC2::Image::Id>".to_string(),
                default: Some(json!(
                    "/aws/service/ami-amazon-linux-latest/amzn2-ami-hvm-x86_64-gp2"
                )),
            },
        );
    }

    let external: BTreeSet<String> = parameters.keys().cloned().collect();
    resources.validate_references(&external)?;

    let outputs = assemble_outputs(OutputContext {
        subnet_groups: emitted_groups,
        database_subnets: &database_subnets,
        create_bastion_host: config.create_bastion_host,
        export_outputs: config.export_outputs,
    });

    debug!(
        resources = resources.len(),
        outputs = outputs.len(),
        "topology graph complete"
    );

    Ok(Topology {
        parameters,
        resources,
        outputs,
    })
}

/// Synthesis entry point owning the boundary collaborators
pub struct TopologySynthesizer {
    zone_discovery: Arc<dyn ZoneDiscovery>,
    public_ip_discovery: Arc<dyn PublicIpDiscovery>,
}

impl TopologySynthesizer {
    pub fn new(
        zone_discovery: Arc<dyn ZoneDiscovery>,
        public_ip_discovery: Arc<dyn PublicIpDiscovery>,
    ) -> Self {
        Self {
            zone_discovery,
            public_ip_discovery,
        }
    }

    /// Synthesize the resource graph for the given configuration
    ///
    /// Awaits the boundary lookups, then delegates to the pure core.
    /// Zone-discovery failure is fatal; public-IP failure degrades to the
    /// open fallback scope.
    pub async fn synthesize(&self, config: &TopologyConfig) -> TopologyResult<Topology> {
        config.validate()?;

        let zone_names = match &config.zones {
            Some(names) => names.clone(),
            None => {
                let region = config.region.as_deref().ok_or_else(|| {
                    TopologyError::Configuration(
                        "region is required when zones are not provided".to_string(),
                    )
                })?;
                let mut names = self.zone_discovery.list_available_zones(region).await?;
                names.sort();
                names
            }
        };

        let public_ip = if config.create_bastion_host {
            resolve_public_ip_scope(self.public_ip_discovery.as_ref()).await
        } else {
            PublicIpScope::OpenFallback
        };

        info!(
            zones = zone_names.len(),
            nat_strategy = ?config.nat_strategy,
            "synthesizing network topology for {}",
            config.cidr_block
        );

        build_topology(config, &zone_names, &public_ip)
    }
}
