// Copyright (c) 2025 - Cowboy AI, Inc.
//! Print a sample synthesized topology template as JSON.

use anyhow::Result;

use vpc_topology::{build_topology, NatStrategy, PublicIpScope, SubnetGroupKind, TopologyConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = TopologyConfig {
        zones: Some(vec![
            "us-east-1a".to_string(),
            "us-east-1b".to_string(),
        ]),
        nat_strategy: NatStrategy::Gateway,
        create_database_subnets: true,
        subnet_groups: vec![SubnetGroupKind::Rds],
        export_outputs: true,
        ..TopologyConfig::default()
    };
    let zones = config.zones.clone().unwrap_or_default();

    let topology = build_topology(&config, &zones, &PublicIpScope::OpenFallback)?;
    println!("{}", serde_json::to_string_pretty(&topology)?);

    Ok(())
}
