// Copyright (c) 2025 - Cowboy AI, Inc.
//! Boundary Lookups
//!
//! The two external collaborators consumed before graph construction
//! begins. Both are one-shot async calls awaited to completion; the graph
//! builders themselves never suspend. Zone-discovery failure is fatal to
//! the run; public-IP failure is recovered locally with an open scope.

use async_trait::async_trait;
use tracing::warn;

use crate::errors::TopologyResult;

/// Availability-zone discovery for a region
///
/// Implementations must return only zones in the "available" state, in
/// ascending name order.
#[async_trait]
pub trait ZoneDiscovery: Send + Sync {
    async fn list_available_zones(&self, region: &str) -> TopologyResult<Vec<String>>;
}

/// Discovery of the caller's public IP address (dotted quad)
#[async_trait]
pub trait PublicIpDiscovery: Send + Sync {
    async fn discover_public_ip(&self) -> TopologyResult<String>;
}

/// The source-IP scope applied to bastion ingress rules
///
/// Either the discovered address narrowed to a host route, or the
/// documented open fallback when discovery failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicIpScope {
    /// Discovery succeeded; ingress is scoped to this address
    Discovered(String),
    /// Discovery failed; ingress falls back to the open internet
    OpenFallback,
}

impl PublicIpScope {
    /// The ingress CIDR for this scope
    pub fn cidr(&self) -> String {
        match self {
            PublicIpScope::Discovered(ip) => format!("{ip}/32"),
            PublicIpScope::OpenFallback => "0.0.0.0/0".to_string(),
        }
    }
}

/// Resolve the public-IP scope, degrading to the open fallback on failure
pub async fn resolve_public_ip_scope(discovery: &dyn PublicIpDiscovery) -> PublicIpScope {
    match discovery.discover_public_ip().await {
        Ok(ip) => PublicIpScope::Discovered(ip),
        Err(err) => {
            warn!("Unable to discover public IP address, falling back to open scope: {err}");
            PublicIpScope::OpenFallback
        }
    }
}
