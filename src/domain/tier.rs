// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subnet Tier Taxonomy
//!
//! A tier is a logical subnet role with its own naming prefix and
//! default-route policy: the Public tier routes through the Internet
//! Gateway; the private tiers route through a NAT target when one exists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical subnet role within a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Internet-facing subnets (routes through the Internet Gateway)
    Public,
    /// Application workload subnets (routes through the NAT target, if any)
    #[serde(rename = "app")]
    Application,
    /// Database subnets (routes through the NAT target, if any)
    #[serde(rename = "db")]
    Database,
}

impl Tier {
    /// Logical-identifier prefix for resources in this tier
    pub fn prefix(&self) -> &'static str {
        match self {
            Tier::Public => "Public",
            Tier::Application => "App",
            Tier::Database => "DB",
        }
    }

    /// Lowercase slug used in name tags
    pub fn slug(&self) -> &'static str {
        match self {
            Tier::Public => "public",
            Tier::Application => "app",
            Tier::Database => "db",
        }
    }

    /// Whether this tier's default route targets the Internet Gateway
    pub fn is_public(&self) -> bool {
        matches!(self, Tier::Public)
    }

    /// The active tier set for a build, in allocation order
    ///
    /// Public and Application are always present; Database only when
    /// database-subnet creation is enabled.
    pub fn active(create_database_subnets: bool) -> Vec<Tier> {
        if create_database_subnets {
            vec![Tier::Public, Tier::Application, Tier::Database]
        } else {
            vec![Tier::Public, Tier::Application]
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}
