// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Graph Builders
//!
//! Each builder is a pure function of its inputs and returns a disjoint
//! partial graph; the synthesizer merges them with an explicit
//! disjointness check. Builders reference each other's resources only by
//! logical identifier.

pub mod bastion;
pub mod flow_logs;
pub mod gateway;
pub mod outputs;
pub mod subnet_groups;
pub mod vpc;
pub mod zone;

pub use gateway::{plan_gateways, GatewayPlan, RouteTarget};
pub use outputs::{assemble_outputs, OutputContext};
pub use subnet_groups::build_subnet_groups;
pub use zone::{build_zone, ZoneResources};
