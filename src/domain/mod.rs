// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Domain Models
//!
//! Core domain concepts for topology synthesis: address blocks and the
//! allocation matrix, the subnet tier taxonomy, and availability zones.
//!
//! # Value Objects with Invariants
//!
//! - [`CidrBlock`] - IPv4 network block (host bits zero, prefix 0-32)
//! - [`TierMatrix`] - non-overlapping per-zone, per-tier allocations
//! - [`Tier`] - subnet role with naming prefix and route policy
//! - [`Zone`] - zone name with stable 1-based position

pub mod allocator;
pub mod cidr;
pub mod tier;
pub mod zone;

pub use allocator::{allocate_tier_blocks, TierMatrix, RESERVED_CHUNKS};
pub use cidr::{CidrBlock, CidrError};
pub use tier::Tier;
pub use zone::Zone;
