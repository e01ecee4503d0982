// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-Tier, Per-Zone Address Allocation
//!
//! Carves the top-level block into the zone x tier matrix with a fixed
//! two-level scheme: the block is always split into [`RESERVED_CHUNKS`]
//! equal chunks (the capacity reservation), and chunks are assigned
//! row-major by zone then tier. Non-overlap holds by construction, and a
//! zone added later takes the next unused chunks without moving any
//! previously issued allocation. Growing past the reservation is a
//! capacity error, never a reflow.

use crate::domain::cidr::CidrBlock;
use crate::domain::tier::Tier;
use crate::errors::{TopologyError, TopologyResult};

/// Number of equal top-level chunks reserved from the block
///
/// A /16 block therefore yields /20 chunks; with three tiers this reserves
/// room for five zones.
pub const RESERVED_CHUNKS: usize = 16;

/// The allocated zone x tier matrix of address blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierMatrix {
    tiers: Vec<Tier>,
    rows: Vec<Vec<CidrBlock>>,
}

impl TierMatrix {
    /// The tiers covered by each row, in allocation order
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Number of zones allocated
    pub fn zone_count(&self) -> usize {
        self.rows.len()
    }

    /// Tier allocations for one zone (0-based index), in tier order
    pub fn zone(&self, zone_index: usize) -> impl Iterator<Item = (Tier, CidrBlock)> + '_ {
        self.tiers
            .iter()
            .copied()
            .zip(self.rows[zone_index].iter().copied())
    }

    /// The block allocated to a given (zone, tier) pair
    pub fn block(&self, zone_index: usize, tier: Tier) -> Option<CidrBlock> {
        let tier_index = self.tiers.iter().position(|t| *t == tier)?;
        self.rows.get(zone_index).map(|row| row[tier_index])
    }

    /// All blocks for one tier across zones, in zone-position order
    pub fn tier_blocks(&self, tier: Tier) -> Vec<CidrBlock> {
        let Some(tier_index) = self.tiers.iter().position(|t| *t == tier) else {
            return Vec::new();
        };
        self.rows.iter().map(|row| row[tier_index]).collect()
    }

    /// Every allocated block, row-major
    pub fn all_blocks(&self) -> impl Iterator<Item = CidrBlock> + '_ {
        self.rows.iter().flatten().copied()
    }
}

/// Allocate one sub-block per (zone, tier) pair from the top-level block
///
/// Fails with a capacity error when the matrix does not fit the
/// reservation or the chunk prefix would exceed /32.
pub fn allocate_tier_blocks(
    block: CidrBlock,
    zone_count: usize,
    tiers: &[Tier],
) -> TopologyResult<TierMatrix> {
    let needed = zone_count * tiers.len();
    if needed > RESERVED_CHUNKS {
        return Err(TopologyError::Capacity(format!(
            "{zone_count} zones x {} tiers needs {needed} blocks, only {RESERVED_CHUNKS} reserved in {block}",
            tiers.len(),
        )));
    }

    let chunks = block.split(RESERVED_CHUNKS)?;

    let rows = (0..zone_count)
        .map(|zone| {
            (0..tiers.len())
                .map(|tier| chunks[zone * tiers.len() + tier])
                .collect()
        })
        .collect();

    Ok(TierMatrix {
        tiers: tiers.to_vec(),
        rows,
    })
}
