// Copyright (c) 2025 - Cowboy AI, Inc.
//! IPv4 Address Block Value Object with Validation Invariants
//!
//! All address arithmetic in the crate goes through [`CidrBlock`]. A block is
//! always a network address (host bits zero), so every block produced by
//! [`CidrBlock::split`] is itself a valid block and the splits of a block
//! tile it exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Address-math validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CidrError {
    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(u8),

    #[error("Not a network address (host bits set): {0}")]
    HostBitsSet(String),

    #[error("Cannot split into {0} blocks (must be a power of two >= 1)")]
    SplitNotPowerOfTwo(usize),

    #[error("Prefix length /{required} exceeds /32 when splitting /{prefix}")]
    PrefixOverflow { prefix: u8, required: u32 },
}

/// IPv4 CIDR block value object
///
/// Invariants:
/// - Prefix length 0-32
/// - The address is the network address of the block (host bits zero)
///
/// # Examples
///
/// ```rust
/// use vpc_topology::domain::CidrBlock;
///
/// let block: CidrBlock = "10.0.0.0/16".parse().unwrap();
/// assert_eq!(block.prefix_length(), 16);
/// assert_eq!(block.to_string(), "10.0.0.0/16");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CidrBlock {
    network: Ipv4Addr,
    prefix_length: u8,
}

impl CidrBlock {
    /// Create a block from a network address and prefix length
    ///
    /// # Invariants
    /// - Prefix length 0-32
    /// - Host bits must be zero
    pub fn new(network: Ipv4Addr, prefix_length: u8) -> Result<Self, CidrError> {
        if prefix_length > 32 {
            return Err(CidrError::InvalidPrefixLength(prefix_length));
        }

        let bits = u32::from(network);
        if bits & !Self::mask(prefix_length) != 0 {
            return Err(CidrError::HostBitsSet(format!(
                "{network}/{prefix_length}"
            )));
        }

        Ok(Self {
            network,
            prefix_length,
        })
    }

    /// Parse a block from CIDR notation, e.g. `10.0.0.0/16`
    pub fn parse(cidr: impl AsRef<str>) -> Result<Self, CidrError> {
        let cidr = cidr.as_ref();

        let (addr_str, prefix_str) = cidr
            .split_once('/')
            .ok_or_else(|| CidrError::InvalidCidr(cidr.to_string()))?;

        let network = Ipv4Addr::from_str(addr_str)
            .map_err(|_| CidrError::InvalidCidr(cidr.to_string()))?;
        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| CidrError::InvalidCidr(cidr.to_string()))?;

        Self::new(network, prefix_length)
    }

    /// Get the network address
    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// Get the prefix length
    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Number of addresses covered by this block
    pub fn address_count(&self) -> u64 {
        1u64 << (32 - self.prefix_length)
    }

    /// First address of the block as a raw integer
    fn first(&self) -> u32 {
        u32::from(self.network)
    }

    /// Last address of the block as a raw integer
    fn last(&self) -> u32 {
        self.first() + (self.address_count() - 1) as u32
    }

    /// Check whether `other` lies entirely within this block
    pub fn contains(&self, other: &CidrBlock) -> bool {
        other.prefix_length >= self.prefix_length
            && self.first() <= other.first()
            && other.last() <= self.last()
    }

    /// Check whether two blocks share any address
    pub fn overlaps(&self, other: &CidrBlock) -> bool {
        self.first() <= other.last() && other.first() <= self.last()
    }

    /// Split this block into exactly `count` equal-size sub-blocks in
    /// ascending address order
    ///
    /// `count` must be a power of two >= 1 and the resulting prefix length
    /// must not exceed /32. Deterministic: identical inputs yield identical
    /// output.
    pub fn split(&self, count: usize) -> Result<Vec<CidrBlock>, CidrError> {
        if count == 0 || !count.is_power_of_two() {
            return Err(CidrError::SplitNotPowerOfTwo(count));
        }
        if count == 1 {
            return Ok(vec![*self]);
        }

        let extra_bits = count.trailing_zeros();
        let required = u32::from(self.prefix_length) + extra_bits;
        if required > 32 {
            return Err(CidrError::PrefixOverflow {
                prefix: self.prefix_length,
                required,
            });
        }

        let new_prefix = required as u8;
        let step = 1u32 << (32 - new_prefix);
        let base = self.first();

        let blocks = (0..count as u32)
            .map(|i| Self {
                network: Ipv4Addr::from(base + i * step),
                prefix_length: new_prefix,
            })
            .collect();

        Ok(blocks)
    }

    fn mask(prefix_length: u8) -> u32 {
        if prefix_length == 0 {
            0
        } else {
            u32::MAX << (32 - prefix_length)
        }
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_length)
    }
}

impl FromStr for CidrBlock {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CidrBlock {
    type Error = CidrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CidrBlock> for String {
    fn from(block: CidrBlock) -> Self {
        block.to_string()
    }
}
