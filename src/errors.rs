//! Error types for topology synthesis

use thiserror::Error;

use crate::domain::cidr::CidrError;

/// Errors that can occur while synthesizing a topology
///
/// A synthesis run either completes with a full graph or fails with one of
/// these; no partial graph is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Invalid or missing configuration input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The CIDR math cannot satisfy the requested zone/tier matrix
    #[error("Address capacity exceeded: {0}")]
    Capacity(String),

    /// A boundary lookup (zone discovery) failed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// An internal construction invariant was violated
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for topology synthesis operations
pub type TopologyResult<T> = Result<T, TopologyError>;

impl From<CidrError> for TopologyError {
    fn from(err: CidrError) -> Self {
        match err {
            CidrError::InvalidCidr(_)
            | CidrError::InvalidPrefixLength(_)
            | CidrError::HostBitsSet(_) => TopologyError::Configuration(err.to_string()),
            CidrError::SplitNotPowerOfTwo(_) | CidrError::PrefixOverflow { .. } => {
                TopologyError::Capacity(err.to_string())
            }
        }
    }
}
