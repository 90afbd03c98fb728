//! Error types for the ordering and extraction APIs.

use thiserror::Error;

/// An error returned before any work is done; no partial results exist once
/// one is produced.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// `eps` was negative. A caller wanting an unlimited radius passes the
    /// maximum finite value of the float type instead.
    #[error("eps must not be negative")]
    NegativeEps,
    /// `min_pts` was zero.
    #[error("min_pts must be at least 1")]
    InvalidMinPts,
    /// The requested number of clusters was zero.
    #[error("cluster count must be at least 1")]
    InvalidClusterCount,
    /// The persistence threshold was negative.
    #[error("persistence threshold must not be negative")]
    NegativePersistence,
    /// A cluster border pointed past the end of the ordering.
    #[error("cluster border {border} exceeds the ordering length {len}")]
    BorderOutOfBounds { border: usize, len: usize },
    /// The cluster border list was not strictly ascending.
    #[error("cluster borders must be strictly ascending")]
    UnsortedBorders,
}

/// Convenient alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;
