//! Upload limits imposed by the object store behind the upload-urls endpoint
//!
//! This module centralizes the provider limits so they can be updated in one
//! place when the service changes its quotas. [`ChunkLimits`] carries them at
//! runtime so callers can override them without touching the constants.
//!
//! # When The Provider Updates These Limits
//!
//! 1. Update the constants below
//! 2. Run tests: `cargo test`
//! 3. Everything built on [`ChunkLimits::default`] picks up the new values.

/// Maximum number of presigned URLs (parts) a single upload may reserve.
///
/// Provider limit: 25 parts
pub const MAX_PARTS: u64 = 25;

/// Minimum size of a part in a multipart upload (5 MiB).
///
/// Provider limit: 5 MiB (5,242,880 bytes)
///
/// The last part can be smaller than this minimum. Payloads up to this size are
/// sent as a single part.
pub const MIN_CHUNK_SIZE: u64 = 0x0050_0000; // 5 MiB

/// Runtime copy of the provider limits used by the chunk planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLimits {
    pub max_parts: u64,
    pub min_chunk_size: u64,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self {
            max_parts: MAX_PARTS,
            min_chunk_size: MIN_CHUNK_SIZE,
        }
    }
}

impl ChunkLimits {
    /// A `max_parts` of 0 is treated as 1.
    #[must_use]
    pub const fn new(max_parts: u64, min_chunk_size: u64) -> Self {
        Self {
            max_parts: if max_parts == 0 { 1 } else { max_parts },
            min_chunk_size,
        }
    }
}
