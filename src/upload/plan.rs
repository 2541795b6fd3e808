use crate::api::limits::ChunkLimits;
use std::{cmp::max, cmp::min, iter::Iterator};

/// How a payload is split into parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub chunk_size: u64,
    pub chunk_count: u64,
}

/// One part of the payload, `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: u64,
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Plan with the provider limits.
#[must_use]
pub fn plan(total_size: u64) -> ChunkPlan {
    plan_with(total_size, ChunkLimits::default())
}

/// Payloads up to `min_chunk_size` go in a single part. Above that the chunk
/// grows with the payload so the part count stays within `max_parts`, but it
/// never drops below `min_chunk_size`.
#[must_use]
pub fn plan_with(total_size: u64, limits: ChunkLimits) -> ChunkPlan {
    if total_size <= limits.min_chunk_size {
        return ChunkPlan {
            chunk_size: total_size,
            chunk_count: 1,
        };
    }

    let chunk_size = max(
        limits.min_chunk_size,
        total_size.div_ceil(limits.max_parts.max(1)),
    );

    ChunkPlan {
        chunk_size,
        chunk_count: total_size.div_ceil(chunk_size),
    }
}

impl ChunkPlan {
    /// The ranges of this plan over a payload of `total_size` bytes.
    #[must_use]
    pub const fn ranges(&self, total_size: u64) -> ChunkRanges {
        ChunkRanges::new(total_size, self.chunk_size, self.chunk_count)
    }
}

pub struct ChunkRanges {
    start: u64,
    chunk_size: u64,
    total_size: u64,
    index: u64,
    count: u64,
}

impl ChunkRanges {
    #[must_use]
    pub const fn new(total_size: u64, chunk_size: u64, count: u64) -> Self {
        Self {
            start: 0,
            chunk_size,
            total_size,
            index: 0,
            count,
        }
    }
}

impl Iterator for ChunkRanges {
    type Item = ChunkRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let end = min(self.start.saturating_add(self.chunk_size), self.total_size);

        let range = ChunkRange {
            index: self.index,
            start: self.start,
            end,
        };

        log::debug!(
            "ChunkRanges::next() -> index: {}, start: {}, end: {}",
            range.index,
            range.start,
            range.end
        );

        self.start = end;
        self.index += 1;

        Some(range)
    }
}
