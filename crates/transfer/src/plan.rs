use std::ops::Range;

use crate::TransferError;

/// Fixed partition of a source into contiguous chunks.
///
/// Every chunk but the last is exactly `chunk_size` bytes; the last holds
/// the remainder. The plan is fixed when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    total_size: u64,
    chunk_size: u64,
    total_chunks: u32,
}

impl ChunkPlan {
    /// Plans `total_size` bytes in chunks of `chunk_size`.
    pub fn new(total_size: u64, chunk_size: u64) -> Result<Self, TransferError> {
        if chunk_size == 0 {
            return Err(TransferError::InvalidChunkSize);
        }
        let total_chunks = u32::try_from(total_size.div_ceil(chunk_size)).map_err(|_| {
            TransferError::TooManyChunks {
                total_size,
                chunk_size,
            }
        })?;
        Ok(Self {
            total_size,
            chunk_size,
            total_chunks,
        })
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    /// Byte range covered by chunk `index`.
    pub fn range(&self, index: u32) -> Result<Range<u64>, TransferError> {
        if index >= self.total_chunks {
            return Err(TransferError::ChunkOutOfRange {
                index,
                total: self.total_chunks,
            });
        }
        let start = u64::from(index) * self.chunk_size;
        let end = std::cmp::min(start + self.chunk_size, self.total_size);
        Ok(start..end)
    }

    /// Length in bytes of chunk `index`.
    pub fn chunk_len(&self, index: u32) -> Result<u64, TransferError> {
        self.range(index).map(|r| r.end - r.start)
    }

    /// Iterates over `(index, range)` pairs in transmission order.
    pub fn ranges(&self) -> impl Iterator<Item = (u32, Range<u64>)> + '_ {
        (0..self.total_chunks).map(move |i| {
            let start = u64::from(i) * self.chunk_size;
            (i, start..std::cmp::min(start + self.chunk_size, self.total_size))
        })
    }
}
