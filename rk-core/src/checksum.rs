//! Tape checksum as verified by the RK monitor loader.
//!
//! Every byte except the last is added to both halves of a 16-bit sum. The
//! last byte is added to the low half only, and its carry is discarded.

use crate::error::{RkError, RkResult};

/// Running checksum over a payload delivered in chunks.
///
/// Feed all leading chunks with [`update`](Self::update) and pass the final
/// chunk to [`finish`](Self::finish).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumAccumulator {
    sum: u16,
}

impl ChecksumAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk that is known not to contain the final payload byte.
    pub fn update(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            self.sum = self.sum.wrapping_add(byte as u16);
            self.sum = self.sum.wrapping_add((byte as u16) << 8);
        }
    }

    /// Add the final chunk and return the checksum.
    ///
    /// The chunk must be non-empty, since its last byte is the payload's
    /// last byte.
    pub fn finish(mut self, last_chunk: &[u8]) -> RkResult<u16> {
        let (&last, body) = last_chunk.split_last().ok_or_else(|| {
            RkError::InvalidInput("cannot checksum an empty payload".to_string())
        })?;
        self.update(body);
        let low = self.sum.wrapping_add(last as u16) & 0x00FF;
        Ok((self.sum & 0xFF00) | low)
    }
}

/// Compute the tape checksum of a whole payload.
pub fn checksum(payload: &[u8]) -> RkResult<u16> {
    ChecksumAccumulator::new().finish(payload)
}
