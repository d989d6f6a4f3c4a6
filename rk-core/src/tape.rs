//! Tape (`.rk`) container encoder.
//!
//! Layout, all addresses big-endian:
//!
//! ```text
//! 0       load address (2 bytes)
//! 2       end address (2 bytes)
//! 4       payload (N bytes)
//! 4+N     0x00 0x00 0xE6
//! 7+N     checksum (2 bytes)
//! ```

use std::io::Write;
use std::path::Path;

use log::debug;

use crate::checksum::checksum;
use crate::error::{RkError, RkResult};
use crate::output::publish_atomically;

pub const HEADER_SIZE: usize = 4;
pub const FOOTER_SIZE: usize = 5;
/// Sync byte the loader searches for before reading the checksum.
pub const SYNC_BYTE: u8 = 0xE6;

/// Address range occupied by the payload once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeHeader {
    pub load_address: u16,
    pub end_address: u16,
}

impl TapeHeader {
    /// Build a header for a payload of `len` bytes.
    ///
    /// The end address wraps around at 64K without complaint, as the
    /// format has always done.
    pub fn new(load_address: u16, len: usize) -> Self {
        let end_address = load_address.wrapping_add(len as u16).wrapping_sub(1);
        Self {
            load_address,
            end_address,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[0..2].copy_from_slice(&self.load_address.to_be_bytes());
        header[2..4].copy_from_slice(&self.end_address.to_be_bytes());
        header
    }
}

/// Trailer carrying the sync byte and checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeFooter {
    pub checksum: u16,
}

impl TapeFooter {
    pub fn to_bytes(&self) -> [u8; FOOTER_SIZE] {
        let [hi, lo] = self.checksum.to_be_bytes();
        [0x00, 0x00, SYNC_BYTE, hi, lo]
    }
}

/// Frame `payload` as a tape container loading at `load_address`.
pub fn encode(payload: &[u8], load_address: u16) -> RkResult<Vec<u8>> {
    if payload.is_empty() {
        return Err(RkError::InvalidInput(
            "cannot build a tape container from an empty payload".to_string(),
        ));
    }

    let header = TapeHeader::new(load_address, payload.len());
    let footer = TapeFooter {
        checksum: checksum(payload)?,
    };

    debug!(
        "Tape container {:04X}-{:04X}, {} bytes, checksum {:04X}",
        header.load_address,
        header.end_address,
        payload.len(),
        footer.checksum
    );

    let mut output = Vec::with_capacity(HEADER_SIZE + payload.len() + FOOTER_SIZE);
    output.extend_from_slice(&header.to_bytes());
    output.extend_from_slice(payload);
    output.extend_from_slice(&footer.to_bytes());
    Ok(output)
}

/// Encode and write a tape container to any sink.
///
/// The container is built in full before the first write, so a rejected
/// payload leaves the sink untouched.
pub fn write_tape<W: Write>(sink: &mut W, payload: &[u8], load_address: u16) -> RkResult<()> {
    let container = encode(payload, load_address)?;
    sink.write_all(&container)?;
    sink.flush()?;
    Ok(())
}

/// Encode a tape container and publish it at `path`.
pub fn write_tape_file(path: &Path, payload: &[u8], load_address: u16) -> RkResult<()> {
    let container = encode(payload, load_address)?;
    publish_atomically(path, &container)
}
