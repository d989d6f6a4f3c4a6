//! RK Disk Tool Core
//!
//! This crate provides the data transforms behind the `rkdisk` tool for
//! Radio-86RK family disk volumes:
//! - Tape (`.rk`) container encoding with the monitor loader's checksum
//! - Native text conversion to KOI8-R, Windows-1251 or UTF-8
//! - A file-level `Volume` interface with in-memory and ZIP-backed storage
//!
//! # Architecture
//!
//! The codecs are pure functions over byte slices:
//! - `checksum` / `ChecksumAccumulator`: 16-bit tape checksum
//! - `encode`: header + payload + footer framing
//! - `transcode`: per-byte native text conversion
//!
//! `extract` wires them to a `Volume` and to host files, publishing every
//! output file atomically.

pub mod checksum;
pub mod codepage;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod tape;
pub mod volume;

pub use checksum::{checksum, ChecksumAccumulator};
pub use codepage::{transcode, CodePage, LineEnding};
pub use config::Config;
pub use error::{RkError, RkResult};
pub use extract::{add_from_path, extract_bytes, extract_to_path, parse_address, ExtractOptions};
pub use output::publish_atomically;
pub use tape::{encode, write_tape, write_tape_file, TapeFooter, TapeHeader};
pub use volume::{to_rk_dos_name, ArchiveVolume, Attributes, FileInfo, MemoryVolume, Volume};
