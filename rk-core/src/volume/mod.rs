//! Volume abstractions for RK-DOS file storage.
//!
//! - `Volume`: file-level interface the extraction pipelines work against
//! - `MemoryVolume`: in-memory implementation
//! - `ArchiveVolume`: ZIP-backed implementation with a JSON manifest

mod archive;
mod memory;
mod name;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RkResult;

pub use archive::ArchiveVolume;
pub use memory::MemoryVolume;
pub use name::to_rk_dos_name;

/// RK-DOS file attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl Attributes {
    pub const READ_ONLY: u8 = 0x80;
    pub const HIDDEN: u8 = 0x40;

    pub fn new(read_only: bool, hidden: bool) -> Self {
        Self { read_only, hidden }
    }

    /// Attribute byte as stored in a directory entry.
    pub fn to_byte(&self) -> u8 {
        (if self.read_only { Self::READ_ONLY } else { 0 })
            | (if self.hidden { Self::HIDDEN } else { 0 })
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            read_only: byte & Self::READ_ONLY != 0,
            hidden: byte & Self::HIDDEN != 0,
        }
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.read_only {
            f.write_str("R")?;
        }
        if self.hidden {
            f.write_str("H")?;
        }
        Ok(())
    }
}

/// Directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub load_address: u16,
    pub size: usize,
    pub attributes: Attributes,
}

/// File-level interface to an RK-DOS volume.
///
/// Names are matched without regard to ASCII case.
pub trait Volume {
    /// Read file content and its load address.
    fn read_file(&self, name: &str) -> RkResult<(Vec<u8>, u16)>;

    /// Store a file. Fails with `FileExists` if the name is taken and
    /// `overwrite` is not set.
    fn write_file(
        &mut self,
        name: &str,
        data: &[u8],
        load_address: u16,
        attributes: Attributes,
        overwrite: bool,
    ) -> RkResult<()>;

    /// Delete a file.
    fn delete_file(&mut self, name: &str) -> RkResult<()>;

    /// Replace a file's attributes.
    fn set_attributes(&mut self, name: &str, attributes: Attributes) -> RkResult<()>;

    /// List files in directory order.
    fn list_files(&self) -> Vec<FileInfo>;

    /// Check if file exists.
    fn exists(&self, name: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_byte() {
        assert_eq!(Attributes::new(true, false).to_byte(), 0x80);
        assert_eq!(Attributes::new(false, true).to_byte(), 0x40);
        assert_eq!(Attributes::new(true, true).to_byte(), 0xC0);
        assert_eq!(Attributes::from_byte(0xC5), Attributes::new(true, true));
        assert_eq!(Attributes::from_byte(0x00), Attributes::default());
    }

    #[test]
    fn test_attribute_display() {
        assert_eq!(Attributes::new(true, true).to_string(), "RH");
        assert_eq!(Attributes::new(false, true).to_string(), "H");
        assert_eq!(Attributes::default().to_string(), "");
    }
}
