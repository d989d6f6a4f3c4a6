//! In-memory volume implementation.

use super::{Attributes, FileInfo, Volume};
use crate::error::{RkError, RkResult};

/// Stored file, kept in directory order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub name: String,
    pub data: Vec<u8>,
    pub load_address: u16,
    pub attributes: Attributes,
}

impl Entry {
    pub fn info(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            load_address: self.load_address,
            size: self.data.len(),
            attributes: self.attributes,
        }
    }
}

/// Simple in-memory volume.
#[derive(Debug, Default, Clone)]
pub struct MemoryVolume {
    entries: Vec<Entry>,
}

impl MemoryVolume {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with no attributes, replacing any file of that name.
    pub fn add_file(&mut self, name: &str, data: impl Into<Vec<u8>>, load_address: u16) {
        let entry = Entry {
            name: name.to_string(),
            data: data.into(),
            load_address,
            attributes: Attributes::default(),
        };
        match self.position(name) {
            Some(idx) => self.entries[idx] = entry,
            None => self.entries.push(entry),
        }
    }

    pub(crate) fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
    }

    fn position_or_not_found(&self, name: &str) -> RkResult<usize> {
        self.position(name)
            .ok_or_else(|| RkError::FileNotFound(name.to_string()))
    }
}

impl Volume for MemoryVolume {
    fn read_file(&self, name: &str) -> RkResult<(Vec<u8>, u16)> {
        let entry = &self.entries[self.position_or_not_found(name)?];
        Ok((entry.data.clone(), entry.load_address))
    }

    fn write_file(
        &mut self,
        name: &str,
        data: &[u8],
        load_address: u16,
        attributes: Attributes,
        overwrite: bool,
    ) -> RkResult<()> {
        let entry = Entry {
            name: name.to_string(),
            data: data.to_vec(),
            load_address,
            attributes,
        };
        match self.position(name) {
            Some(_) if !overwrite => Err(RkError::FileExists(name.to_string())),
            Some(idx) => {
                self.entries[idx] = entry;
                Ok(())
            }
            None => {
                self.entries.push(entry);
                Ok(())
            }
        }
    }

    fn delete_file(&mut self, name: &str) -> RkResult<()> {
        let idx = self.position_or_not_found(name)?;
        self.entries.remove(idx);
        Ok(())
    }

    fn set_attributes(&mut self, name: &str, attributes: Attributes) -> RkResult<()> {
        let idx = self.position_or_not_found(name)?;
        self.entries[idx].attributes = attributes;
        Ok(())
    }

    fn list_files(&self) -> Vec<FileInfo> {
        self.entries.iter().map(Entry::info).collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}
