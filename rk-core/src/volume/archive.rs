//! ZIP-backed volume with manifest support.
//!
//! File contents are stored as archive entries. An optional `manifest.mf`
//! JSON entry keeps directory order, load addresses and attributes.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::memory::{Entry, MemoryVolume};
use super::{Attributes, FileInfo, Volume};
use crate::error::{RkError, RkResult};
use crate::extract::parse_address;
use crate::output::publish_atomically;

const MANIFEST_NAME: &str = "manifest.mf";

/// Directory record in a volume manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    name: String,
    /// Hexadecimal, e.g. "0x3000"
    #[serde(default)]
    load_address: Option<String>,
    #[serde(default)]
    attributes: Attributes,
}

/// Volume manifest schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeManifest {
    #[serde(default)]
    files: Vec<ManifestEntry>,
}

/// Volume stored in a ZIP archive on the host.
///
/// Changes are kept in memory until [`save`](Self::save) is called.
pub struct ArchiveVolume {
    path: PathBuf,
    inner: MemoryVolume,
}

impl ArchiveVolume {
    /// Create a new, empty volume at `path`, replacing any existing file.
    pub fn create(path: &Path) -> RkResult<Self> {
        let vol = Self {
            path: path.to_path_buf(),
            inner: MemoryVolume::new(),
        };
        vol.save()?;
        info!("Formatted volume {}", path.display());
        Ok(vol)
    }

    /// Open an existing volume.
    pub fn open(path: &Path) -> RkResult<Self> {
        let file = File::open(path)?;
        let inner = load_entries(BufReader::new(file))?;
        info!(
            "Opened volume {} ({} files)",
            path.display(),
            inner.entries().len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the volume back to its archive.
    pub fn save(&self) -> RkResult<()> {
        let data = write_entries(self.inner.entries())?;
        publish_atomically(&self.path, &data)
    }
}

impl Volume for ArchiveVolume {
    fn read_file(&self, name: &str) -> RkResult<(Vec<u8>, u16)> {
        self.inner.read_file(name)
    }

    fn write_file(
        &mut self,
        name: &str,
        data: &[u8],
        load_address: u16,
        attributes: Attributes,
        overwrite: bool,
    ) -> RkResult<()> {
        if name.eq_ignore_ascii_case(MANIFEST_NAME) {
            return Err(RkError::InvalidInput(format!(
                "{} is reserved for the volume directory",
                name
            )));
        }
        self.inner
            .write_file(name, data, load_address, attributes, overwrite)
    }

    fn delete_file(&mut self, name: &str) -> RkResult<()> {
        self.inner.delete_file(name)
    }

    fn set_attributes(&mut self, name: &str, attributes: Attributes) -> RkResult<()> {
        self.inner.set_attributes(name, attributes)
    }

    fn list_files(&self) -> Vec<FileInfo> {
        self.inner.list_files()
    }

    fn exists(&self, name: &str) -> bool {
        self.inner.exists(name)
    }
}

fn load_entries<R: Read + Seek>(reader: R) -> RkResult<MemoryVolume> {
    let mut archive = ZipArchive::new(reader)?;
    let mut all_files: Vec<(String, Vec<u8>)> = Vec::new();
    let mut manifest = VolumeManifest::default();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;

        if name.eq_ignore_ascii_case(MANIFEST_NAME) {
            manifest = serde_json::from_slice(&content)?;
            continue;
        }

        // Nested paths: take just the filename
        let filename = name.rsplit('/').next().unwrap_or(&name);
        if filename.eq_ignore_ascii_case(MANIFEST_NAME) {
            warn!("Skipping {}: name is reserved for the volume directory", name);
        } else if all_files.iter().any(|(n, _)| n.eq_ignore_ascii_case(filename)) {
            warn!("Skipping {}: a file named {} is already loaded", name, filename);
        } else {
            all_files.push((filename.to_string(), content));
        }
    }

    let mut entries = Vec::with_capacity(all_files.len());
    for record in manifest.files {
        let Some(idx) = all_files
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(&record.name))
        else {
            warn!("Manifest lists {} but the archive has no data for it", record.name);
            continue;
        };
        let (_, data) = all_files.remove(idx);
        let load_address = match record.load_address.as_deref() {
            Some(text) => parse_address(text)?,
            None => 0,
        };
        entries.push(Entry {
            name: record.name,
            data,
            load_address,
            attributes: record.attributes,
        });
    }

    // Files missing from the manifest go last, in name order
    let mut unlisted = all_files;
    unlisted.sort_by(|a, b| a.0.cmp(&b.0));
    entries.extend(unlisted.into_iter().map(|(name, data)| Entry {
        name,
        data,
        load_address: 0,
        attributes: Attributes::default(),
    }));

    Ok(MemoryVolume::from_entries(entries))
}

fn write_entries(entries: &[Entry]) -> RkResult<Vec<u8>> {
    let manifest = VolumeManifest {
        files: entries
            .iter()
            .map(|e| ManifestEntry {
                name: e.name.clone(),
                load_address: Some(format!("0x{:04X}", e.load_address)),
                attributes: e.attributes,
            })
            .collect(),
    };

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file(MANIFEST_NAME, options)?;
    zip.write_all(&serde_json::to_vec_pretty(&manifest)?)?;

    for entry in entries {
        zip.start_file(entry.name.as_str(), options)?;
        zip.write_all(&entry.data)?;
    }

    Ok(zip.finish()?.into_inner())
}
