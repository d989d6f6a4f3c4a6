//! All-or-nothing output files.

use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::Builder;

use crate::error::RkResult;

/// Write `data` to `path` so that the destination either keeps its previous
/// content or holds the complete new content, never a truncated file.
///
/// The bytes go to a temporary file in the destination directory, which is
/// then renamed over the target. A replaced file keeps its permissions; a new
/// file gets the usual mode for created files (0666 less the umask on Unix).
pub fn publish_atomically(path: &Path, data: &[u8]) -> RkResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(data)?;
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!("Published {} bytes to {}", data.len(), path.display());
    Ok(())
}
