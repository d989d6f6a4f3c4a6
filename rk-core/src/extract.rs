//! Moving files between a volume and the host.

use std::path::Path;

use log::info;

use crate::codepage::{transcode, CodePage, LineEnding};
use crate::error::{RkError, RkResult};
use crate::output::publish_atomically;
use crate::tape::encode;
use crate::volume::{to_rk_dos_name, Attributes, Volume};

/// How a file is converted on its way out of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Wrap the result in a tape container at the file's load address.
    pub tape: bool,
    /// Treat the file as native text and convert it.
    pub code_page: Option<CodePage>,
    pub line_ending: LineEnding,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            tape: false,
            code_page: None,
            line_ending: LineEnding::native(),
        }
    }
}

/// Read `name` from `volume` and convert it according to `opts`.
///
/// Text conversion, when requested, happens before tape framing.
pub fn extract_bytes<V: Volume + ?Sized>(
    volume: &V,
    name: &str,
    opts: &ExtractOptions,
) -> RkResult<Vec<u8>> {
    let (mut body, load_address) = volume.read_file(name)?;
    if body.is_empty() {
        return Err(RkError::EmptyFile(name.to_string()));
    }

    if let Some(cp) = opts.code_page {
        body = transcode(&body, cp, opts.line_ending);
    }

    if opts.tape {
        body = encode(&body, load_address)?;
    }

    Ok(body)
}

/// Extract `name` from `volume` into the host file `target`.
pub fn extract_to_path<V: Volume + ?Sized>(
    volume: &V,
    name: &str,
    target: &Path,
    opts: &ExtractOptions,
) -> RkResult<()> {
    let data = extract_bytes(volume, name, opts)?;
    publish_atomically(target, &data)?;
    info!(
        "Extracted {} to {} ({} bytes)",
        name,
        target.display(),
        data.len()
    );
    Ok(())
}

/// Copy the host file at `host_path` into `volume`.
///
/// Returns the RK-DOS name the file was stored under.
pub fn add_from_path<V: Volume + ?Sized>(
    volume: &mut V,
    host_path: &Path,
    load_address: u16,
    attributes: Attributes,
    overwrite: bool,
) -> RkResult<String> {
    let data = std::fs::read(host_path)?;
    let host_name = host_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| RkError::InvalidInput(format!("bad file name: {}", host_path.display())))?;
    let name = to_rk_dos_name(host_name);

    volume.write_file(&name, &data, load_address, attributes, overwrite)?;
    info!(
        "Added {} as {} at {:04X} ({} bytes)",
        host_path.display(),
        name,
        load_address,
        data.len()
    );
    Ok(name)
}

/// Parse a hexadecimal address such as `3000`, `0x3000` or `0XDC00`.
pub fn parse_address(text: &str) -> RkResult<u16> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u16::from_str_radix(digits, 16).map_err(|_| RkError::InvalidAddress(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::MemoryVolume;

    fn volume() -> MemoryVolume {
        let mut vol = MemoryVolume::new();
        vol.add_file("GAME.BIN", vec![0x01, 0x02, 0x03], 0x1234);
        vol.add_file("README.TXT", vec![0x70, 0x72, 0x69, 0x77, 0x65, 0x74, 0x0D, 0xFF], 0);
        vol.add_file("EMPTY", Vec::new(), 0);
        vol
    }

    #[test]
    fn test_extract_raw() {
        let out = extract_bytes(&volume(), "game.bin", &ExtractOptions::default()).unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_extract_tape() {
        let opts = ExtractOptions {
            tape: true,
            ..Default::default()
        };
        let out = extract_bytes(&volume(), "GAME.BIN", &opts).unwrap();
        assert_eq!(
            out,
            vec![0x12, 0x34, 0x12, 0x36, 0x01, 0x02, 0x03, 0x00, 0x00, 0xE6, 0x03, 0x06]
        );
    }

    #[test]
    fn test_extract_text() {
        let opts = ExtractOptions {
            tape: false,
            code_page: Some(CodePage::Utf8),
            line_ending: LineEnding::Crlf,
        };
        let out = extract_bytes(&volume(), "README.TXT", &opts).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ПРИВЕТ\r\n");
    }

    #[test]
    fn test_extract_text_then_tape() {
        let opts = ExtractOptions {
            tape: true,
            code_page: Some(CodePage::Koi8),
            line_ending: LineEnding::Lf,
        };
        let out = extract_bytes(&volume(), "README.TXT", &opts).unwrap();
        // 7 transcoded bytes, 0xFF dropped
        assert_eq!(out.len(), 7 + 9);
        assert_eq!(&out[0..4], &[0x00, 0x00, 0x00, 0x06]);
        assert_eq!(&out[4..11], &[0xF0, 0xF2, 0xE9, 0xF7, 0xE5, 0xF4, 0x0A]);
    }

    #[test]
    fn test_extract_empty_and_missing() {
        let vol = volume();
        let opts = ExtractOptions::default();
        assert!(matches!(
            extract_bytes(&vol, "EMPTY", &opts),
            Err(RkError::EmptyFile(_))
        ));
        assert!(matches!(
            extract_bytes(&vol, "NOPE", &opts),
            Err(RkError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_extract_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("game.rk");
        let opts = ExtractOptions {
            tape: true,
            ..Default::default()
        };

        extract_to_path(&volume(), "GAME.BIN", &target, &opts).unwrap();
        assert_eq!(std::fs::read(&target).unwrap().len(), 3 + 9);
    }

    #[test]
    fn test_add_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let host = dir.path().join("my-program.bin");
        std::fs::write(&host, [0xC3, 0x00, 0xF8]).unwrap();

        let mut vol = MemoryVolume::new();
        let name = add_from_path(&mut vol, &host, 0x0000, Attributes::default(), false).unwrap();
        assert_eq!(name, "my_program.bin");
        assert_eq!(vol.read_file(&name).unwrap(), (vec![0xC3, 0x00, 0xF8], 0x0000));

        assert!(matches!(
            add_from_path(&mut vol, &host, 0x0000, Attributes::default(), false),
            Err(RkError::FileExists(_))
        ));
        add_from_path(&mut vol, &host, 0x0100, Attributes::default(), true).unwrap();
        assert_eq!(vol.read_file(&name).unwrap().1, 0x0100);
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("3000").unwrap(), 0x3000);
        assert_eq!(parse_address("0xdc00").unwrap(), 0xDC00);
        assert_eq!(parse_address("0XFFFF").unwrap(), 0xFFFF);
        assert!(parse_address("10000").is_err());
        assert!(parse_address("").is_err());
        assert!(parse_address("0x").is_err());
        assert!(parse_address("zz").is_err());
    }
}
