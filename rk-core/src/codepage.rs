//! Conversion of RK native text to host encodings.
//!
//! The machine stores Cyrillic capitals in the 0x60..=0x7E band of a 7-bit
//! KOI set. Adding 0x80 lands them on the KOI8-R capitals, which then index
//! the tables below for the other output encodings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RkError;

/// Native bytes of the Cyrillic band, after the 0x80 shift.
const KOI8_CAPITALS_START: u8 = 0xE0;

/// KOI8-R capitals 0xE0..=0xFE as Windows-1251.
#[rustfmt::skip]
pub static WIN1251_TABLE: [u8; 31] = [
    0xDE, 0xC0, 0xC1, 0xD6, 0xC4, 0xC5, 0xD4, 0xC3,
    0xD5, 0xC8, 0xC9, 0xCA, 0xCB, 0xCC, 0xCD, 0xCE,
    0xCF, 0xDF, 0xD0, 0xD1, 0xD2, 0xD3, 0xC6, 0xC2,
    0xDC, 0xDB, 0xC7, 0xD8, 0xDD, 0xD9, 0xD7,
];

/// KOI8-R capitals 0xE0..=0xFE as UTF-8, lead byte in the high half.
#[rustfmt::skip]
pub static UTF8_TABLE: [u16; 31] = [
    0xD0AE, 0xD090, 0xD091, 0xD0A6, 0xD094, 0xD095, 0xD0A4, 0xD093,
    0xD0A5, 0xD098, 0xD099, 0xD09A, 0xD09B, 0xD09C, 0xD09D, 0xD09E,
    0xD09F, 0xD0AF, 0xD0A0, 0xD0A1, 0xD0A2, 0xD0A3, 0xD096, 0xD092,
    0xD0AC, 0xD0AB, 0xD097, 0xD0A8, 0xD0AD, 0xD0A9, 0xD0A7,
];

/// Output text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CodePage {
    /// KOI8-R, the native set with the Cyrillic band shifted up.
    Koi8,
    Win1251,
    Utf8,
}

impl CodePage {
    pub const ALL: [CodePage; 3] = [CodePage::Koi8, CodePage::Win1251, CodePage::Utf8];

    /// Canonical name, as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            CodePage::Koi8 => "KOI8-R",
            CodePage::Win1251 => "CP1251",
            CodePage::Utf8 => "UTF-8",
        }
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodePage {
    type Err = RkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "KOI8-R" | "KOI8" => Ok(CodePage::Koi8),
            "CP1251" | "WIN1251" | "WINDOWS-1251" => Ok(CodePage::Win1251),
            "UTF-8" | "UTF8" => Ok(CodePage::Utf8),
            _ => Err(RkError::InvalidCodePage(s.to_string())),
        }
    }
}

impl TryFrom<String> for CodePage {
    type Error = RkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CodePage> for String {
    fn from(cp: CodePage) -> Self {
        cp.name().to_string()
    }
}

/// Line terminator written in place of the native CR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    /// Convention of the host this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    fn bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::Crlf => b"\r\n",
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        Self::native()
    }
}

impl FromStr for LineEnding {
    type Err = RkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" => Ok(LineEnding::Lf),
            "crlf" => Ok(LineEnding::Crlf),
            _ => Err(RkError::InvalidInput(format!("unknown line ending: {}", s))),
        }
    }
}

/// Convert native text to `target`, replacing each CR with `line_ending`.
///
/// Total over all inputs: 0xFF is dropped, the Cyrillic band is remapped and
/// everything else passes through unchanged.
pub fn transcode(source: &[u8], target: CodePage, line_ending: LineEnding) -> Vec<u8> {
    let mut dst = Vec::with_capacity(source.len() + source.len() / 8);

    for &ch in source {
        match ch {
            0x0D => dst.extend_from_slice(line_ending.bytes()),
            0xFF => {}
            0x60..=0x7E => {
                let native = ch + 0x80;
                let index = (native - KOI8_CAPITALS_START) as usize;
                match target {
                    CodePage::Koi8 => dst.push(native),
                    CodePage::Win1251 => dst.push(WIN1251_TABLE[index]),
                    CodePage::Utf8 => {
                        let [hi, lo] = UTF8_TABLE[index].to_be_bytes();
                        if hi != 0 {
                            dst.push(hi);
                        }
                        dst.push(lo);
                    }
                }
            }
            _ => dst.push(ch),
        }
    }

    dst
}
