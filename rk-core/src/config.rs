//! Tool configuration loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codepage::{CodePage, LineEnding};
use crate::error::RkResult;

/// Defaults for extraction and adding, overridable on the command line.
///
/// ```json
/// { "codePage": "UTF-8", "lineEnding": "crlf", "loadAddress": 0 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Text conversion applied on extraction when none is given.
    #[serde(default)]
    pub code_page: Option<CodePage>,
    #[serde(default)]
    pub line_ending: LineEnding,
    /// Load address for added files when none is given.
    #[serde(default)]
    pub load_address: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            code_page: None,
            line_ending: LineEnding::native(),
            load_address: 0,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> RkResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> RkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
