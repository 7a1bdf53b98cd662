//! Pipeline configuration.
//!
//! Each boolean gates one pipeline stage. Relative stage order is fixed in
//! [`crate::Normalizer`] no matter which subset is enabled.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_true() -> bool {
    true
}

/// Stage toggles for the formal normalizer. Everything defaults to on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Collapse duplicate spaces/newlines/half-spaces, drop kashida.
    #[serde(default = "default_true")]
    pub remove_extra_spaces: bool,
    /// Strip fatha/damma/kasra and friends (U+064B..U+0652).
    #[serde(default = "default_true")]
    pub remove_diacritics: bool,
    /// Strip Arabic superscript/subscript and ornament marks.
    #[serde(default = "default_true")]
    pub remove_special_chars: bool,
    /// Collapse letters repeated 3+ times down to 2.
    #[serde(default = "default_true")]
    pub decrease_repeated_chars: bool,
    /// Fix spacing around prefixes and suffixes (half-space insertion).
    #[serde(default = "default_true")]
    pub affix_spacing: bool,
    /// Fix spacing around punctuation marks.
    #[serde(default = "default_true")]
    pub punctuation_spacing: bool,
    /// Persian typography: guillemets, momayez, ellipsis.
    #[serde(default = "default_true")]
    pub persian_style: bool,
    /// Replace Latin/Arabic-Indic digits with Persian digits.
    #[serde(default = "default_true")]
    pub persian_numbers: bool,
    /// Expand honorific/religious ligature codepoints to their word forms.
    #[serde(default = "default_true")]
    pub unicode_replacement: bool,
    /// Detach می/نمی verb prefixes with a half-space.
    #[serde(default = "default_true")]
    pub separate_mi: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            remove_extra_spaces: true,
            remove_diacritics: true,
            remove_special_chars: true,
            decrease_repeated_chars: true,
            affix_spacing: true,
            punctuation_spacing: true,
            persian_style: true,
            persian_numbers: true,
            unicode_replacement: true,
            separate_mi: true,
        }
    }
}

impl NormalizerConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Options for the colloquial normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformalConfig {
    /// Formal pipeline options applied before token analysis.
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    /// Try to re-insert missing spaces in run-together tokens.
    #[serde(default)]
    pub recover_missing_spaces: bool,
}
