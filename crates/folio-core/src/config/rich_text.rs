//! Rich-text conversion settings and the editor feature profile.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigError;

/// Rich-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RichTextConfig {
    /// Character budget for rich-text fields in `list` results. `null`
    /// disables truncation.
    #[serde(default = "default_list_truncate")]
    pub list_truncate_chars: Option<usize>,

    /// Inline editor profile.
    #[serde(default)]
    pub editor: EditorProfile,

    /// Profile file; read lazily on first conversion, overrides `editor`.
    #[serde(default)]
    pub editor_file: Option<PathBuf>,
}

impl Default for RichTextConfig {
    fn default() -> Self {
        Self {
            list_truncate_chars: default_list_truncate(),
            editor: EditorProfile::default(),
            editor_file: None,
        }
    }
}

/// Features enabled in the CMS's rich-text editor.
///
/// Markdown constructs whose feature is disabled degrade to paragraphs or
/// plain text when converted to the storage tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorProfile {
    /// Enabled heading levels (1 through 6).
    #[serde(default = "default_heading_levels")]
    pub headings: Vec<u8>,

    #[serde(default = "default_true")]
    pub lists: bool,

    #[serde(default = "default_true")]
    pub links: bool,

    #[serde(default = "default_true")]
    pub code: bool,

    #[serde(default = "default_true")]
    pub quote: bool,

    #[serde(default = "default_true")]
    pub strikethrough: bool,

    #[serde(default = "default_true")]
    pub horizontal_rule: bool,
}

impl Default for EditorProfile {
    fn default() -> Self {
        Self {
            headings: default_heading_levels(),
            lists: true,
            links: true,
            code: true,
            quote: true,
            strikethrough: true,
            horizontal_rule: true,
        }
    }
}

impl EditorProfile {
    /// Profile with every feature disabled: paragraphs and inline marks only.
    pub fn minimal() -> Self {
        Self {
            headings: Vec::new(),
            lists: false,
            links: false,
            code: false,
            quote: false,
            strikethrough: false,
            horizontal_rule: false,
        }
    }

    pub fn heading_enabled(&self, level: u8) -> bool {
        self.headings.contains(&level)
    }

    /// Load a profile from a YAML or JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let profile: EditorProfile = serde_yaml::from_str(&content)?;
        if let Some(level) = profile.headings.iter().find(|l| !(1..=6).contains(*l)) {
            return Err(ConfigError::Config(format!(
                "heading level {} out of range 1-6",
                level
            )));
        }
        Ok(profile)
    }
}

fn default_list_truncate() -> Option<usize> {
    Some(200)
}

fn default_heading_levels() -> Vec<u8> {
    vec![1, 2, 3, 4, 5, 6]
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: RichTextConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.list_truncate_chars, Some(200));
        assert!(config.editor.heading_enabled(6));
        assert!(config.editor.lists);
    }

    #[test]
    fn test_truncation_disabled() {
        let config: RichTextConfig = serde_yaml::from_str("list_truncate_chars: null").unwrap();
        assert_eq!(config.list_truncate_chars, None);
    }

    #[test]
    fn test_profile_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "headings: [2, 3]\nquote: false").unwrap();
        let profile = EditorProfile::from_file(file.path()).unwrap();
        assert!(!profile.heading_enabled(1));
        assert!(profile.heading_enabled(2));
        assert!(!profile.quote);
        assert!(profile.links);
    }

    #[test]
    fn test_profile_rejects_bad_level() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "headings: [7]").unwrap();
        assert!(EditorProfile::from_file(file.path()).is_err());
    }
}
