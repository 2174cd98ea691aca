//! Project configuration
//!
//! A `Project` identifies one hosted translation file location. Projects are
//! immutable per editing session and persist as a JSON array in a config
//! file the embedding application chooses.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::dict::ensure_input_is_array;

/// One language's translation dictionary. String values or nested
/// dictionaries, arbitrary depth. Key order is significant and survives
/// load, edit and serialize untouched (`serde_json` with `preserve_order`).
pub type Dict = serde_json::Map<String, serde_json::Value>;

/// Working branch used when the project config does not name one
pub const DEFAULT_BRANCH: &str = "translations";

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_indent() -> usize {
    2
}

/// A hosted translation file location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub title: String,

    /// Base URL of the translation files on the provider's API, ending with
    /// the directory that holds the per-language JSON files
    pub url: String,

    /// Access token; GitHub PAT or BitBucket `clientId:clientSecret` pair.
    /// Absent means anonymous/public requests only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Working branch commits land on
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Pretty-print indent width for the stored JSON
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Project {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            token: None,
            branch: default_branch(),
            indent: default_indent(),
        }
    }
}

/// Author attached to provider-side commits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

impl Default for CommitAuthor {
    fn default() -> Self {
        Self {
            name: "Translate Tool".to_string(),
            email: "translate@example.com".to_string(),
        }
    }
}

/// Load the project list from a JSON config file.
///
/// The file must hold an array of project configs; anything else is rejected
/// with a descriptive error rather than silently coerced.
pub fn load_projects(path: &Path) -> Result<Vec<Project>> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    ensure_input_is_array(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Save the project list back to its JSON config file
pub fn save_projects(path: &Path, projects: &[Project]) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let contents = serde_json::to_string_pretty(projects)?;
    std::fs::write(path, contents)?;
    Ok(())
}
