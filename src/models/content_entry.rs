use serde::{Deserialize, Serialize};

/// Entry type reported by the contents API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
    /// `symlink`, `submodule` and anything newer
    #[serde(other)]
    Other,
}

/// One item of a directory listing. Extra API fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: String,
}

impl ContentEntry {
    pub fn dir(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Dir,
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::File,
            name: name.into(),
            path: path.into(),
        }
    }
}
