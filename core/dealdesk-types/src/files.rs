//! File listing returned by the files source, with storage quota metadata.

use serde::{Deserialize, Serialize};

/// Files attached to a deal plus the account's storage quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Files {
    pub files: Vec<File>,
    pub meta: FilesMeta,
}

impl Files {
    #[must_use]
    pub fn new(files: Vec<File>, meta: FilesMeta) -> Self {
        Self { files, meta }
    }

    /// Returns true if no files are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A single attached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: String,
    pub name: String,
}

impl File {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Storage quota, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesMeta {
    pub storage_limit: u64,
    pub current_storage_usage: u64,
}

impl FilesMeta {
    #[must_use]
    pub const fn new(storage_limit: u64, current_storage_usage: u64) -> Self {
        Self {
            storage_limit,
            current_storage_usage,
        }
    }

    /// Bytes left before the limit is reached. Zero once usage exceeds it.
    #[must_use]
    pub const fn remaining_storage(&self) -> u64 {
        self.storage_limit.saturating_sub(self.current_storage_usage)
    }

    #[must_use]
    pub const fn is_over_limit(&self) -> bool {
        self.current_storage_usage > self.storage_limit
    }
}
