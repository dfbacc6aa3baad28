use crate::error::{AdminError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use winops_protocol::DirectoryUser;
use winops_tabular::extract::{users_from_entries, DirectoryEntry};

/// Whatever answers the `(objectCategory=Person)(objectClass=user)` search
/// under the configured base: `sAMAccountName`, `displayName` and the raw
/// `objectSid` of every user.
#[async_trait]
pub trait DirectorySearch: Send + Sync {
    async fn user_entries(&self) -> Result<Vec<DirectoryEntry>>;
}

/// Directory users, resolved to textual security identifiers.
pub struct DirectoryService {
    search: Arc<dyn DirectorySearch>,
}

impl DirectoryService {
    pub fn new(search: Arc<dyn DirectorySearch>) -> Self {
        Self { search }
    }

    pub async fn users(&self) -> Result<Vec<DirectoryUser>> {
        let entries = self.search.user_entries().await?;
        log::debug!("directory: {} user entries", entries.len());
        Ok(users_from_entries(entries))
    }
}

/// One user entry as exported to JSON, with the binary SID base64 encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportedEntry {
    #[serde(alias = "sAMAccountName")]
    pub account: String,
    pub display_name: String,
    pub object_sid: String,
}

impl ExportedEntry {
    pub fn into_entry(self) -> Result<DirectoryEntry> {
        let object_sid = STANDARD.decode(self.object_sid.trim()).map_err(|err| {
            AdminError::InvalidArgument(format!("objectSid of {}: {err}", self.account))
        })?;
        Ok(DirectoryEntry {
            account: self.account,
            display_name: self.display_name,
            object_sid,
        })
    }
}

/// Entries captured from an earlier directory export.
#[derive(Debug, Clone, Default)]
pub struct CapturedDirectory {
    entries: Vec<DirectoryEntry>,
}

impl CapturedDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    /// Parses a JSON array of [`ExportedEntry`].
    pub fn from_json(text: &str) -> Result<Self> {
        let exported: Vec<ExportedEntry> = serde_json::from_str(text)
            .map_err(|err| AdminError::InvalidArgument(format!("directory export: {err}")))?;
        let entries = exported
            .into_iter()
            .map(ExportedEntry::into_entry)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(entries))
    }
}

#[async_trait]
impl DirectorySearch for CapturedDirectory {
    async fn user_entries(&self) -> Result<Vec<DirectoryEntry>> {
        Ok(self.entries.clone())
    }
}
