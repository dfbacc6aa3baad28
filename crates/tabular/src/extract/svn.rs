//! VisualSVN PowerShell listings (`Get-SvnRepository`, `Get-SvnRepositoryItem`,
//! `Select-SvnAccessRule`, `Get-SvnAccessRule`), all printed as
//! `Header` / `------` / rows.

use crate::error::ParseError;
use crate::lines::{fields, Separator};
use crate::listing::{Extractor, ParseOutcome, TableGate};
use crate::limits::ParserLimits;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use winops_protocol::{AccessLevel, ItemKind, Permission, RepositoryItem, UserPermission};

pub const ROOT_PATH: &str = "/";

/// Stable identity of a repository item: hex of the first 16 bytes of
/// SHA-256 over `"{repository}-{path}"`.
#[must_use]
pub fn item_id(repository: &str, path: &str) -> String {
    let digest = Sha256::digest(format!("{repository}-{path}").as_bytes());
    let mut out = String::with_capacity(32);
    for b in &digest[..16] {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// `Get-SvnRepository | Select Name,Revisions,URL`
#[derive(Debug, Clone)]
pub struct RepositoryExtractor {
    min_len: usize,
}

impl RepositoryExtractor {
    #[must_use]
    pub fn new(limits: &ParserLimits) -> Self {
        Self {
            min_len: limits.repositories,
        }
    }
}

impl Default for RepositoryExtractor {
    fn default() -> Self {
        Self::new(&ParserLimits::default())
    }
}

impl Extractor for RepositoryExtractor {
    type State = TableGate;
    type Record = RepositoryItem;

    fn min_len(&self) -> usize {
        self.min_len
    }

    fn step(&self, gate: TableGate, line: &str) -> (TableGate, ParseOutcome<RepositoryItem>) {
        let (gate, is_row) = gate.admit(line);
        if !is_row {
            return (gate, ParseOutcome::Skip);
        }
        let fields = fields(line, Separator::Space);
        if fields.len() < 3 {
            return (gate, ParseOutcome::Skip);
        }
        let Ok(revisions) = fields[1].parse::<u64>() else {
            return (gate, ParseOutcome::Skip);
        };
        let name = fields[0];
        let item = RepositoryItem {
            id: item_id(name, ROOT_PATH),
            repository: name.to_string(),
            name: name.to_string(),
            path: ROOT_PATH.to_string(),
            kind: ItemKind::Repository,
            url: fields[2].to_string(),
            revisions,
            children: Vec::new(),
        };
        (gate, ParseOutcome::Record(item))
    }
}

/// `Get-SvnRepositoryItem <repo> <path> -Type Folder | Select Repository,Name,Path,Url`
///
/// Every row must name the repository that was queried. Rows whose path is
/// not strictly below the queried path are skipped.
#[derive(Debug, Clone)]
pub struct FolderExtractor {
    min_len: usize,
    repository: String,
    parent: String,
}

impl FolderExtractor {
    pub fn new(limits: &ParserLimits, repository: impl Into<String>) -> Self {
        Self {
            min_len: limits.folders,
            repository: repository.into(),
            parent: ROOT_PATH.to_string(),
        }
    }

    /// Path that was queried; defaults to the repository root.
    #[must_use]
    pub fn under(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }
}

/// True when `path` is nested under `parent`, and not equal to it.
fn is_strictly_below(path: &str, parent: &str) -> bool {
    let parent = parent.trim_end_matches('/');
    path.strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|rest| !rest.trim_matches('/').is_empty())
}

impl Extractor for FolderExtractor {
    type State = TableGate;
    type Record = RepositoryItem;

    fn min_len(&self) -> usize {
        self.min_len
    }

    fn step(&self, gate: TableGate, line: &str) -> (TableGate, ParseOutcome<RepositoryItem>) {
        let (gate, is_row) = gate.admit(line);
        if !is_row {
            return (gate, ParseOutcome::Skip);
        }
        let fields = fields(line, Separator::Space);
        let &[repository, name, path, url] = fields.as_slice() else {
            return (gate, ParseOutcome::Skip);
        };
        if !repository.eq_ignore_ascii_case(&self.repository) {
            let err = ParseError::ScopeMismatch {
                expected: self.repository.clone(),
                found: repository.to_string(),
            };
            return (gate, ParseOutcome::Error(err));
        }
        if !is_strictly_below(path, &self.parent) {
            return (gate, ParseOutcome::Skip);
        }
        let item = RepositoryItem {
            id: item_id(repository, path),
            repository: repository.to_string(),
            name: name.to_string(),
            path: path.to_string(),
            kind: ItemKind::Folder,
            url: url.to_string(),
            revisions: 0,
            children: Vec::new(),
        };
        (gate, ParseOutcome::Record(item))
    }
}

/// `Select-SvnAccessRule <repo> -Path <path> | Select Path,Access,AccountId,AccountName`
#[derive(Debug, Clone)]
pub struct PermissionExtractor {
    min_len: usize,
    path: String,
}

impl PermissionExtractor {
    pub fn new(limits: &ParserLimits, path: impl Into<String>) -> Self {
        Self {
            min_len: limits.permissions,
            path: path.into(),
        }
    }
}

impl Extractor for PermissionExtractor {
    type State = TableGate;
    type Record = Permission;

    fn min_len(&self) -> usize {
        self.min_len
    }

    fn step(&self, gate: TableGate, line: &str) -> (TableGate, ParseOutcome<Permission>) {
        let (gate, is_row) = gate.admit(line);
        if !is_row {
            return (gate, ParseOutcome::Skip);
        }
        let fields = fields(line, Separator::Space);
        let &[path, access, account_id, account_name] = fields.as_slice() else {
            return (gate, ParseOutcome::Skip);
        };
        let permission = Permission {
            account_id: account_id.to_string(),
            account_name: account_name.to_string(),
            access_level: AccessLevel::from_listing(access),
            inherited: !path.eq_ignore_ascii_case(&self.path),
        };
        (gate, ParseOutcome::Record(permission))
    }
}

/// `Get-SvnAccessRule -AccountId <sid> | Select Repository,Path,Access`
#[derive(Debug, Clone)]
pub struct UserPermissionExtractor {
    min_len: usize,
}

impl UserPermissionExtractor {
    #[must_use]
    pub fn new(limits: &ParserLimits) -> Self {
        Self {
            min_len: limits.permissions,
        }
    }
}

impl Extractor for UserPermissionExtractor {
    type State = TableGate;
    type Record = UserPermission;

    fn min_len(&self) -> usize {
        self.min_len
    }

    fn step(&self, gate: TableGate, line: &str) -> (TableGate, ParseOutcome<UserPermission>) {
        let (gate, is_row) = gate.admit(line);
        if !is_row {
            return (gate, ParseOutcome::Skip);
        }
        let fields = fields(line, Separator::Space);
        let &[repository, path, access] = fields.as_slice() else {
            return (gate, ParseOutcome::Skip);
        };
        let permission = UserPermission {
            repository: repository.to_string(),
            path: path.to_string(),
            access_level: AccessLevel::from_listing(access),
        };
        (gate, ParseOutcome::Record(permission))
    }
}
