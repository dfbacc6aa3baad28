use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod hardware_address;

pub use hardware_address::{is_hardware_address, normalize_hardware_address};

/// One entry of the DHCP IPv4 MAC filter lists.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct DhcpFilter {
    /// `true` for the allow list, `false` for the deny list.
    pub allow: bool,
    pub address: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct DhcpLease {
    pub ip_v4: String,
    pub address: String,
    /// Filled from the filter list when the lease address has a filter entry.
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct DnsRecord {
    pub name: String,
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Repository,
    Folder,
}

/// A repository or a folder inside one. Children are owned by their parent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct RepositoryItem {
    pub id: String,
    pub repository: String,
    pub name: String,
    pub path: String,
    pub kind: ItemKind,
    pub url: String,
    #[serde(default)]
    pub revisions: u64,
    #[serde(default)]
    pub children: Vec<RepositoryItem>,
}

impl RepositoryItem {
    /// Total number of items in this subtree, the item itself included.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(RepositoryItem::subtree_len)
            .sum::<usize>()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    NoAccess,
    ReadOnly,
    ReadWrite,
}

impl AccessLevel {
    /// Parses the access column of the access rule listings. Unknown values mean no access.
    #[must_use]
    pub fn from_listing(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "readonly" => Self::ReadOnly,
            "readwrite" => Self::ReadWrite,
            _ => Self::NoAccess,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoAccess => "NoAccess",
            Self::ReadOnly => "ReadOnly",
            Self::ReadWrite => "ReadWrite",
        }
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "noaccess" | "none" => Ok(Self::NoAccess),
            "readonly" | "read" => Ok(Self::ReadOnly),
            "readwrite" | "write" => Ok(Self::ReadWrite),
            other => Err(format!("unknown access level: {other}")),
        }
    }
}

/// An access rule as seen from a repository path.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Permission {
    pub account_id: String,
    pub account_name: String,
    pub access_level: AccessLevel,
    /// The rule is declared on another path and applies here by inheritance.
    pub inherited: bool,
}

/// An access rule as seen from an account.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct UserPermission {
    pub repository: String,
    pub path: String,
    pub access_level: AccessLevel,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct DirectoryUser {
    /// Canonical textual security identifier, e.g. `S-1-5-32-544`.
    pub id: String,
    pub name: String,
    pub account: String,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn access_level_listing_values_are_case_insensitive() {
        assert_eq!(AccessLevel::from_listing("ReadWrite"), AccessLevel::ReadWrite);
        assert_eq!(AccessLevel::from_listing("readonly"), AccessLevel::ReadOnly);
        assert_eq!(AccessLevel::from_listing("NoAccess"), AccessLevel::NoAccess);
        assert_eq!(AccessLevel::from_listing("Bogus"), AccessLevel::NoAccess);
    }

    #[test]
    fn access_level_parses_cli_spellings() {
        assert_eq!("read-write".parse::<AccessLevel>(), Ok(AccessLevel::ReadWrite));
        assert_eq!("ReadOnly".parse::<AccessLevel>(), Ok(AccessLevel::ReadOnly));
        assert!("admin".parse::<AccessLevel>().is_err());
    }

    #[test]
    fn records_serialize_with_snake_case_fields() {
        let lease = DhcpLease {
            ip_v4: "172.16.11.19".to_string(),
            address: "90-94-97-8B-F5-F8".to_string(),
            comment: String::new(),
        };
        let raw = serialize_json(&lease).unwrap();
        assert_eq!(
            raw,
            r#"{"ip_v4":"172.16.11.19","address":"90-94-97-8B-F5-F8","comment":""}"#
        );

        let permission = Permission {
            account_id: "S-1-5-32-545".to_string(),
            account_name: "BUILTIN\\Users".to_string(),
            access_level: AccessLevel::ReadWrite,
            inherited: true,
        };
        let value: serde_json::Value = serde_json::from_str(&serialize_json(&permission).unwrap()).unwrap();
        assert_eq!(value["access_level"], "read_write");
    }

    #[test]
    fn subtree_len_counts_nested_children() {
        let leaf = |name: &str| RepositoryItem {
            id: name.to_string(),
            repository: "test".to_string(),
            name: name.to_string(),
            path: format!("/{name}"),
            kind: ItemKind::Folder,
            url: String::new(),
            revisions: 0,
            children: Vec::new(),
        };
        let mut trunk = leaf("trunk");
        trunk.children.push(leaf("docs"));
        let mut root = leaf("test");
        root.kind = ItemKind::Repository;
        root.children = vec![trunk, leaf("tags")];
        assert_eq!(root.subtree_len(), 4);
    }
}
