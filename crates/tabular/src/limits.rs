use serde::{Deserialize, Serialize};

/// Minimum line lengths, in bytes without the terminator, below which a line
/// of a given listing cannot hold a record.
///
/// These are cheap reject filters tuned to the column widths of the tool
/// versions seen so far, not correctness guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserLimits {
    /// Any line of `netsh ... show filter`, banners included.
    pub filters: usize,
    /// A filter data row (`index`, tab, 17-character address).
    pub filter_rows: usize,
    pub scopes: usize,
    pub leases: usize,
    pub dns: usize,
    pub repositories: usize,
    pub folders: usize,
    pub permissions: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            filters: 7,
            filter_rows: 19,
            scopes: 7,
            leases: 19,
            dns: 5,
            repositories: 5,
            folders: 7,
            permissions: 7,
        }
    }
}
