//! `netsh dhcp server V4 show filter` and the `Get-DhcpServerV4*` listings.

use crate::lines::{fields, Separator};
use crate::listing::{is_header_row, Extractor, ParseOutcome};
use crate::limits::ParserLimits;
use winops_protocol::{is_hardware_address, DhcpFilter, DhcpLease};

/// Banner fragments that switch the filter listing into allow mode.
pub const ALLOW_BANNERS: &[&str] = &["允许列表中所有", "allow list"];
/// Banner fragments that switch the filter listing into deny mode.
pub const DENY_BANNERS: &[&str] = &["拒绝列表中所有", "deny list"];

/// Rows look like `1<TAB>00-1C-23-20-AF-4A<TAB>Office PC`; the list they
/// belong to is announced by a localized banner line earlier in the output.
#[derive(Debug, Clone)]
pub struct FilterExtractor {
    min_len: usize,
    min_row_len: usize,
    allow_banners: Vec<String>,
    deny_banners: Vec<String>,
}

impl FilterExtractor {
    #[must_use]
    pub fn new(limits: &ParserLimits) -> Self {
        Self {
            min_len: limits.filters,
            min_row_len: limits.filter_rows,
            allow_banners: ALLOW_BANNERS.iter().map(|s| s.to_lowercase()).collect(),
            deny_banners: DENY_BANNERS.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    fn mode_switch(&self, line: &str) -> Option<bool> {
        let lower = line.to_lowercase();
        if self.allow_banners.iter().any(|b| lower.contains(b.as_str())) {
            Some(true)
        } else if self.deny_banners.iter().any(|b| lower.contains(b.as_str())) {
            Some(false)
        } else {
            None
        }
    }

    fn row(&self, allow: bool, line: &str) -> Option<DhcpFilter> {
        if line.len() < self.min_row_len {
            return None;
        }
        let fields = fields(line, Separator::Tab);
        if fields.len() < 2 {
            return None;
        }
        let index: i64 = fields[0].parse().ok()?;
        if index < 1 {
            return None;
        }
        let address = fields[1];
        if !is_hardware_address(address) {
            return None;
        }
        Some(DhcpFilter {
            allow,
            address: address.to_ascii_uppercase(),
            comment: fields.get(2).map(|c| (*c).to_string()).unwrap_or_default(),
        })
    }
}

impl Default for FilterExtractor {
    fn default() -> Self {
        Self::new(&ParserLimits::default())
    }
}

/// Allow/deny mode in effect for the rows that follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterMode {
    pub allow: bool,
}

impl Extractor for FilterExtractor {
    type State = FilterMode;
    type Record = DhcpFilter;

    fn min_len(&self) -> usize {
        self.min_len
    }

    fn step(&self, mut state: FilterMode, line: &str) -> (FilterMode, ParseOutcome<DhcpFilter>) {
        // A data row never switches the mode, whatever its comment says.
        if let Some(filter) = self.row(state.allow, line) {
            return (state, ParseOutcome::Record(filter));
        }
        if let Some(allow) = self.mode_switch(line) {
            state.allow = allow;
        }
        (state, ParseOutcome::Skip)
    }
}

/// `Get-DhcpServerV4Scope | Select ScopeId`: one scope id per row.
#[derive(Debug, Clone)]
pub struct ScopeExtractor {
    min_len: usize,
}

impl ScopeExtractor {
    #[must_use]
    pub fn new(limits: &ParserLimits) -> Self {
        Self {
            min_len: limits.scopes,
        }
    }
}

impl Extractor for ScopeExtractor {
    type State = ();
    type Record = String;

    fn min_len(&self) -> usize {
        self.min_len
    }

    fn step(&self, state: (), line: &str) -> ((), ParseOutcome<String>) {
        if is_header_row(line, "ScopeId") {
            return (state, ParseOutcome::Skip);
        }
        let scope = line.trim();
        if scope.is_empty() {
            return (state, ParseOutcome::Skip);
        }
        (state, ParseOutcome::Record(scope.to_string()))
    }
}

/// `Get-DhcpServerV4Lease -ScopeId .. | Select ClientId,IPAddress`.
#[derive(Debug, Clone)]
pub struct LeaseExtractor {
    min_len: usize,
}

impl LeaseExtractor {
    #[must_use]
    pub fn new(limits: &ParserLimits) -> Self {
        Self {
            min_len: limits.leases,
        }
    }
}

impl Extractor for LeaseExtractor {
    type State = ();
    type Record = DhcpLease;

    fn min_len(&self) -> usize {
        self.min_len
    }

    fn step(&self, state: (), line: &str) -> ((), ParseOutcome<DhcpLease>) {
        if is_header_row(line, "ClientId") {
            return (state, ParseOutcome::Skip);
        }
        let fields = fields(line, Separator::Space);
        if fields.len() < 2 || !is_hardware_address(fields[0]) {
            return (state, ParseOutcome::Skip);
        }
        let lease = DhcpLease {
            ip_v4: fields[1].to_string(),
            address: fields[0].to_ascii_uppercase(),
            comment: String::new(),
        };
        (state, ParseOutcome::Record(lease))
    }
}
