//! # Winops Tabular
//!
//! Turns the column-aligned text printed by `netsh`, `dnscmd` and the
//! VisualSVN PowerShell module into typed records.
//!
//! ## Pipeline
//!
//! ```text
//! decoded text
//!     │
//!     ├──> lines()            split on \n, tolerate a missing last terminator
//!     │
//!     ├──> min_len guard      too-short lines are skipped unseen
//!     │
//!     ├──> Extractor::step    state in, (state, outcome) out
//!     │      ├─> Record(T)
//!     │      ├─> Skip         banners, headers, malformed rows
//!     │      └─> Error        structural problems that void the listing
//!     │
//!     └──> parse_listing      Vec<T> or the first error
//! ```
//!
//! ## Example
//!
//! ```rust
//! use winops_tabular::{parse_listing, extract::DnsRecordExtractor};
//!
//! let text = "server-a 3600 A 192.168.1.11\n\t\t3600 A 172.16.1.2\n";
//! let records = parse_listing(text, &DnsRecordExtractor::default()).unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].name, "server-a");
//! ```

mod error;
pub mod extract;
mod limits;
mod lines;
mod listing;

pub use error::{ParseError, Result};
pub use limits::ParserLimits;
pub use lines::{fields, lines, Lines, Separator};
pub use listing::{is_header_row, parse_listing, Extractor, Outcomes, ParseOutcome, TableGate};
