//! `dnscmd /EnumRecords <zone> . /Type A /Child`.

use crate::lines::{fields, Separator};
use crate::listing::{Extractor, ParseOutcome};
use crate::limits::ParserLimits;
use winops_protocol::DnsRecord;

pub const RECORD_TYPE_A: &str = "A";

/// Rows are `name ttl A data`, or `ttl A data` when the owner name is the
/// same as the row above.
#[derive(Debug, Clone)]
pub struct DnsRecordExtractor {
    min_len: usize,
}

impl DnsRecordExtractor {
    #[must_use]
    pub fn new(limits: &ParserLimits) -> Self {
        Self { min_len: limits.dns }
    }
}

impl Default for DnsRecordExtractor {
    fn default() -> Self {
        Self::new(&ParserLimits::default())
    }
}

/// Owner name of the last record emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerName(pub String);

impl Extractor for DnsRecordExtractor {
    type State = OwnerName;
    type Record = DnsRecord;

    fn min_len(&self) -> usize {
        self.min_len
    }

    fn step(&self, owner: OwnerName, line: &str) -> (OwnerName, ParseOutcome<DnsRecord>) {
        let fields = fields(line, Separator::Space);
        let (name, ttl, kind, data) = match fields.as_slice() {
            [name, ttl, kind, data] => (*name, *ttl, *kind, *data),
            [ttl, kind, data] => (owner.0.as_str(), *ttl, *kind, *data),
            _ => return (owner, ParseOutcome::Skip),
        };

        let valid_ttl = ttl.parse::<i64>().is_ok_and(|ttl| ttl >= 1);
        if !valid_ttl || kind != RECORD_TYPE_A || name.is_empty() {
            return (owner, ParseOutcome::Skip);
        }

        let record = DnsRecord {
            name: name.to_string(),
            data: data.to_string(),
        };
        (OwnerName(record.name.clone()), ParseOutcome::Record(record))
    }
}
