use crate::error::{ParseError, Result};
use crate::lines::{lines, Lines};

/// Result of feeding one line to an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    Record(T),
    /// Banner, header, separator, blank or malformed line. Not an error.
    Skip,
    /// The listing as a whole is unusable.
    Error(ParseError),
}

impl<T> ParseOutcome<T> {
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skip)
    }
}

/// Interprets the lines of one tool listing.
///
/// Anything carried from line to line (current mode, current owner name,
/// whether the table has started) lives in `State`, which is moved into
/// every step and handed back with the outcome.
pub trait Extractor {
    type State: Default;
    type Record;

    /// Lines shorter than this (in bytes, terminator excluded) are skipped unseen.
    fn min_len(&self) -> usize;

    fn step(&self, state: Self::State, line: &str) -> (Self::State, ParseOutcome<Self::Record>);

    /// Classifies one line from a fresh state, including the length guard.
    fn parse_line(&self, line: &str) -> ParseOutcome<Self::Record> {
        if line.len() < self.min_len() {
            return ParseOutcome::Skip;
        }
        self.step(Self::State::default(), line).1
    }
}

/// Lazy outcome stream over a listing; consumed once.
pub struct Outcomes<'t, 'e, E: Extractor> {
    lines: Lines<'t>,
    extractor: &'e E,
    state: Option<E::State>,
}

impl<'t, 'e, E: Extractor> Outcomes<'t, 'e, E> {
    pub fn new(text: &'t str, extractor: &'e E) -> Self {
        Self {
            lines: lines(text),
            extractor,
            state: Some(E::State::default()),
        }
    }
}

impl<E: Extractor> Iterator for Outcomes<'_, '_, E> {
    type Item = ParseOutcome<E::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        if line.len() < self.extractor.min_len() {
            return Some(ParseOutcome::Skip);
        }
        let state = self.state.take().unwrap_or_default();
        let (state, outcome) = self.extractor.step(state, line);
        self.state = Some(state);
        Some(outcome)
    }
}

/// Collects every record of `text`, stopping at the first fatal line.
pub fn parse_listing<E: Extractor>(text: &str, extractor: &E) -> Result<Vec<E::Record>> {
    let mut records = Vec::new();
    for outcome in Outcomes::new(text, extractor) {
        match outcome {
            ParseOutcome::Record(record) => records.push(record),
            ParseOutcome::Skip => {}
            ParseOutcome::Error(err) => return Err(err),
        }
    }
    Ok(records)
}

/// "Table has started" flag for listings printed as `Header` / `------` / rows.
///
/// Closed until a line beginning with `-` is seen; that line is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableGate {
    open: bool,
}

impl TableGate {
    /// Returns the next gate and whether `line` is a data row.
    #[must_use]
    pub fn admit(self, line: &str) -> (Self, bool) {
        if line.starts_with('-') {
            return (Self { open: true }, false);
        }
        (self, self.open)
    }
}

/// True for header or underline rows of a listing whose header begins with `header`.
#[must_use]
pub fn is_header_row(line: &str, header: &str) -> bool {
    line.starts_with(header) || line.starts_with("---")
}
