use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// A listing that cannot be trusted as a whole.
///
/// Ordinary malformed lines are not errors; they are skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A child row names a different scope than the one that was queried.
    #[error("Scope mismatch: expected {expected}, found {found}")]
    ScopeMismatch { expected: String, found: String },
}
