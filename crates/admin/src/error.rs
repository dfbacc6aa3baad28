use thiserror::Error;
use winops_shell::ShellError;
use winops_tabular::ParseError;

pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} is disabled in the configuration")]
    Disabled(&'static str),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdminError {
    pub(crate) fn empty(what: &str) -> Self {
        Self::InvalidArgument(format!("{what} is empty"))
    }
}

/// Rejects an empty (or whitespace-only) required argument.
pub(crate) fn require(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdminError::empty(what));
    }
    Ok(())
}
