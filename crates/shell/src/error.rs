use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Error, Debug)]
pub enum ShellError {
    /// The process could not be started at all (missing binary, permissions).
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and rejected the operation; `message` is its own trimmed diagnostic.
    #[error("{message}")]
    Exit {
        program: String,
        code: Option<i32>,
        message: String,
    },

    #[error("Unknown output encoding: {0}")]
    UnknownEncoding(String),
}

impl ShellError {
    /// Exit error carrying the tool output, or a generic status line when the tool printed nothing.
    pub fn exit(program: impl Into<String>, code: Option<i32>, output: &str) -> Self {
        let program = program.into();
        let trimmed = output.trim();
        let message = if trimmed.is_empty() {
            match code {
                Some(code) => format!("{program} exited with status {code}"),
                None => format!("{program} was terminated by a signal"),
            }
        } else {
            trimmed.to_string()
        };
        Self::Exit {
            program,
            code,
            message,
        }
    }
}
