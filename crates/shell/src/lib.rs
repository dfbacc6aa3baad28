//! # Winops Shell
//!
//! Runs the Windows administration consoles (`netsh`, `dnscmd`,
//! `powershell`) and turns their legacy-encoded output into UTF-8 text.
//!
//! ```text
//! args ──> CommandRunner ──> raw bytes (stdout + stderr)
//!                               │
//!                               ├─ exit 0  ──> decode ──> Ok(text)
//!                               └─ exit ≠0 ──> decode ──> Err(Exit { message })
//! ```

mod decode;
mod error;
mod runner;

pub use decode::{decode, encoding_for_label, DEFAULT_ENCODING_LABEL};
pub use error::{Result, ShellError};
pub use runner::{CommandRunner, Invoke};

pub use encoding_rs::Encoding;
