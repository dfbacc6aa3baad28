//! # Winops Admin
//!
//! Services for the Windows server roles managed through their consoles:
//!
//! - [`DhcpService`]: MAC filters (`netsh`), scopes and leases (PowerShell)
//! - [`DnsService`]: A records (`dnscmd`)
//! - [`SvnService`]: VisualSVN repositories, folder trees and access rules
//! - [`DirectoryService`]: directory users behind SVN account ids
//!
//! Every service talks to its console through an `Arc<dyn Invoke>` and
//! parses the captured listings with the extractors of `winops-tabular`.
//!
//! ```no_run
//! use winops_admin::{AdminConfig, DhcpService};
//!
//! # async fn demo() -> winops_admin::Result<()> {
//! let dhcp = DhcpService::from_config(&AdminConfig::default())?;
//! for lease in dhcp.leases().await? {
//!     println!("{} {} {}", lease.ip_v4, lease.address, lease.comment);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod dhcp;
mod directory;
mod dns;
mod error;
#[cfg(test)]
mod scripted;
mod svn;

pub use config::{AdminConfig, DnsConfig, ShellConfig, ToolConfig};
pub use dhcp::DhcpService;
pub use directory::{CapturedDirectory, DirectorySearch, DirectoryService, ExportedEntry};
pub use dns::DnsService;
pub use error::{AdminError, Result};
pub use svn::{SvnService, STANDARD_LAYOUT};
