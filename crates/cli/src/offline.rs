//! `winops parse`: run an extractor over output captured earlier, e.g. with
//! `netsh dhcp server V4 show filter > filters.txt` on the server.

use anyhow::{anyhow, Context as AnyhowContext, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use winops_admin::{AdminConfig, CapturedDirectory, DirectoryService};
use winops_tabular::extract::{
    DnsRecordExtractor, FilterExtractor, FolderExtractor, LeaseExtractor, PermissionExtractor,
    RepositoryExtractor, ScopeExtractor, UserPermissionExtractor, ROOT_PATH,
};
use winops_tabular::{parse_listing, Extractor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Listing {
    DhcpFilters,
    DhcpScopes,
    DhcpLeases,
    DnsRecords,
    SvnRepos,
    SvnFolders,
    SvnPermissions,
    SvnUserPermissions,
    /// JSON array of `{account, displayName, objectSid}` with a base64 SID
    DirectoryUsers,
}

#[derive(Args)]
pub(crate) struct ParseArgs {
    #[arg(value_enum)]
    listing: Listing,

    /// Captured output; `-` reads stdin
    #[arg(long)]
    input: PathBuf,

    /// Queried path (svn-permissions; svn-folders defaults to `/`)
    #[arg(long)]
    path: Option<String>,

    /// Queried repository (svn-folders)
    #[arg(long)]
    repo: Option<String>,

    /// Encoding of the captured bytes; defaults to `shell.encoding`
    #[arg(long)]
    encoding: Option<String>,
}

pub(crate) async fn run_parse(args: &ParseArgs, config: &AdminConfig) -> Result<Value> {
    let bytes = read_input(&args.input)?;

    if args.listing == Listing::DirectoryUsers {
        let text = std::str::from_utf8(&bytes).context("Directory export is not UTF-8")?;
        let directory = DirectoryService::new(Arc::new(CapturedDirectory::from_json(text)?));
        return Ok(serde_json::to_value(directory.users().await?)?);
    }

    let label = args.encoding.as_deref().unwrap_or(&config.shell.encoding);
    let encoding = winops_shell::encoding_for_label(label)?;
    let text = winops_shell::decode(&bytes, encoding);
    let limits = &config.parser;

    match args.listing {
        Listing::DhcpFilters => extract(&text, &FilterExtractor::new(limits)),
        Listing::DhcpScopes => extract(&text, &ScopeExtractor::new(limits)),
        Listing::DhcpLeases => extract(&text, &LeaseExtractor::new(limits)),
        Listing::DnsRecords => extract(&text, &DnsRecordExtractor::new(limits)),
        Listing::SvnRepos => extract(&text, &RepositoryExtractor::new(limits)),
        Listing::SvnFolders => {
            let repo = required(args.repo.as_deref(), "--repo")?;
            let parent = args.path.as_deref().unwrap_or(ROOT_PATH);
            extract(&text, &FolderExtractor::new(limits, repo).under(parent))
        }
        Listing::SvnPermissions => {
            let path = required(args.path.as_deref(), "--path")?;
            extract(&text, &PermissionExtractor::new(limits, path))
        }
        Listing::SvnUserPermissions => extract(&text, &UserPermissionExtractor::new(limits)),
        Listing::DirectoryUsers => Err(anyhow!("directory users are parsed from JSON")),
    }
}

fn extract<E>(text: &str, extractor: &E) -> Result<Value>
where
    E: Extractor,
    E::Record: Serialize,
{
    let records = parse_listing(text, extractor)?;
    log::debug!("parsed {} records", records.len());
    Ok(serde_json::to_value(records)?)
}

fn required<'a>(value: Option<&'a str>, flag: &str) -> Result<&'a str> {
    value.ok_or_else(|| anyhow!("{flag} is required for this listing"))
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        return Ok(bytes);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
