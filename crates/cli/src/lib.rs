use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use winops_admin::{AdminConfig, DhcpService, DnsService, SvnService};
use winops_protocol::{serialize_json, serialize_json_pretty, AccessLevel, DhcpFilter};

mod offline;
mod schema;

use offline::ParseArgs;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serialize_json_pretty(value)?
    } else {
        serialize_json(value)?
    };
    print_stdout(&text)
}

fn print_done(pretty: bool) -> Result<()> {
    print_json(&serde_json::json!({ "status": "ok" }), pretty)
}

#[derive(Parser)]
#[command(name = "winops")]
#[command(about = "DHCP, DNS and SVN administration through the Windows consoles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// DHCP filters, scopes and leases
    #[command(subcommand)]
    Dhcp(DhcpCommand),

    /// DNS A records
    #[command(subcommand)]
    Dns(DnsCommand),

    /// VisualSVN repositories, folders and access rules
    #[command(subcommand)]
    Svn(SvnCommand),

    /// Parse captured console output without running any tool
    Parse(ParseArgs),

    /// Print the effective configuration as TOML
    Config,

    /// Print JSON Schemas of the emitted records
    Schema,
}

#[derive(Subcommand)]
enum DhcpCommand {
    /// List allow/deny MAC filters
    Filters,

    /// List scope ids
    Scopes,

    /// List leases of every scope, annotated with filter comments
    Leases,

    /// Add a MAC filter
    #[command(name = "add-filter")]
    AddFilter(FilterArgs),

    /// Delete a MAC filter
    #[command(name = "delete-filter")]
    DeleteFilter {
        #[arg(long)]
        address: String,
    },

    /// Replace the filter of an address
    #[command(name = "modify-filter")]
    ModifyFilter {
        /// Address of the filter to replace
        #[arg(long)]
        address: String,

        #[command(flatten)]
        filter: NewFilterArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    address: String,

    /// Put the address on the deny list instead of the allow list
    #[arg(long)]
    deny: bool,

    #[arg(long, default_value = "")]
    comment: String,
}

#[derive(Args)]
struct NewFilterArgs {
    #[arg(long = "new-address")]
    address: String,

    #[arg(long)]
    deny: bool,

    #[arg(long, default_value = "")]
    comment: String,
}

#[derive(Subcommand)]
enum DnsCommand {
    /// Zones listed in the configuration
    Zones,

    /// List A records of a zone
    Records {
        #[arg(long)]
        zone: String,
    },

    /// Add an A record
    Add(RecordArgs),

    /// Delete an A record
    Delete(RecordArgs),
}

#[derive(Args)]
struct RecordArgs {
    #[arg(long)]
    zone: String,

    #[arg(long)]
    name: String,

    /// IPv4 address
    #[arg(long)]
    data: String,
}

#[derive(Subcommand)]
enum SvnCommand {
    /// List repositories
    Repos {
        /// Include every repository's folder tree
        #[arg(long)]
        folders: bool,
    },

    /// List folders under a path
    Folders {
        #[arg(long)]
        repo: String,

        #[arg(long, default_value = "/")]
        path: String,

        #[arg(long)]
        recursive: bool,
    },

    /// Create a repository with the branches/tags/trunk layout
    #[command(name = "new-repo")]
    NewRepo {
        #[arg(long)]
        name: String,
    },

    /// Access rules that apply to a path
    Permissions {
        #[arg(long)]
        repo: String,

        #[arg(long, default_value = "/")]
        path: String,
    },

    /// Access rules of one account across all repositories
    #[command(name = "user-permissions")]
    UserPermissions {
        /// Account security identifier
        #[arg(long)]
        account: String,
    },

    /// Add an access rule
    Grant(RuleArgs),

    /// Change an existing access rule
    Set(RuleArgs),

    /// Remove an access rule
    Revoke {
        #[arg(long)]
        repo: String,

        #[arg(long, default_value = "/")]
        path: String,

        #[arg(long)]
        account: String,
    },
}

#[derive(Args)]
struct RuleArgs {
    #[arg(long)]
    repo: String,

    #[arg(long, default_value = "/")]
    path: String,

    #[arg(long)]
    account: String,

    /// no-access, read-only or read-write
    #[arg(long)]
    access: AccessLevel,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(cli.config.as_ref())?;
    let pretty = cli.pretty;

    match cli.command {
        Commands::Dhcp(command) => run_dhcp(command, &config, pretty).await?,
        Commands::Dns(command) => run_dns(command, &config, pretty).await?,
        Commands::Svn(command) => run_svn(command, &config, pretty).await?,
        Commands::Parse(args) => {
            let value = offline::run_parse(&args, &config).await?;
            print_json(&value, pretty)?;
        }
        Commands::Config => print_stdout(config.to_toml_string()?.trim_end())?,
        Commands::Schema => print_json(&schema::record_schemas()?, pretty)?,
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<AdminConfig> {
    match path {
        Some(path) => {
            let config = AdminConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            log::debug!("config loaded from {}", path.display());
            Ok(config)
        }
        None => Ok(AdminConfig::default()),
    }
}

async fn run_dhcp(command: DhcpCommand, config: &AdminConfig, pretty: bool) -> Result<()> {
    let dhcp = DhcpService::from_config(config)?;
    match command {
        DhcpCommand::Filters => print_json(&dhcp.filters().await?, pretty),
        DhcpCommand::Scopes => print_json(&dhcp.scopes().await?, pretty),
        DhcpCommand::Leases => print_json(&dhcp.leases().await?, pretty),
        DhcpCommand::AddFilter(args) => {
            let filter = DhcpFilter {
                allow: !args.deny,
                address: args.address,
                comment: args.comment,
            };
            dhcp.add_filter(&filter).await?;
            print_done(pretty)
        }
        DhcpCommand::DeleteFilter { address } => {
            dhcp.delete_filter(&address).await?;
            print_done(pretty)
        }
        DhcpCommand::ModifyFilter { address, filter } => {
            let filter = DhcpFilter {
                allow: !filter.deny,
                address: filter.address,
                comment: filter.comment,
            };
            dhcp.modify_filter(&address, &filter).await?;
            print_done(pretty)
        }
    }
}

async fn run_dns(command: DnsCommand, config: &AdminConfig, pretty: bool) -> Result<()> {
    let dns = DnsService::from_config(config)?;
    match command {
        DnsCommand::Zones => print_json(&dns.zones(), pretty),
        DnsCommand::Records { zone } => print_json(&dns.records(&zone).await?, pretty),
        DnsCommand::Add(args) => {
            dns.add_record(&args.zone, &args.name, &args.data).await?;
            print_done(pretty)
        }
        DnsCommand::Delete(args) => {
            dns.delete_record(&args.zone, &args.name, &args.data)
                .await?;
            print_done(pretty)
        }
    }
}

async fn run_svn(command: SvnCommand, config: &AdminConfig, pretty: bool) -> Result<()> {
    let svn = SvnService::from_config(config)?;
    match command {
        SvnCommand::Repos { folders } => print_json(&svn.repositories(folders).await?, pretty),
        SvnCommand::Folders {
            repo,
            path,
            recursive,
        } => print_json(&svn.folders(&repo, &path, recursive).await?, pretty),
        SvnCommand::NewRepo { name } => {
            svn.new_repository(&name).await?;
            print_done(pretty)
        }
        SvnCommand::Permissions { repo, path } => {
            print_json(&svn.permissions(&repo, &path).await?, pretty)
        }
        SvnCommand::UserPermissions { account } => {
            print_json(&svn.user_permissions(&account).await?, pretty)
        }
        SvnCommand::Grant(rule) => {
            svn.add_permission(&rule.repo, &rule.path, &rule.account, rule.access)
                .await?;
            print_done(pretty)
        }
        SvnCommand::Set(rule) => {
            svn.set_permission(&rule.repo, &rule.path, &rule.account, rule.access)
                .await?;
            print_done(pretty)
        }
        SvnCommand::Revoke {
            repo,
            path,
            account,
        } => {
            svn.remove_permission(&repo, &path, &account).await?;
            print_done(pretty)
        }
    }
}
