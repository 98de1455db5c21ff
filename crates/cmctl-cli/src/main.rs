//! cmctl - CLI tool for handling CM clusters
//!
//! Usage:
//!   cmctl create --name vagrant --host c7401   # Register a server
//!   cmctl use vagrant                          # Select the active server
//!   cmctl hosts --services HDFS --roles DATANODE

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cmctl_core::commands::{
    CreateProfileOptions, CreateServerOptions, ProfileListing, RegistryCommand, ResolveCommand,
    ServerListing,
};
use cmctl_core::filter::Filter;
use cmctl_core::registry::Protocol;

#[derive(Parser)]
#[command(name = "cmctl", version)]
#[command(about = "CLI tool for handle CM clusters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize CM server registry
    Init,

    /// Register new CM server entry
    Create(CreateArgs),

    /// Print all registered CM servers
    #[command(alias = "ls")]
    List,

    /// De-register an existing CM server entry
    Delete {
        /// Name of the CM registry entry
        name: String,
    },

    /// Drop all CM server records
    Clear,

    /// Use selected CM server
    Use {
        /// Name of the CM registry entry
        name: String,
    },

    /// Show active CM server details
    Show,

    /// Connection profiles related commands
    Profiles(ProfilesArgs),

    /// Attach a profile to a CM server entry (the active one by default)
    Attach {
        /// Connection profile name
        profile: String,
        /// CM server entry name
        server: Option<String>,
    },

    /// Print the addresses of the hosts matching a filter
    Hosts(HostsArgs),

    /// Print the clusters of the active CM server
    Clusters {
        /// Topology snapshot directory (defaults to the server's directory)
        #[arg(long)]
        topology: Option<PathBuf>,
    },

    /// Print the services of a cluster
    Services {
        /// Cluster name
        cluster: String,
        /// Topology snapshot directory (defaults to the server's directory)
        #[arg(long)]
        topology: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Args)]
struct CreateArgs {
    /// Name of the CM server entry
    #[arg(long)]
    name: String,
    /// Hostname of the CM server
    #[arg(long)]
    host: String,
    /// Port for CM server
    #[arg(long, default_value_t = 7180)]
    port: u16,
    /// Protocol for CM REST API: http/https
    #[arg(long, default_value = "http")]
    protocol: String,
    /// User name for CM server
    #[arg(long, default_value = "admin")]
    username: String,
    /// Cluster name
    #[arg(long)]
    cluster: Option<String>,
}

#[derive(Args)]
struct ProfilesArgs {
    #[command(subcommand)]
    command: ProfilesSubcommand,
}

#[derive(Subcommand)]
enum ProfilesSubcommand {
    /// Create new connection profile
    #[command(alias = "c")]
    Create {
        /// Name of the connection profile
        #[arg(long)]
        name: String,
        /// SSH private key path
        #[arg(long = "key_path", alias = "key-path", default_value = "")]
        key_path: String,
        /// SSH port
        #[arg(long, default_value_t = 22)]
        port: u16,
        /// SSH user name
        #[arg(long, default_value = "cloudbreak")]
        username: String,
    },

    /// Print all connection profile entries
    #[command(alias = "ls")]
    List,

    /// Delete a connection profile entry by id
    #[command(alias = "d")]
    Delete {
        /// Connection profile name
        name: String,
    },

    /// Delete all connection profile entries
    #[command(alias = "cl")]
    Clear,
}

#[derive(Args)]
struct HostsArgs {
    /// Comma separated host names
    #[arg(long, default_value = "")]
    hosts: String,
    /// Comma separated cluster names
    #[arg(long, default_value = "")]
    clusters: String,
    /// Comma separated service types
    #[arg(long, default_value = "")]
    services: String,
    /// Comma separated role types (requires exactly one service)
    #[arg(long, default_value = "")]
    roles: String,
    /// Target the CM server itself
    #[arg(long)]
    server: bool,
    /// Topology snapshot directory (defaults to the server's directory)
    #[arg(long)]
    topology: Option<PathBuf>,
    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cmctl=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run_cli(cli.command)
}

fn run_cli(command: Commands) -> Result<()> {
    let cmd = RegistryCommand::with_defaults()?;

    match command {
        Commands::Init => {
            if cmd.init()? {
                println!("CM registry DB has been initialized.");
            } else {
                println!("CM registry DB already exists.");
            }
        }
        Commands::Create(args) => {
            let protocol: Protocol = args.protocol.parse()?;
            let mut options = CreateServerOptions::new(&args.name, &args.host)
                .with_port(args.port)
                .with_protocol(protocol)
                .with_username(args.username.to_lowercase());
            if let Some(cluster) = &args.cluster {
                options = options.with_cluster(cluster);
            }
            let report = cmd.create(&options)?;
            println!("New CM server entry has been created: {}", report.name);
        }
        Commands::List => {
            let entries = cmd.list()?;
            print_servers("CM SERVERS:", &entries);
        }
        Commands::Delete { name } => {
            let report = cmd.delete(&name)?;
            println!("CM registry de-registered with id: {}", report.name);
            print_warnings(&report.warnings);
        }
        Commands::Clear => {
            cmd.clear()?;
            println!("CM server entries dropped.");
        }
        Commands::Use { name } => {
            let report = cmd.use_server(&name)?;
            println!("CM server entry selected with id: {}", report.name);
        }
        Commands::Show => {
            let active: Vec<ServerListing> = cmd.active()?.into_iter().collect();
            print_servers("ACTIVE CM SERVER:", &active);
        }
        Commands::Profiles(args) => run_profiles(&cmd, args)?,
        Commands::Attach { profile, server } => {
            let report = cmd.attach(&profile, server.as_deref())?;
            println!("Attach profile '{}' to '{}'", profile, report.name);
        }
        Commands::Hosts(args) => run_hosts(&cmd, args)?,
        Commands::Clusters { topology } => {
            let resolve = ResolveCommand::for_active_server(cmd.store(), topology)?;
            let rows = resolve
                .clusters()?
                .into_iter()
                .map(|c| {
                    vec![
                        c.name,
                        c.display_name,
                        c.version.unwrap_or_default(),
                        c.full_version.unwrap_or_default(),
                    ]
                })
                .collect::<Vec<_>>();
            print_table(
                "CLUSTERS:",
                &["NAME", "DISPLAY NAME", "VERSION", "FULL VERSION"],
                &rows,
            );
        }
        Commands::Services { cluster, topology } => {
            let resolve = ResolveCommand::for_active_server(cmd.store(), topology)?;
            let rows = resolve
                .services(&cluster)?
                .into_iter()
                .map(|s| {
                    vec![
                        s.name,
                        s.service_type,
                        s.display_name,
                        s.state.unwrap_or_default(),
                        s.cluster_name,
                    ]
                })
                .collect::<Vec<_>>();
            print_table(
                "SERVICES:",
                &["NAME", "TYPE", "DISPLAY NAME", "STATE", "CLUSTER"],
                &rows,
            );
        }
    }

    Ok(())
}

fn run_profiles(cmd: &RegistryCommand, args: ProfilesArgs) -> Result<()> {
    match args.command {
        ProfilesSubcommand::Create {
            name,
            key_path,
            port,
            username,
        } => {
            let options = CreateProfileOptions::new(&name, &key_path)
                .with_port(port)
                .with_username(username);
            let report = cmd.create_profile(&options)?;
            println!("New connection profile entry has been created: {}", report.name);
        }
        ProfilesSubcommand::List => {
            let profiles = cmd.list_profiles()?;
            print_profiles(&profiles);
        }
        ProfilesSubcommand::Delete { name } => {
            let report = cmd.delete_profile(&name)?;
            println!(
                "Connection profile '{}' has been deleted successfully",
                report.name
            );
            print_warnings(&report.warnings);
        }
        ProfilesSubcommand::Clear => {
            cmd.clear_profiles()?;
            println!("All connection profile records has been dropped");
        }
    }

    Ok(())
}

fn run_hosts(cmd: &RegistryCommand, args: HostsArgs) -> Result<()> {
    let filter = Filter::from_selectors(
        &args.hosts,
        &args.clusters,
        &args.services,
        &args.roles,
        args.server,
    )?;

    let resolve = ResolveCommand::for_active_server(cmd.store(), args.topology)?;
    tracing::debug!(server = %resolve.server_name(), mode = ?filter.mode(), "resolving hosts");
    let addresses = resolve.resolve(&filter)?;
    tracing::debug!(count = addresses.len(), "hosts resolved");

    match args.format {
        OutputFormat::Table => print_addresses(resolve.server_name(), &addresses),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "server": resolve.server_name(),
                "filter": filter,
                "hosts": addresses,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_addresses(server: &str, addresses: &BTreeSet<String>) {
    let rows = addresses
        .iter()
        .map(|address| vec![address.clone()])
        .collect::<Vec<_>>();
    print_table(&format!("HOSTS ({}):", server), &["ADDRESS"], &rows);
}

fn print_servers(title: &str, entries: &[ServerListing]) {
    let rows = entries
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.entry.host.clone(),
                s.entry.port.to_string(),
                s.entry.protocol.to_string(),
                s.entry.username.clone(),
                s.entry.cluster.clone().unwrap_or_default(),
                s.entry.profile.clone().unwrap_or_default(),
                s.entry.active.to_string(),
                s.entry
                    .base_url()
                    .map(|url| url.to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    print_table(
        title,
        &[
            "NAME", "HOSTNAME", "PORT", "PROTOCOL", "USER", "CLUSTER", "PROFILE", "ACTIVE", "URL",
        ],
        &rows,
    );
}

fn print_profiles(profiles: &[ProfileListing]) {
    let rows = profiles
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.profile.key_path.display().to_string(),
                p.profile.port.to_string(),
                p.profile.username.clone(),
            ]
        })
        .collect::<Vec<_>>();
    print_table("CONNECTION PROFILES:", &["NAME", "KEY", "PORT", "USERNAME"], &rows);
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("  Warning: {}", warning);
    }
}

fn print_table(title: &str, headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", title);
    if rows.is_empty() {
        println!("{}", "-".repeat(title.len()));
        println!("NO ENTRIES FOUND!");
        return;
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{:<width$}", header, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line.trim_end());
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line.trim_end());
    }
}
