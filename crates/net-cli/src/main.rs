//! ifcfg network CLI (ifcfgctl)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ifcfgctl::commands::{
    ApplyCommand, InterfaceChange, OutputFormat, ShowCommand, StaticAddressing,
};
use ifcfgctl::Settings;

#[derive(Parser)]
#[command(name = "ifcfgctl")]
#[command(about = "Manage per-interface ifcfg network configuration")]
#[command(version)]
#[command(long_about = "
Manage per-interface ifcfg network configuration

Every change rewrites the interface's ifcfg file and restarts the interface.
If the interface does not come back up, the previous file is restored.

Examples:
  ifcfgctl -i eth0 show                                  # Show current settings
  ifcfgctl -i eth0 show --format json                    # Show as JSON
  ifcfgctl -i eth0 address 192.168.1.10                  # Change the address
  ifcfgctl -i eth0 dns 8.8.8.8 8.8.4.4                   # Set name servers
  ifcfgctl -i eth0 search example.com corp.local         # Set search domains
  ifcfgctl -i eth0 dhcp                                  # Switch to DHCP
  ifcfgctl -i eth0 static --address 10.0.0.5 --netmask 255.255.255.0 \\
      --gateway 10.0.0.1 --dns 8.8.8.8                   # Full static setup
")]
struct Cli {
    /// Interface to operate on
    #[arg(short, long, global = true)]
    interface: Option<String>,

    /// Settings file (defaults to /etc/ifcfg/ifcfgctl.*)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show interface configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Set a static address
    Address { ip: String },

    /// Set the default gateway
    Gateway { ip: String },

    /// Set the netmask
    Netmask { mask: String },

    /// Set up to two name servers
    Dns {
        #[arg(required = true, num_args = 1..=2)]
        servers: Vec<String>,
    },

    /// Set the DNS search domains
    Search {
        #[arg(required = true)]
        domains: Vec<String>,
    },

    /// Switch the interface to DHCP
    Dhcp,

    /// Configure static addressing in one transaction
    Static {
        #[arg(long)]
        address: String,

        #[arg(long)]
        netmask: String,

        #[arg(long)]
        gateway: String,

        /// Name server (repeat for a second one)
        #[arg(long, num_args = 1)]
        dns: Vec<String>,

        /// Search domain (repeatable)
        #[arg(long, num_args = 1)]
        search: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = run(&cli).await;

    // Handle errors with appropriate exit codes
    match result {
        Ok(()) => {
            log::info!("Command completed successfully");
            std::process::exit(0);
        }
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);

                // Print error chain if in verbose mode
                if cli.verbose || cli.debug {
                    for cause in e.chain().skip(1) {
                        eprintln!("  Caused by: {}", cause);
                    }
                }
            }
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let settings = Arc::new(Settings::load(cli.settings.as_deref())?);
    let interface = cli
        .interface
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("No interface given, use --interface <name>"))?;

    let apply = ApplyCommand::new(settings.clone());

    match &cli.command {
        Commands::Show { format } => ShowCommand::new(settings).execute(interface, *format).await,
        Commands::Address { ip } => {
            apply
                .execute(interface, InterfaceChange::Address(ip.clone()))
                .await
        }
        Commands::Gateway { ip } => {
            apply
                .execute(interface, InterfaceChange::Gateway(ip.clone()))
                .await
        }
        Commands::Netmask { mask } => {
            apply
                .execute(interface, InterfaceChange::Netmask(mask.clone()))
                .await
        }
        Commands::Dns { servers } => {
            apply
                .execute(interface, InterfaceChange::Dns(servers.clone()))
                .await
        }
        Commands::Search { domains } => {
            apply
                .execute(interface, InterfaceChange::Search(domains.clone()))
                .await
        }
        Commands::Dhcp => apply.execute(interface, InterfaceChange::Dhcp).await,
        Commands::Static {
            address,
            netmask,
            gateway,
            dns,
            search,
        } => {
            let addressing = StaticAddressing {
                address: address.clone(),
                netmask: netmask.clone(),
                gateway: gateway.clone(),
                dns: dns.clone(),
                search: if search.is_empty() {
                    None
                } else {
                    Some(search.clone())
                },
            };
            apply.execute_static(interface, addressing).await
        }
    }
}
