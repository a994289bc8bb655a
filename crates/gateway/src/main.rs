//! Admin Gateway - HTTP API of the tenant console.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use account_service_lib::ConsoleConfig;
use domain::roles_by_hierarchy;
use gateway_lib::config::GatewayConfig;

/// Log filter used when RUST_LOG is unset.
const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Parser)]
#[command(name = "admin-gateway")]
#[command(about = "Admin console for tenant accounts and users")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind address (defaults to GATEWAY_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port (defaults to GATEWAY_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the role hierarchy
    Roles,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "debug" } else { DEFAULT_LOG_FILTER };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = GatewayConfig::from_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            gateway_lib::run_server(config, ConsoleConfig::from_env()).await?;
        }
        Commands::Roles => {
            for role in roles_by_hierarchy() {
                println!("{}. {} ({})", role.level, role.label, role.color);
                println!("   {}", role.description);
                for permission in role.permissions {
                    println!("   - {}", permission);
                }
            }
        }
    }

    Ok(())
}
