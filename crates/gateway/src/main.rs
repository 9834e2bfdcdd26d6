//! API Gateway - HTTP REST API for the registration wizard.

use clap::{Parser, Subcommand};

use gateway_lib::config::GatewayConfig;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "HTTP API for the multi-step registration wizard")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "GATEWAY_HOST")]
        host: Option<String>,
        #[arg(long, env = "GATEWAY_PORT")]
        port: Option<u16>,
        /// Start new sessions without the contract step
        #[arg(long)]
        no_contract_step: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = GatewayConfig::from_env();

    // Initialize tracing
    common::init_tracing(cli.verbose, &config.service.log_level);

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_contract_step,
        } => {
            if let Some(host) = host {
                config.service.host = host;
            }
            if let Some(port) = port {
                config.service.port = port;
            }
            if no_contract_step {
                config.registration.show_contract_step = false;
            }

            if let Err(e) = gateway_lib::run(config).await {
                tracing::error!(error = %e, "Gateway stopped");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
