//! List the newest registrations as the wizard stored them.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use diagnostics_lib::{print_rows, ConnectionArgs, Outcome};
use domain::DEFAULT_REGISTRATIONS_TABLE;
use registration_service_lib::repository::{RegistrationRepository, RegistrationStore};

#[derive(Parser)]
#[command(name = "debug-recent")]
#[command(about = "Show the most recent registrations")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Registrations table
    #[arg(long, env = "REGISTRATIONS_TABLE", default_value = DEFAULT_REGISTRATIONS_TABLE)]
    table: String,

    /// Maximum registrations to show
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

async fn run(cli: &Cli) -> Outcome {
    let client = match cli.connection.connect() {
        Ok(client) => client,
        Err(e) => return Outcome::from_error(&e),
    };

    let repo = RegistrationStore::new(Arc::new(client), cli.table.clone());
    info!(table = %repo.table(), limit = cli.limit, "Reading recent registrations");

    match repo.recent(cli.limit).await.and_then(|rows| {
        info!(count = rows.len(), "Read succeeded");
        print_rows(&rows)
    }) {
        Ok(()) => Outcome::Completed,
        Err(e) => Outcome::from_error(&e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    common::init_tracing(cli.connection.verbose, "info");

    run(&cli).await.exit_code()
}
