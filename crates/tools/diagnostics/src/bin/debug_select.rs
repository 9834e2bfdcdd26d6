//! Read rows back and print them as JSON.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use datastore::{Condition, DataStore, Filter};
use diagnostics_lib::{print_rows, ConnectionArgs, Outcome};
use domain::DEFAULT_PHONE_NUMBERS_TABLE;

#[derive(Parser)]
#[command(name = "debug-select")]
#[command(about = "Select rows to verify read access")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Table to read
    #[arg(long, env = "PHONE_NUMBERS_TABLE", default_value = DEFAULT_PHONE_NUMBERS_TABLE)]
    table: String,

    /// Filter as COLUMN=VALUE (or COLUMN:OP=VALUE); repeatable
    #[arg(long = "eq", value_name = "COLUMN=VALUE")]
    filters: Vec<Condition>,

    /// Maximum rows to return
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

async fn run(cli: &Cli) -> Outcome {
    let client = match cli.connection.connect() {
        Ok(client) => client,
        Err(e) => return Outcome::from_error(&e),
    };

    let filter = cli
        .filters
        .iter()
        .cloned()
        .fold(Filter::new(), Filter::condition);
    info!(table = %cli.table, query = ?filter.to_query(), limit = cli.limit, "Selecting rows");

    let result = client.select(&cli.table, &filter, Some(cli.limit)).await;

    match result.and_then(|rows| {
        info!(count = rows.len(), "Select succeeded");
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
