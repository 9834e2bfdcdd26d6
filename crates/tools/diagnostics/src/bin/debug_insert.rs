//! Insert one phone-number row and print what the store returned.

use std::process::ExitCode;

use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use tracing::info;

use datastore::{to_record, DataStore};
use diagnostics_lib::{print_rows, ConnectionArgs, Outcome};
use domain::{PhoneNumberRecord, DEFAULT_PHONE_NUMBERS_TABLE};

#[derive(Parser)]
#[command(name = "debug-insert")]
#[command(about = "Insert a sample phone-number row to verify write access")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Target table
    #[arg(long, env = "PHONE_NUMBERS_TABLE", default_value = DEFAULT_PHONE_NUMBERS_TABLE)]
    table: String,

    #[arg(long, default_value = "+4915112345678")]
    phone_number: String,

    #[arg(long, default_value = "debug-rent-1")]
    rent_id: String,

    #[arg(long, default_value = "whatsapp")]
    service: String,

    #[arg(long, default_value = "DE")]
    country: String,

    /// RFC 3339 timestamp (default: 24 hours from now)
    #[arg(long)]
    end_date: Option<DateTime<Utc>>,

    #[arg(long, default_value = "active")]
    status: String,
}

impl Cli {
    fn record(&self) -> PhoneNumberRecord {
        PhoneNumberRecord {
            phone_number: self.phone_number.clone(),
            rent_id: self.rent_id.clone(),
            service: self.service.clone(),
            country: self.country.clone(),
            end_date: self
                .end_date
                .unwrap_or_else(|| Utc::now() + Duration::hours(24)),
            status: self.status.clone(),
        }
    }
}

async fn run(cli: &Cli) -> Outcome {
    let client = match cli.connection.connect() {
        Ok(client) => client,
        Err(e) => return Outcome::from_error(&e),
    };

    let record = cli.record();
    info!(table = %cli.table, phone_number = %record.phone_number, "Inserting row");

    let result = match to_record(&record) {
        Ok(row) => client.insert(&cli.table, row).await,
        Err(e) => Err(e),
    };

    match result.and_then(|stored| print_rows(&[stored])) {
        Ok(()) => {
            info!("Insert succeeded");
            Outcome::Completed
        }
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
