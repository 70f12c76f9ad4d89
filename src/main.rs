//! Spindrift CLI: moves report files from the incoming share into cloud
//! storage and loads them into the warehouse.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use spindrift::{
    CliArgs, Ingestor, LedgerClient, LoadStage, PostgresWarehouse, StorageProvider, TransferStage,
    init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = CliArgs::parse();
    let end = args.end_date();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Error: DATABASE_URL must be set");
            return ExitCode::FAILURE;
        }
    };

    let staging = match StorageProvider::for_url(&args.source).await {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            eprintln!("Failed to open staging storage: {e}");
            return ExitCode::FAILURE;
        }
    };

    let archive = match StorageProvider::for_url(&args.destination).await {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            eprintln!("Failed to open archive storage: {e}");
            return ExitCode::FAILURE;
        }
    };

    let warehouse = match PostgresWarehouse::connect(&database_url).await {
        Ok(warehouse) => Arc::new(warehouse),
        Err(e) => {
            eprintln!("Failed to connect to warehouse: {e}");
            return ExitCode::FAILURE;
        }
    };

    let ledger = LedgerClient::new(warehouse.clone(), args.ledger_table.as_str());
    let transfer = TransferStage::new(staging.clone(), ledger.clone());
    let load = LoadStage::new(staging, archive, warehouse, ledger);
    let ingestor = Ingestor::new(transfer, load, args.incoming_root.clone());

    info!(
        run_date = %end,
        days_ago = args.days_ago,
        source = %args.source,
        destination = %args.destination,
        "Starting report file ingestion"
    );

    match ingestor.run(end, args.days_ago).await {
        Ok(summary) => {
            info!(
                days = summary.days,
                uploaded = summary.transfer.uploaded,
                already_registered = summary.transfer.already_registered,
                invalid = summary.transfer.invalid + summary.load.invalid,
                loaded = summary.load.loaded,
                already_loaded = summary.load.already_loaded,
                failed = summary.load.failed,
                "Ingestion run complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Ingestion failed: {e}");
            ExitCode::FAILURE
        }
    }
}
