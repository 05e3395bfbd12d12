use clap::Parser;
use miette::{IntoDiagnostic, Result};
use pointledger::application::service::PointService;
use pointledger::domain::history::TransactionType;
use pointledger::domain::ports::{BalanceStoreBox, HistoryStoreBox};
use pointledger::infrastructure::in_memory::{InMemoryBalanceStore, InMemoryHistoryStore};
use pointledger::interfaces::csv::op_reader::{Op, OpReader, OpType};
use pointledger::interfaces::csv::point_writer::PointWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file (columns: type, user, amount)
    input: PathBuf,
}

async fn apply(service: &PointService, op: Op) -> pointledger::error::Result<()> {
    match op.r#type {
        OpType::Charge => {
            let point = service.charge(op.user, op.amount.unwrap_or(0)).await?;
            println!("charge,{},{}", point.id, point.point);
        }
        OpType::Use => {
            let point = service.use_points(op.user, op.amount.unwrap_or(0)).await?;
            println!("use,{},{}", point.id, point.point);
        }
        OpType::Balance => {
            let point = service.balance(op.user).await?;
            println!("balance,{},{}", point.id, point.point);
        }
        OpType::History => {
            for record in service.history(op.user).await? {
                let kind = match record.r#type {
                    TransactionType::Charge => "charge",
                    TransactionType::Use => "use",
                };
                println!(
                    "history,{},{},{},{},{}",
                    record.user_id, record.seq, kind, record.amount, record.update_millis
                );
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let balances: BalanceStoreBox = Box::new(InMemoryBalanceStore::new());
    let histories: HistoryStoreBox = Box::new(InMemoryHistoryStore::new());
    let service = PointService::new(balances, histories);

    // Process operations in file order; a bad row does not abort the run.
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OpReader::new(file);
    for op_result in reader.ops() {
        match op_result {
            Ok(op) => {
                if let Err(e) = apply(&service, op).await {
                    eprintln!("Error applying operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output final state of every user seen.
    let points = service.into_results().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = PointWriter::new(stdout.lock());
    writer.write_points(points).into_diagnostic()?;

    Ok(())
}
