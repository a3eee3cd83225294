use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::application::LeadImportUseCase;
use crate::domain::error::{AppError, Result};
use crate::domain::import::{ImportFailureResponse, ImportRun};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::import_runs::{ImportRunRecord, ImportRunRepository};
use crate::infrastructure::lead_store::SqliteLeadStore;

#[derive(Debug, Parser)]
#[command(name = "leadimport")]
#[command(about = "Import CRM leads from CSV or XLSX files, skipping duplicates")]
#[command(version)]
pub struct Cli {
    /// Config file. Defaults to ./leadimport.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import one .csv or .xlsx file and print the JSON result
    Import {
        file: PathBuf,
    },
    /// List earlier runs of a file with the same content
    History {
        file: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
    /// Show one recorded import run
    Show {
        run_id: String,
    },
}

/// Everything a command needs, built once per process.
pub struct CliContext {
    pub use_case: LeadImportUseCase,
    pub runs: ImportRunRepository,
}

impl CliContext {
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let store = SqliteLeadStore::connect(&config.database).await?;
        let runs = ImportRunRepository::new(store.pool().clone());
        let use_case = LeadImportUseCase::new(Arc::new(store), &config.import);
        Ok(Self { use_case, runs })
    }
}

pub async fn execute(command: Command, config: &AppConfig) -> ExitCode {
    let ctx = match CliContext::connect(config).await {
        Ok(ctx) => ctx,
        Err(err) => {
            error!(error = %err, "Failed to open lead store");
            print_json(&ImportFailureResponse::new(&err));
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Import { file } => {
            let run = match import_file(&ctx, &file).await {
                Ok(run) => run,
                Err(err) => {
                    error!(file = %file.display(), error = %err, "Failed to read upload");
                    print_json(&ImportFailureResponse::new(&err));
                    return ExitCode::FAILURE;
                }
            };
            print_json(&run.reply());
            if run.result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::History { file, limit } => match history(&ctx, &file, limit).await {
            Ok(records) => {
                print_json(&records);
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(error = %err, "Failed to list import runs");
                print_json(&ImportFailureResponse::new(&err));
                ExitCode::FAILURE
            }
        },
        Command::Show { run_id } => match ctx.runs.get(&run_id).await {
            Ok(record) => {
                print_json(&record);
                ExitCode::SUCCESS
            }
            Err(err) => {
                print_json(&ImportFailureResponse::new(&err));
                ExitCode::FAILURE
            }
        },
    }
}

/// Read the file, run the import and record the run. The audit write never
/// changes the import's own outcome.
pub async fn import_file(ctx: &CliContext, path: &Path) -> Result<ImportRun> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = upload_name(path)?;
    info!(file = %path.display(), "Importing leads");

    let run = ctx.use_case.execute(&file_name, &bytes).await;

    if let Err(err) = ctx.runs.record(&run).await {
        warn!(run_id = %run.run_id, error = %err, "Failed to record import run");
    }

    Ok(run)
}

async fn history(
    ctx: &CliContext,
    path: &Path,
    limit: i64,
) -> Result<Vec<ImportRunRecord>> {
    let bytes = tokio::fs::read(path).await?;
    let file_sha256 = hex::encode(Sha256::digest(&bytes));
    ctx.runs.list_by_sha256(&file_sha256, limit).await
}

fn upload_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::IoError(format!("Not a file path: {}", path.display())))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "Failed to serialize output"),
    }
}
