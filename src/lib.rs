pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::{report, ui};
use crate::core::config::AppConfig;
use crate::core::journal::RunJournal;
use crate::core::source::BankSource;
use crate::core::{ExchangeRates, convert};
use crate::providers::WikiTableProvider;
use crate::store::{BankStore, csv_file};
use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

pub enum AppCommand {
    Run,
    Report,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Run => run_pipeline(&config).await,
        AppCommand::Report => run_report(&config),
    }
}

/// The four-stage pipeline: extract, transform, load, query. A journal
/// checkpoint is written at every stage transition.
pub async fn run_pipeline(config: &AppConfig) -> Result<()> {
    info!("Largest banks ETL starting...");

    let journal = RunJournal::new(&config.journal_path);
    journal.checkpoint("Preliminaries complete. Initiating ETL process")?;

    let source = WikiTableProvider::new(&config.source.page_url);
    let spinner = ui::new_spinner("Fetching source page...");
    let fetched = source.fetch_banks().await;
    spinner.finish_and_clear();
    let banks = fetched?;
    journal.checkpoint("Data extraction complete. Initiating Transformation process")?;

    let rates = ExchangeRates::from_csv_path(&config.rates_csv)?;
    let records = convert(&banks, &rates)?;
    journal.checkpoint("Data transformation complete. Initiating loading process")?;

    csv_file::write_records(&records, &config.output.csv_path)?;
    journal.checkpoint("Data saved to CSV file")?;

    let mut store = BankStore::open(&config.output.db_path)?;
    journal.checkpoint("SQL Connection initiated.")?;

    store.replace_all(&config.output.table_name, &records)?;
    journal.checkpoint("Data loaded to Database as table. Executing queries")?;

    report::run_canonical_queries(&store, &config.output.table_name)?;
    journal.checkpoint("Process Complete.")?;

    store.close()?;
    journal.checkpoint("Database Connection closed")?;

    Ok(())
}

/// Re-runs the canonical queries against a database produced by an
/// earlier pipeline run.
fn run_report(config: &AppConfig) -> Result<()> {
    if !Path::new(&config.output.db_path).exists() {
        anyhow::bail!(
            "Database not found at {}. Run the pipeline first.",
            config.output.db_path
        );
    }

    let store = BankStore::open(&config.output.db_path)?;
    report::run_canonical_queries(&store, &config.output.table_name)?;
    store.close()
}
