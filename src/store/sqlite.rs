use crate::core::bank::BankRecord;
use anyhow::{Context, Result};
use rusqlite::{Connection, params, types::ValueRef};
use std::path::Path;
use tracing::debug;

/// Materialized result of a reporting query. Cells are `None` for SQL
/// NULL, otherwise the value rendered as text.
#[derive(Debug)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// SQLite store for bank records. Owns the single connection used by
/// both the load stage and the reporter; `close` releases it explicitly
/// at the end of a run.
pub struct BankStore {
    conn: Connection,
}

impl BankStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        Ok(BankStore { conn })
    }

    /// In-memory database, used in tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Ok(BankStore { conn })
    }

    /// Replaces `table` wholesale: drop if present, recreate, insert all
    /// records in input order. One transaction, so a failed load leaves
    /// the previous table intact.
    pub fn replace_all(&mut self, table: &str, records: &[BankRecord]) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to start load transaction")?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 Name TEXT,
                 MC_USD_Billion REAL,
                 MC_GBP_Billion REAL,
                 MC_EUR_Billion REAL,
                 MC_INR_Billion REAL
             );"
        ))
        .with_context(|| format!("Failed to recreate table: {table}"))?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table} (Name, MC_USD_Billion, MC_GBP_Billion, MC_EUR_Billion, MC_INR_Billion)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ))?;
            for record in records {
                stmt.execute(params![
                    record.name,
                    record.mc_usd_billion,
                    record.mc_gbp_billion,
                    record.mc_eur_billion,
                    record.mc_inr_billion,
                ])
                .with_context(|| format!("Failed to insert record for '{}'", record.name))?;
            }
        }

        tx.commit().context("Failed to commit load transaction")?;
        debug!("Loaded {} records into table {table}", records.len());
        Ok(())
    }

    /// Executes a read-only query and materializes every row.
    pub fn query(&self, sql: &str) -> Result<QueryOutput> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .with_context(|| format!("Failed to prepare query: {sql}"))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = columns.len();

        let mut rows = stmt.query([]).with_context(|| format!("Query failed: {sql}"))?;
        let mut output_rows = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for index in 0..column_count {
                cells.push(render_value(row.get_ref(index)?));
            }
            output_rows.push(cells);
        }

        Ok(QueryOutput {
            columns,
            rows: output_rows,
        })
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_conn, err)| err)
            .context("Failed to close database connection")
    }
}

fn render_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Some(format!("<{} byte blob>", b.len())),
    }
}
