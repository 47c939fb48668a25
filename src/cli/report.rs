use super::ui;
use crate::store::{BankStore, QueryOutput};
use anyhow::Result;
use comfy_table::Cell;

/// The three reporting queries run at the end of every pipeline run.
pub fn canonical_queries(table: &str) -> [String; 3] {
    [
        format!("SELECT * FROM {table} LIMIT 5"),
        format!("SELECT AVG(MC_GBP_Billion) FROM {table}"),
        format!("SELECT Name FROM {table} LIMIT 5"),
    ]
}

/// Executes one query and prints the query text followed by its result.
pub fn run_query(store: &BankStore, query: &str) -> Result<()> {
    let output = store.query(query)?;
    println!("\n{}", ui::style_text(query, ui::StyleType::Query));
    println!("{}", display_as_table(&output));
    Ok(())
}

pub fn run_canonical_queries(store: &BankStore, table: &str) -> Result<()> {
    for query in canonical_queries(table) {
        run_query(store, &query)?;
    }
    Ok(())
}

fn display_as_table(output: &QueryOutput) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(
        output
            .columns
            .iter()
            .map(|column| ui::header_cell(column))
            .collect::<Vec<_>>(),
    );

    for row in &output.rows {
        table.add_row(
            row.iter()
                .map(|cell| ui::format_optional_cell(cell.as_deref()))
                .collect::<Vec<Cell>>(),
        );
    }

    table.to_string()
}
