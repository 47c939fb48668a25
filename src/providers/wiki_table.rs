use crate::core::bank::ExtractedBank;
use crate::core::source::BankSource;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Reads the largest-banks table from an archived wiki page. The page
/// layout is the one the archive snapshot froze: the first `tbody` on
/// the page is the ranking table, cell 2 is the bank name and cell 3 is
/// the market cap in USD billions.
pub struct WikiTableProvider {
    page_url: String,
}

impl WikiTableProvider {
    pub fn new(page_url: &str) -> Self {
        WikiTableProvider {
            page_url: page_url.to_string(),
        }
    }
}

#[async_trait]
impl BankSource for WikiTableProvider {
    async fn fetch_banks(&self) -> Result<Vec<ExtractedBank>> {
        debug!("Requesting page from {}", self.page_url);

        let client = reqwest::Client::builder()
            .user_agent("bankcap/0.1")
            .build()?;
        let body = client
            .get(&self.page_url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch page: {}", self.page_url))?
            .error_for_status()
            .with_context(|| format!("Server rejected request for page: {}", self.page_url))?
            .text()
            .await
            .with_context(|| format!("Failed to read page body: {}", self.page_url))?;

        let banks = parse_first_table(&body)?;
        debug!("Extracted {} banks from {}", banks.len(), self.page_url);
        Ok(banks)
    }
}

/// Parses the first `tbody` of the document into one record per data
/// row. Rows with fewer than 2 cells (the header row, spacers) are
/// skipped; a row with a name but no market-cap cell is an error, as is
/// non-numeric market-cap text.
pub fn parse_first_table(html: &str) -> Result<Vec<ExtractedBank>> {
    let tbody_selector = Selector::parse("tbody").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let document = Html::parse_document(html);
    let table = document
        .select(&tbody_selector)
        .next()
        .ok_or_else(|| anyhow!("No tables found on the page"))?;

    let mut banks = Vec::new();
    for row in table.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < 2 {
            continue;
        }

        let name = cell_text(&cells[1]);
        let raw_mc = cells
            .get(2)
            .map(cell_text)
            .ok_or_else(|| anyhow!("Row for '{name}' has no market cap cell"))?;
        let mc_usd_billion: f64 = raw_mc
            .replace(',', "")
            .parse()
            .with_context(|| format!("Invalid market cap value '{raw_mc}' for '{name}'"))?;

        banks.push(ExtractedBank {
            name,
            mc_usd_billion,
        });
    }

    Ok(banks)
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
