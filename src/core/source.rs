//! Bank data source abstractions

use crate::core::bank::ExtractedBank;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BankSource: Send + Sync {
    /// Fetches the source page and returns one record per data row, in
    /// page order.
    async fn fetch_banks(&self) -> Result<Vec<ExtractedBank>>;
}
