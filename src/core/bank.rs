use serde::{Deserialize, Serialize};

/// A bank as read off the source page: name plus USD market cap only.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedBank {
    pub name: String,
    pub mc_usd_billion: f64,
}

/// A fully converted record. The serde renames produce the exact column
/// headers expected in the CSV file and the database table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MC_USD_Billion")]
    pub mc_usd_billion: f64,
    #[serde(rename = "MC_GBP_Billion")]
    pub mc_gbp_billion: f64,
    #[serde(rename = "MC_EUR_Billion")]
    pub mc_eur_billion: f64,
    #[serde(rename = "MC_INR_Billion")]
    pub mc_inr_billion: f64,
}

impl BankRecord {
    /// Column names shared by the CSV header and the database table.
    pub const COLUMNS: [&'static str; 5] = [
        "Name",
        "MC_USD_Billion",
        "MC_GBP_Billion",
        "MC_EUR_Billion",
        "MC_INR_Billion",
    ];
}
