use std::fs;
use std::path::Path;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const BANKS_PAGE: &str = r#"
        <html><body>
        <table>
          <tbody>
            <tr><th>Rank</th><th>Bank name</th><th>Market cap (US$ billion)</th></tr>
            <tr><td>1</td><td><a href="/wiki/JPM">JPMorgan Chase</a></td><td>432.92</td></tr>
            <tr><td>2</td><td>Bank of America</td><td>231.52</td></tr>
            <tr><td>3</td><td>ICBC</td><td>194.56</td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    pub async fn create_mock_server(page_body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/banks"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    /// Writes the exchange-rate CSV and a config file pointing every
    /// path into `dir`. Returns the config file path.
    pub fn write_run_files(dir: &std::path::Path, page_url: &str) -> std::path::PathBuf {
        let rates_path = dir.join("exchange_rate.csv");
        std::fs::write(&rates_path, "Currency,Rate\nGBP,0.8\nEUR,0.93\nINR,82.1\n")
            .expect("Failed to write rates file");

        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
source:
  page_url: "{page_url}"
rates_csv: "{}"
output:
  csv_path: "{}"
  db_path: "{}"
  table_name: "Largest_banks"
journal_path: "{}"
"#,
            rates_path.display(),
            dir.join("Largest_banks_data.csv").display(),
            dir.join("Banks.db").display(),
            dir.join("code_log.txt").display(),
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");

        config_path
    }
}

fn table_rows(db_path: &Path) -> Vec<(String, f64, f64, f64, f64)> {
    let conn = rusqlite::Connection::open(db_path).expect("Failed to open database");
    let mut stmt = conn
        .prepare("SELECT * FROM Largest_banks")
        .expect("Failed to prepare select");
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })
        .expect("Failed to query table")
        .collect::<Result<Vec<_>, _>>()
        .expect("Failed to read rows");
    rows
}

#[test_log::test(tokio::test)]
async fn test_full_pipeline_with_mock_page() {
    let mock_server = test_utils::create_mock_server(test_utils::BANKS_PAGE).await;
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path =
        test_utils::write_run_files(dir.path(), &format!("{}/banks", mock_server.uri()));

    let result = bankcap::run_command(
        bankcap::AppCommand::Run,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Pipeline failed with: {:?}", result.err());

    // CSV sink: header plus one row per bank, converted values rounded.
    let csv_content = fs::read_to_string(dir.path().join("Largest_banks_data.csv"))
        .expect("Output CSV missing");
    info!(%csv_content, "CSV sink output");
    let lines: Vec<&str> = csv_content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion"
    );
    assert_eq!(lines[1], "JPMorgan Chase,432.92,346.34,402.62,35542.73");

    // Relational sink: same rows, in page order.
    let rows = table_rows(&dir.path().join("Banks.db"));
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].0, "JPMorgan Chase");
    assert_eq!(rows[0].2, 346.34);
    assert_eq!(rows[2], ("ICBC".to_string(), 194.56, 155.65, 180.94, 15973.38));

    // Journal: all eight checkpoints, in order.
    let journal = fs::read_to_string(dir.path().join("code_log.txt")).expect("Journal missing");
    let messages: Vec<&str> = journal
        .lines()
        .map(|line| line.split_once(" : ").expect("Malformed journal line").1)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Preliminaries complete. Initiating ETL process",
            "Data extraction complete. Initiating Transformation process",
            "Data transformation complete. Initiating loading process",
            "Data saved to CSV file",
            "SQL Connection initiated.",
            "Data loaded to Database as table. Executing queries",
            "Process Complete.",
            "Database Connection closed",
        ]
    );
}

#[test_log::test(tokio::test)]
async fn test_second_run_replaces_the_table() {
    let mock_server = test_utils::create_mock_server(test_utils::BANKS_PAGE).await;
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path =
        test_utils::write_run_files(dir.path(), &format!("{}/banks", mock_server.uri()));

    bankcap::run_command(
        bankcap::AppCommand::Run,
        Some(config_path.to_str().unwrap()),
    )
    .await
    .expect("First run failed");

    // Second run against a page with a single, different bank.
    let single_bank_page = r#"
        <table><tbody>
        <tr><th>Rank</th><th>Bank name</th><th>Market cap</th></tr>
        <tr><td>1</td><td>Only Bank</td><td>100.0</td></tr>
        </tbody></table>
    "#;
    let second_server = test_utils::create_mock_server(single_bank_page).await;
    let config_path =
        test_utils::write_run_files(dir.path(), &format!("{}/banks", second_server.uri()));

    bankcap::run_command(
        bankcap::AppCommand::Run,
        Some(config_path.to_str().unwrap()),
    )
    .await
    .expect("Second run failed");

    let rows = table_rows(&dir.path().join("Banks.db"));
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0],
        ("Only Bank".to_string(), 100.0, 80.0, 93.0, 8210.0)
    );

    let csv_content = fs::read_to_string(dir.path().join("Largest_banks_data.csv")).unwrap();
    assert_eq!(csv_content.lines().count(), 2);
}

#[test_log::test(tokio::test)]
async fn test_page_without_table_aborts_before_writing_outputs() {
    let mock_server = test_utils::create_mock_server("<html><body>No table</body></html>").await;
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path =
        test_utils::write_run_files(dir.path(), &format!("{}/banks", mock_server.uri()));

    let result = bankcap::run_command(
        bankcap::AppCommand::Run,
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Pipeline should fail on a page without tables");
    assert_eq!(err.to_string(), "No tables found on the page");

    assert!(!dir.path().join("Largest_banks_data.csv").exists());
    assert!(!dir.path().join("Banks.db").exists());
}

#[test_log::test(tokio::test)]
async fn test_report_command_reads_the_existing_database() {
    let mock_server = test_utils::create_mock_server(test_utils::BANKS_PAGE).await;
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path =
        test_utils::write_run_files(dir.path(), &format!("{}/banks", mock_server.uri()));

    bankcap::run_command(
        bankcap::AppCommand::Run,
        Some(config_path.to_str().unwrap()),
    )
    .await
    .expect("Pipeline run failed");

    let result = bankcap::run_command(
        bankcap::AppCommand::Report,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Report failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_report_command_fails_without_a_database() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_run_files(dir.path(), "http://localhost:1/unused");

    let result = bankcap::run_command(
        bankcap::AppCommand::Report,
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Report should fail without a database");
    assert!(err.to_string().contains("Database not found"));
}
