use crate::core::QuoteError;
use crate::core::config::AppConfig;
use crate::providers::QuoteFetcher;
use anyhow::{Context, Result};
use console::style;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::info;

/// Fetches from the quote service and returns the bid for `pair`.
pub async fn fetch_bid(
    fetcher: &QuoteFetcher,
    service_url: &str,
    pair: &str,
) -> Result<Decimal, QuoteError> {
    let quotes = fetcher.fetch(service_url).await?;
    Ok(quotes.get(pair)?.bid)
}

/// Overwrites `path` with the bid line.
pub fn write_report(path: &Path, bid: &Decimal) -> Result<()> {
    std::fs::write(path, format!("Dólar: {bid}"))
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

pub async fn report(config: &AppConfig) -> Result<()> {
    let fetcher = QuoteFetcher::new()?.with_timeout(config.fetch_timeout());
    let bid = fetch_bid(&fetcher, &config.service_url, &config.report_pair)
        .await
        .with_context(|| format!("Failed to fetch quote from {}", config.service_url))?;

    let path = Path::new(&config.report_path);
    write_report(path, &bid)?;
    info!(%bid, path = %path.display(), "Report written");

    println!("Cotação do dólar: {}", style(bid).green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service(body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cotacao"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_fetch_bid_for_pair() {
        let server = service(r#"{"USDBRL":{"bid":"5.25","ask":"5.27"}}"#).await;
        let fetcher = QuoteFetcher::new().unwrap();

        let bid = fetch_bid(&fetcher, &format!("{}/cotacao", server.uri()), "USDBRL")
            .await
            .unwrap();
        assert_eq!(bid, Decimal::new(525, 2));
    }

    #[tokio::test]
    async fn test_fetch_bid_missing_pair_is_not_found() {
        let server = service(r#"{"EURBRL":{"bid":"5.50","ask":"5.53"}}"#).await;
        let fetcher = QuoteFetcher::new().unwrap();

        let err = fetch_bid(&fetcher, &format!("{}/cotacao", server.uri()), "USDBRL")
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::NotFound(_)), "{err:?}");
    }

    #[test]
    fn test_write_report_overwrites_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let report_path = temp_dir.path().join("cotacao.txt");
        fs::write(&report_path, "stale content that is longer")?;

        write_report(&report_path, &Decimal::new(525, 2))?;

        assert_eq!(fs::read_to_string(&report_path)?, "Dólar: 5.25");
        Ok(())
    }

    #[tokio::test]
    async fn test_report_failure_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let report_path = temp_dir.path().join("cotacao.txt");
        let server = service("not json").await;

        let config = AppConfig {
            service_url: format!("{}/cotacao", server.uri()),
            report_path: report_path.to_string_lossy().into_owned(),
            ..AppConfig::default()
        };

        assert!(report(&config).await.is_err());
        assert!(!report_path.exists());
    }
}
