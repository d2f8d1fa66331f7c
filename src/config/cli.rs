use crate::config::toml_config::TomlConfig;
use crate::config::HttpAdapterConfig;
use crate::core::coordinator::DEFAULT_ENDPOINT;
use crate::core::{AuctionRequest, ConfigProvider};
use crate::utils::error::{AdapterError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "lifestreet-bid")]
#[command(about = "Fetch Lifestreet bids for an auction request")]
pub struct CliConfig {
    #[arg(long, help = "Auction request JSON file")]
    pub request: PathBuf,

    #[arg(long, help = "TOML config file; overrides endpoint and HTTP flags")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value = "1000")]
    pub timeout_ms: u64,

    #[arg(long, default_value = "10")]
    pub max_conns_per_host: usize,

    #[arg(long, default_value = "60")]
    pub idle_conn_timeout_secs: u64,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn toml_config(&self) -> Result<Option<TomlConfig>> {
        self.config.as_deref().map(TomlConfig::from_file).transpose()
    }

    pub fn read_request(&self) -> Result<AuctionRequest> {
        read_auction_request(&self.request)
    }
}

pub fn read_auction_request(path: &Path) -> Result<AuctionRequest> {
    let data = fs::read(path)?;
    serde_json::from_slice(&data).map_err(|e| AdapterError::ConfigError {
        message: format!("Invalid auction request {}: {}", path.display(), e),
    })
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn http_config(&self) -> HttpAdapterConfig {
        HttpAdapterConfig {
            max_conns_per_host: self.max_conns_per_host,
            idle_conn_timeout_secs: self.idle_conn_timeout_secs,
        }
    }

    fn request_timeout(&self) -> Option<Duration> {
        Some(Duration::from_millis(self.timeout_ms))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_positive_number("timeout_ms", self.timeout_ms, 1)?;
        validation::validate_positive_number(
            "max_conns_per_host",
            self.max_conns_per_host as u64,
            1,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["lifestreet-bid", "--request", "auction.json"]);
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(1000)));
        assert_eq!(config.http_config(), HttpAdapterConfig::default());
        assert!(config.validate().is_ok());
        assert!(config.toml_config().unwrap().is_none());
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        let config = CliConfig::parse_from([
            "lifestreet-bid",
            "--request",
            "auction.json",
            "--timeout-ms",
            "0",
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_read_auction_request() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"{
                    "tid": "t-1",
                    "bidder_code": "lifestreet",
                    "is_debug": true,
                    "ad_units": [{
                        "code": "div-1",
                        "bid_id": "b-1",
                        "params": {"slot_tag": "net.slot"},
                        "sizes": [{"w": 300, "h": 250}],
                        "media_types": ["banner"]
                    }]
                }"#,
            )
            .unwrap();

        let request = read_auction_request(temp_file.path()).unwrap();
        assert_eq!(request.tid, "t-1");
        assert!(request.is_debug);
        assert_eq!(request.ad_units[0].params["slot_tag"], "net.slot");
        assert_eq!(request.lookup_bid_id("div-1"), Some("b-1"));
        assert_eq!(request.lookup_bid_id("div-2"), None);
    }

    #[test]
    fn test_read_auction_request_rejects_garbage() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[1, 2").unwrap();
        assert!(matches!(
            read_auction_request(temp_file.path()),
            Err(AdapterError::ConfigError { .. })
        ));
    }
}
