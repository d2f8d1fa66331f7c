pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::{toml_config::TomlConfig, HttpAdapterConfig};

pub use core::{context::CallContext, coordinator::LifestreetAdapter};
pub use domain::model::{AdUnit, AuctionRequest, Bid, BidderDebug, MediaType};
pub use domain::ports::{Adapter, ConfigProvider};
pub use utils::error::{AdapterError, Result};
