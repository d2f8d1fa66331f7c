pub mod context;
pub mod coordinator;
pub mod request_builder;
pub mod slot;
pub mod transport;

pub use crate::domain::model::{AdUnit, AuctionRequest, Bid, BidderDebug, CallResult, MediaType};
pub use crate::domain::ports::{Adapter, ConfigProvider};
pub use crate::utils::error::Result;
