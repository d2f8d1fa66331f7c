use crate::config::HttpAdapterConfig;
use crate::core::context::CallContext;
use crate::domain::model::{AuctionRequest, Bid, BidderDebug};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn http_config(&self) -> HttpAdapterConfig;
    /// Budget for one whole auction call, applied as the context deadline.
    fn request_timeout(&self) -> Option<Duration>;
}

/// A bidder that turns one auction request into bids from its remote endpoint.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Bidder name, used for cookie sync and logging.
    fn name(&self) -> &str;

    fn skip_no_cookies(&self) -> bool;

    /// Run one auction. Debug entries are appended to `debug` when the request asks for them.
    async fn call(
        &self,
        ctx: &CallContext,
        request: &AuctionRequest,
        debug: &mut Vec<BidderDebug>,
    ) -> Result<Vec<Bid>>;
}
