use crate::core::context::CallContext;
use crate::core::request_builder;
use crate::core::transport::{build_client, Transport};
use crate::domain::model::{AuctionRequest, Bid, BidderDebug, CallResult, OutboundRequest};
use crate::domain::ports::{Adapter, ConfigProvider};
use crate::utils::error::{AdapterError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tokio::task::JoinSet;

pub const ADAPTER_NAME: &str = "lifestreet";
pub const DEFAULT_ENDPOINT: &str = "https://prebid.s2s.lfstmedia.com/adrequest";

/// Fans one auction out to the Lifestreet endpoint, one call per built request.
#[derive(Debug, Clone)]
pub struct LifestreetAdapter {
    transport: Transport,
}

impl LifestreetAdapter {
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            transport: Transport::new(client, endpoint),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = build_client(&config.http_config())?;
        Ok(Self::with_endpoint(client, config.endpoint()))
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Attach bidder code, bid id and media type, or reject a bid for an unknown unit.
    fn correlate(
        &self,
        request: &AuctionRequest,
        outbound: &OutboundRequest,
        result: &mut CallResult,
    ) {
        let Some(bid) = result.bid.as_mut() else {
            return;
        };

        bid.bidder_code = request.bidder_code.clone();
        bid.media_type = Some(outbound.media_type);
        match request.lookup_bid_id(&bid.ad_unit_code) {
            Some(bid_id) => bid.bid_id = bid_id.to_string(),
            None => {
                tracing::warn!(
                    unit = %outbound.unit_code,
                    returned = %bid.ad_unit_code,
                    "Dropping bid for unknown ad unit code"
                );
                result.error = Some(AdapterError::bad_server_response(format!(
                    "Unknown ad unit code '{}'",
                    bid.ad_unit_code
                )));
                result.bid = None;
            }
        }
    }
}

#[async_trait]
impl Adapter for LifestreetAdapter {
    fn name(&self) -> &str {
        ADAPTER_NAME
    }

    fn skip_no_cookies(&self) -> bool {
        false
    }

    async fn call(
        &self,
        ctx: &CallContext,
        request: &AuctionRequest,
        debug: &mut Vec<BidderDebug>,
    ) -> Result<Vec<Bid>> {
        let outbound = request_builder::build_all(request)?;
        tracing::debug!(
            tid = %request.tid,
            units = request.ad_units.len(),
            requests = outbound.len(),
            "Dispatching bid requests"
        );

        let mut tasks = JoinSet::new();
        for (slot, out) in outbound.iter().enumerate() {
            let transport = self.transport.clone();
            let ctx = ctx.clone();
            let body = out.body.clone();
            tasks.spawn(async move { (slot, transport.call_one(&ctx, body).await) });
        }

        let mut bids = Vec::new();
        let mut last_error = None;
        let mut drained = 0usize;

        while let Some(joined) = tasks.join_next().await {
            drained += 1;
            let (slot, mut result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    // No slot to correlate against; count the failure and move on.
                    tracing::error!("Bid request task failed: {}", e);
                    last_error = Some(AdapterError::TaskFailed {
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            let out = &outbound[slot];
            self.correlate(request, out, &mut result);

            tracing::debug!(
                unit = %out.unit_code,
                media_type = %out.media_type,
                status = result.status_code,
                bid = result.bid.is_some(),
                "Bid request completed"
            );

            if request.is_debug {
                debug.push(BidderDebug {
                    request_uri: self.transport.endpoint().to_string(),
                    request_body: out.body.clone(),
                    status_code: result.status_code,
                    response_body: std::mem::take(&mut result.response_body),
                });
            }
            if let Some(bid) = result.bid {
                bids.push(bid);
            }
            if let Some(e) = result.error {
                tracing::debug!(unit = %out.unit_code, "Bid request error: {}", e);
                last_error = Some(e);
            }
        }
        debug_assert_eq!(drained, outbound.len());

        if bids.is_empty() {
            return match last_error {
                Some(e) => Err(e),
                None => Ok(bids),
            };
        }
        Ok(bids)
    }
}
