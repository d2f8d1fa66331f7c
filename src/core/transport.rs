use crate::config::HttpAdapterConfig;
use crate::core::context::CallContext;
use crate::domain::model::{Bid, CallResult};
use crate::domain::openrtb::BidResponse;
use crate::utils::error::{AdapterError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::sync::Arc;

const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Build the pooled client shared by every call of the adapter.
pub fn build_client(config: &HttpAdapterConfig) -> Result<Client> {
    let client = Client::builder()
        .pool_max_idle_per_host(config.max_conns_per_host)
        .pool_idle_timeout(config.idle_conn_timeout())
        .build()?;
    Ok(client)
}

/// Performs one request/response exchange with the bidding endpoint.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    endpoint: Arc<str>,
}

impl Transport {
    pub fn new(client: Client, endpoint: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one encoded request. Never fails outright: the error, if any, is in the result.
    pub async fn call_one(&self, ctx: &CallContext, body: String) -> CallResult {
        let mut result = CallResult::default();

        let exchange = tokio::select! {
            biased;
            err = ctx.done() => Err(err),
            exchange = self.exchange(body) => exchange,
        };

        let (status, response_body) = match exchange {
            Ok(exchange) => exchange,
            Err(e) => {
                result.error = Some(e);
                return result;
            }
        };

        result.status_code = status.as_u16();
        match parse_response(status, &response_body) {
            Ok(bid) => result.bid = bid,
            Err(e) => result.error = Some(e),
        }
        result.response_body = response_body;
        result
    }

    async fn exchange(&self, body: String) -> Result<(StatusCode, String)> {
        let response = self
            .client
            .post(&*self.endpoint)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Bid endpoint response status: {}", status);

        // Read the body regardless of status; debug output needs it.
        let text = response.text().await?;
        Ok((status, text))
    }
}

/// Interpret a completed exchange. Only the first bid of the first seat is used.
pub fn parse_response(status: StatusCode, body: &str) -> Result<Option<Bid>> {
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if status != StatusCode::OK {
        return Err(AdapterError::RemoteError {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let response: BidResponse = serde_json::from_str(body).map_err(AdapterError::DecodeError)?;
    let Some(wire) = response.seatbid.first().and_then(|seat| seat.bid.first()) else {
        return Ok(None);
    };

    Ok(Some(Bid {
        ad_unit_code: wire.impid.clone(),
        price: wire.price,
        adm: wire.adm.clone(),
        creative_id: wire.crid.clone(),
        width: wire.w,
        height: wire.h,
        deal_id: wire.dealid.clone(),
        nurl: wire.nurl.clone(),
        ..Default::default()
    }))
}
