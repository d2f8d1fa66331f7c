use crate::domain::openrtb::{App, Device, Format, Site};
use crate::utils::error::AdapterError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content types the remote endpoint accepts, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Banner,
    Video,
}

impl MediaType {
    pub const SUPPORTED: [MediaType; 2] = [MediaType::Banner, MediaType::Video];
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Banner => f.write_str("banner"),
            MediaType::Video => f.write_str("video"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoParams {
    #[serde(default)]
    pub mimes: Vec<String>,
    #[serde(default)]
    pub minduration: u64,
    #[serde(default)]
    pub maxduration: u64,
    #[serde(default)]
    pub startdelay: i64,
    #[serde(default)]
    pub skippable: i64,
    #[serde(default)]
    pub playback_method: Option<i64>,
    #[serde(default)]
    pub protocols: Vec<i64>,
}

/// One placement slot of an auction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdUnit {
    pub code: String,
    /// Auction-assigned identifier echoed back on bids for this unit.
    pub bid_id: String,
    /// Opaque bidder configuration, decoded by the slot parser.
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub sizes: Vec<Format>,
    #[serde(default)]
    pub top_frame: i8,
    #[serde(default)]
    pub instl: i8,
    #[serde(default)]
    pub media_types: Vec<MediaType>,
    #[serde(default)]
    pub video: VideoParams,
}

impl AdUnit {
    pub fn supports(&self, media_type: MediaType) -> bool {
        self.media_types.contains(&media_type)
    }
}

/// Caller's auction request for this bidder. Read-only to the adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuctionRequest {
    pub tid: String,
    #[serde(default)]
    pub account_id: String,
    pub bidder_code: String,
    pub ad_units: Vec<AdUnit>,
    #[serde(default)]
    pub is_debug: bool,
    #[serde(default)]
    pub secure: i8,
    #[serde(default)]
    pub timeout_millis: u64,
    #[serde(default)]
    pub site: Option<Site>,
    #[serde(default)]
    pub app: Option<App>,
    #[serde(default)]
    pub device: Option<Device>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// The bidder's own user id from cookie sync, sent as `user.buyeruid`.
    #[serde(default)]
    pub buyer_uid: Option<String>,
}

impl AuctionRequest {
    /// Auction-assigned bid id for a unit code, if the code is known.
    pub fn lookup_bid_id(&self, ad_unit_code: &str) -> Option<&str> {
        self.ad_units
            .iter()
            .find(|unit| unit.code == ad_unit_code)
            .map(|unit| unit.bid_id.as_str())
            .filter(|bid_id| !bid_id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    #[serde(rename = "code")]
    pub ad_unit_code: String,
    pub bid_id: String,
    #[serde(rename = "bidder")]
    pub bidder_code: String,
    pub price: f64,
    pub adm: String,
    pub creative_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    pub width: u64,
    pub height: u64,
    pub deal_id: String,
    pub nurl: String,
}

/// One diagnostic entry per attempted call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidderDebug {
    pub request_uri: String,
    pub request_body: String,
    pub status_code: u16,
    pub response_body: String,
}

/// A single encoded request, scoped to one ad unit and one media type.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub unit_index: usize,
    pub unit_code: String,
    pub media_type: MediaType,
    pub body: String,
}

/// Outcome of one transport call. `status_code` is 0 when no response arrived.
#[derive(Debug, Default)]
pub struct CallResult {
    pub response_body: String,
    pub status_code: u16,
    pub bid: Option<Bid>,
    pub error: Option<AdapterError>,
}
