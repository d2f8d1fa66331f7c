use crate::core::slot::SlotSpec;
use crate::domain::model::{AdUnit, AuctionRequest, MediaType, OutboundRequest};
use crate::domain::openrtb::{Banner, BidRequest, Imp, Source, User, Video};
use crate::utils::error::{AdapterError, Result};

pub const NO_SUPPORTED_IMPRESSIONS: &str = "No supported impressions";

/// Request-level fields shared by every outbound request of one auction.
pub fn base_request(request: &AuctionRequest) -> BidRequest {
    let user = match (&request.user_id, &request.buyer_uid) {
        (None, None) => None,
        (id, buyer_uid) => Some(User {
            id: id.clone().unwrap_or_default(),
            buyeruid: buyer_uid.clone().unwrap_or_default(),
        }),
    };

    BidRequest {
        id: request.tid.clone(),
        imp: Vec::new(),
        site: request.site.clone(),
        app: request.app.clone(),
        device: request.device.clone(),
        user,
        source: Some(Source {
            tid: request.tid.clone(),
        }),
        at: 1,
        tmax: request.timeout_millis,
        test: i8::from(request.is_debug),
    }
}

/// The unit's impression for one media type, or `None` when it has no such content.
pub fn make_imp(unit: &AdUnit, media_type: MediaType, secure: i8) -> Option<Imp> {
    if !unit.supports(media_type) {
        return None;
    }
    let first_size = unit.sizes.first()?;

    let mut imp = Imp {
        id: unit.code.clone(),
        instl: unit.instl,
        secure: Some(secure),
        ..Default::default()
    };

    match media_type {
        MediaType::Banner => {
            imp.banner = Some(Banner {
                w: Some(first_size.w),
                h: Some(first_size.h),
                format: Some(unit.sizes.clone()),
                topframe: unit.top_frame,
            });
        }
        MediaType::Video => {
            if unit.video.mimes.is_empty() {
                return None;
            }
            imp.video = Some(Video {
                mimes: unit.video.mimes.clone(),
                minduration: unit.video.minduration,
                maxduration: unit.video.maxduration,
                w: Some(first_size.w),
                h: Some(first_size.h),
                startdelay: Some(unit.video.startdelay),
                skip: Some(unit.video.skippable),
                protocols: unit.video.protocols.clone(),
                playbackmethod: unit.video.playback_method.into_iter().collect(),
            });
        }
    }

    Some(imp)
}

/// Build the request for exactly one unit and one media type.
///
/// Fails with `BadInput` when the unit has nothing to offer for `media_type`.
pub fn build(
    request: &AuctionRequest,
    unit_index: usize,
    media_type: MediaType,
    slot: &SlotSpec,
) -> Result<BidRequest> {
    let unit = request.ad_units.get(unit_index).ok_or_else(|| {
        AdapterError::invalid_input(format!("Ad unit index {} out of range", unit_index))
    })?;

    let mut imp = make_imp(unit, media_type, request.secure)
        .ok_or_else(|| AdapterError::bad_input(NO_SUPPORTED_IMPRESSIONS))?;

    // The endpoint resolves sizes from the slot tag.
    if let Some(banner) = imp.banner.as_mut() {
        banner.format = None;
    }
    imp.tagid = slot.tag();

    let mut rtb = base_request(request);
    rtb.imp = vec![imp];
    Ok(rtb)
}

/// Build and encode every request of the auction, banner before video per unit.
///
/// A unit must produce at least one request. Any failure other than a
/// per-media-type `BadInput` aborts before anything is sent.
pub fn build_all(request: &AuctionRequest) -> Result<Vec<OutboundRequest>> {
    let mut outbound = Vec::with_capacity(request.ad_units.len() * MediaType::SUPPORTED.len());

    for (unit_index, unit) in request.ad_units.iter().enumerate() {
        let slot = SlotSpec::from_params(&unit.params)?;
        let built_before = outbound.len();

        for media_type in MediaType::SUPPORTED {
            match build(request, unit_index, media_type, &slot) {
                Ok(rtb) => {
                    let body =
                        serde_json::to_string(&rtb).map_err(AdapterError::SerializationError)?;
                    outbound.push(OutboundRequest {
                        unit_index,
                        unit_code: unit.code.clone(),
                        media_type,
                        body,
                    });
                }
                Err(e) if e.is_bad_input() => {
                    tracing::trace!(unit = %unit.code, %media_type, "no content for media type");
                }
                Err(e) => return Err(e),
            }
        }

        if outbound.len() == built_before {
            return Err(AdapterError::bad_input(NO_SUPPORTED_IMPRESSIONS));
        }
    }

    Ok(outbound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::VideoParams;
    use crate::domain::openrtb::Format;
    use serde_json::json;

    fn banner_unit(code: &str, tag: &str) -> AdUnit {
        AdUnit {
            code: code.to_string(),
            bid_id: format!("bid-{}", code),
            params: json!({ "slot_tag": tag }),
            sizes: vec![Format { w: 300, h: 250 }, Format { w: 300, h: 600 }],
            media_types: vec![MediaType::Banner],
            ..Default::default()
        }
    }

    fn video_params() -> VideoParams {
        VideoParams {
            mimes: vec!["video/mp4".to_string()],
            minduration: 5,
            maxduration: 30,
            protocols: vec![2, 3],
            playback_method: Some(1),
            ..Default::default()
        }
    }

    fn auction(units: Vec<AdUnit>) -> AuctionRequest {
        AuctionRequest {
            tid: "tid-1".to_string(),
            bidder_code: "lifestreet".to_string(),
            ad_units: units,
            timeout_millis: 500,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_projects_single_unit_and_strips_formats() {
        let req = auction(vec![banner_unit("div-1", "net.a"), banner_unit("div-2", "net.b")]);
        let slot: SlotSpec = "net.b".parse().unwrap();

        let rtb = build(&req, 1, MediaType::Banner, &slot).unwrap();

        assert_eq!(rtb.id, "tid-1");
        assert_eq!(rtb.tmax, 500);
        assert_eq!(rtb.imp.len(), 1);
        let imp = &rtb.imp[0];
        assert_eq!(imp.id, "div-2");
        assert_eq!(imp.tagid, "net.b");
        let banner = imp.banner.as_ref().unwrap();
        assert_eq!(banner.w, Some(300));
        assert_eq!(banner.h, Some(250));
        assert!(banner.format.is_none());
        assert!(imp.video.is_none());
    }

    #[test]
    fn test_build_unsupported_media_type_is_bad_input() {
        let req = auction(vec![banner_unit("div-1", "net.a")]);
        let slot: SlotSpec = "net.a".parse().unwrap();

        let err = build(&req, 0, MediaType::Video, &slot).unwrap_err();
        assert!(err.is_bad_input());
        assert_eq!(err.to_string(), NO_SUPPORTED_IMPRESSIONS);
    }

    #[test]
    fn test_video_requires_mimes() {
        let mut unit = banner_unit("div-1", "net.a");
        unit.media_types = vec![MediaType::Video];
        assert!(make_imp(&unit, MediaType::Video, 0).is_none());

        unit.video = video_params();
        let imp = make_imp(&unit, MediaType::Video, 1).unwrap();
        let video = imp.video.unwrap();
        assert_eq!(video.mimes, vec!["video/mp4"]);
        assert_eq!(video.maxduration, 30);
        assert_eq!(video.playbackmethod, vec![1]);
        assert_eq!(imp.secure, Some(1));
        assert!(imp.banner.is_none());
    }

    #[test]
    fn test_unit_without_sizes_has_no_content() {
        let mut unit = banner_unit("div-1", "net.a");
        unit.sizes.clear();
        assert!(make_imp(&unit, MediaType::Banner, 0).is_none());
    }

    #[test]
    fn test_build_all_emits_banner_then_video_per_unit() {
        let mut both = banner_unit("div-1", "net.a");
        both.media_types = vec![MediaType::Video, MediaType::Banner];
        both.video = video_params();
        let req = auction(vec![both, banner_unit("div-2", "net.b")]);

        let outbound = build_all(&req).unwrap();

        let shape: Vec<(usize, &str, MediaType)> = outbound
            .iter()
            .map(|o| (o.unit_index, o.unit_code.as_str(), o.media_type))
            .collect();
        assert_eq!(
            shape,
            vec![
                (0, "div-1", MediaType::Banner),
                (0, "div-1", MediaType::Video),
                (1, "div-2", MediaType::Banner),
            ]
        );

        let body: serde_json::Value = serde_json::from_str(&outbound[1].body).unwrap();
        assert_eq!(body["imp"][0]["tagid"], "net.a");
        assert!(body["imp"][0].get("banner").is_none());
    }

    #[test]
    fn test_build_all_rejects_unit_without_content() {
        let mut native_only = banner_unit("div-2", "net.b");
        native_only.media_types.clear();
        let req = auction(vec![banner_unit("div-1", "net.a"), native_only]);

        let err = build_all(&req).unwrap_err();
        assert!(err.is_bad_input());
    }

    #[test]
    fn test_build_all_fails_fast_on_bad_slot_tag() {
        let req = auction(vec![banner_unit("div-1", "net.a"), banner_unit("div-2", "bad")]);
        assert!(matches!(
            build_all(&req),
            Err(AdapterError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_debug_request_is_marked_test() {
        let mut req = auction(vec![banner_unit("div-1", "net.a")]);
        req.is_debug = true;
        req.buyer_uid = Some("uid-9".to_string());

        let rtb = base_request(&req);
        assert_eq!(rtb.test, 1);
        assert_eq!(rtb.at, 1);
        assert_eq!(rtb.source.unwrap().tid, "tid-1");
        assert_eq!(rtb.user.unwrap().buyeruid, "uid-9");
    }
}
