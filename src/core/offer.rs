use crate::domain::model::{ChangeRequest, EntityRef};
use crate::utils::error::{MpError, Result};
use chrono::NaiveDate;
use serde_json::json;

pub const OFFER: &str = "Offer@1.0";

/// Makes a draft offer public.
pub fn release_offer_change(offer_id: &str) -> Result<ChangeRequest> {
    ChangeRequest::new("ReleaseOffer", EntityRef::new(OFFER, offer_id), &json!({}))
}

/// Moves the date after which buyers can no longer accept the offer.
pub fn update_expiry_change(offer_id: &str, expiry_date: NaiveDate) -> Result<ChangeRequest> {
    ChangeRequest::new(
        "UpdateAvailability",
        EntityRef::new(OFFER, offer_id),
        &json!({ "AvailabilityEndDate": expiry_date.format("%Y-%m-%d").to_string() }),
    )
}

pub fn parse_expiry_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| MpError::InvalidConfigValueError {
        field: "expiry_date".to_string(),
        value: value.to_string(),
        reason: format!("Expected YYYY-MM-DD: {}", e),
    })
}
