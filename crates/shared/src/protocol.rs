use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub const EVENT_SAVED_MESSAGE: &str = "Event data saved successfully";

pub fn events_route() -> &'static str {
    "/events"
}

/// Metadata for an attached banner image. The bytes never travel with the
/// event record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BannerImageInfo {
    pub file_name: String,
    pub mime_type: String,
}

/// The event record as it travels between the form and the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPayload {
    pub event_name: String,
    #[serde(deserialize_with = "lenient_date")]
    pub event_date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub time_zone: String,
    pub description: String,
    pub video_url: String,
    pub banner_image: Option<BannerImageInfo>,
    pub banner_image_url: String,
    #[serde(deserialize_with = "lenient_size")]
    pub banner_image_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventResponse {
    pub message: String,
    pub event_data: serde_json::Value,
}

// Browser clients post full ISO timestamps ("2025-06-01T00:00:00.000Z");
// only the calendar date is kept.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(serde::de::Error::custom)
}

// Cleared forms post an empty string in place of the byte count.
fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSize {
        Bytes(u64),
        Text(String),
    }

    match Option::<RawSize>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawSize::Bytes(bytes)) => Ok(Some(bytes)),
        Some(RawSize::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawSize::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_camel_case_keys() {
        let payload = EventPayload {
            event_name: "summer-fest".into(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            banner_image_size: Some(12),
            ..EventPayload::default()
        };
        let value = serde_json::to_value(&payload).expect("json");
        assert_eq!(value["eventName"], "summer-fest");
        assert_eq!(value["eventDate"], "2025-06-01");
        assert_eq!(value["bannerImageSize"], 12);
        assert!(value["bannerImage"].is_null());
    }

    #[test]
    fn payload_accepts_browser_timestamps_and_missing_keys() {
        let payload: EventPayload = serde_json::from_value(serde_json::json!({
            "eventName": "launch",
            "eventDate": "2025-06-01T04:00:00.000Z",
            "bannerImageSize": "",
        }))
        .expect("payload");
        assert_eq!(payload.event_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(payload.start_time.is_empty());
        assert!(payload.banner_image_size.is_none());
    }
}
