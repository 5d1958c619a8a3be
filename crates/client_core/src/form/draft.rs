use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use shared::{
    domain::{TimeSlot, TimeZone},
    protocol::EventPayload,
};

use super::preview::AttachedImage;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%B %d, %Y"];

/// Text-editable fields of the draft. The banner image has its own
/// operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    EventName,
    EventDate,
    StartTime,
    EndTime,
    TimeZone,
    Description,
    VideoUrl,
}

impl DraftField {
    pub const ALL: [DraftField; 7] = [
        DraftField::EventName,
        DraftField::EventDate,
        DraftField::StartTime,
        DraftField::EndTime,
        DraftField::TimeZone,
        DraftField::Description,
        DraftField::VideoUrl,
    ];

    /// Key used for this field in the wire payload.
    pub fn key(self) -> &'static str {
        match self {
            DraftField::EventName => "eventName",
            DraftField::EventDate => "eventDate",
            DraftField::StartTime => "startTime",
            DraftField::EndTime => "endTime",
            DraftField::TimeZone => "timeZone",
            DraftField::Description => "description",
            DraftField::VideoUrl => "videoUrl",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DraftField::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown form field '{s}'"))
    }
}

/// The unsaved event being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub event_name: String,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<TimeSlot>,
    pub end_time: Option<TimeSlot>,
    pub time_zone: Option<TimeZone>,
    pub description: String,
    pub video_url: String,
}

impl EventDraft {
    /// Writes raw input into `field`. Input a typed field cannot interpret
    /// leaves it unset.
    pub fn set(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::EventName => self.event_name = value.to_string(),
            DraftField::EventDate => self.event_date = parse_date(value),
            DraftField::StartTime => self.start_time = value.parse().ok(),
            DraftField::EndTime => self.end_time = value.parse().ok(),
            DraftField::TimeZone => self.time_zone = value.parse().ok(),
            DraftField::Description => self.description = value.to_string(),
            DraftField::VideoUrl => self.video_url = value.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == EventDraft::default()
    }

    pub fn to_payload(&self, image: Option<&AttachedImage>) -> EventPayload {
        EventPayload {
            event_name: self.event_name.clone(),
            event_date: self.event_date,
            start_time: self.start_time.map(TimeSlot::label).unwrap_or_default(),
            end_time: self.end_time.map(TimeSlot::label).unwrap_or_default(),
            time_zone: self
                .time_zone
                .map(|zone| zone.label().to_string())
                .unwrap_or_default(),
            description: self.description.clone(),
            video_url: self.video_url.clone(),
            banner_image: image.map(AttachedImage::info),
            banner_image_url: image
                .map(|image| image.preview_url().to_string())
                .unwrap_or_default(),
            banner_image_size: image.map(AttachedImage::size_bytes),
        }
    }

    /// Rebuilds a draft from a stored record. Image metadata is dropped since
    /// the bytes cannot be recovered from the record.
    pub fn from_payload(payload: &EventPayload) -> Self {
        Self {
            event_name: payload.event_name.clone(),
            event_date: payload.event_date,
            start_time: payload.start_time.parse().ok(),
            end_time: payload.end_time.parse().ok(),
            time_zone: payload.time_zone.parse().ok(),
            description: payload.description.clone(),
            video_url: payload.video_url.clone(),
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}
