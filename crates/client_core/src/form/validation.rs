//! Submit-time validation rules for the event draft.
//!
//! Every rule runs on every call; the report lists all violations in a fixed
//! order so the aggregated message reads the same way each time.

use thiserror::Error;

use super::draft::EventDraft;

pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];
const MIN_DESCRIPTION_CHARS: usize = 16;
const VIDEO_URL_PREFIX: &str = "https://";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    MissingEventName,
    MissingEventDate,
    MissingStartTime,
    MissingEndTime,
    MissingTimeZone,
    InvalidEventName,
    DescriptionTooShort,
    InvalidVideoUrl,
    UnsupportedBannerImage,
}

impl Violation {
    pub fn label(self) -> &'static str {
        match self {
            Violation::MissingEventName => "Event Name",
            Violation::MissingEventDate => "Date & Time",
            Violation::MissingStartTime => "Start Time",
            Violation::MissingEndTime => "End Time",
            Violation::MissingTimeZone => "Time Zone",
            Violation::InvalidEventName => "Event Name (only characters, numbers, or hyphens)",
            Violation::DescriptionTooShort => "Description (must be more than 15 characters)",
            Violation::InvalidVideoUrl => "Valid Video URL (must be a valid HTTPS link)",
            Violation::UnsupportedBannerImage => {
                "Valid Banner Image (Only JPG and PNG images are allowed)"
            }
        }
    }

    pub fn is_missing_field(self) -> bool {
        matches!(
            self,
            Violation::MissingEventName
                | Violation::MissingEventDate
                | Violation::MissingStartTime
                | Violation::MissingEndTime
                | Violation::MissingTimeZone
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.violations))]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn contains(&self, violation: Violation) -> bool {
        self.violations.contains(&violation)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.label()).collect()
    }

    /// The inline message shown above the form, `None` when valid.
    pub fn message(&self) -> Option<String> {
        (!self.is_valid()).then(|| summarize(&self.violations))
    }
}

fn summarize(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return "no validation problems".to_string();
    }
    let labels: Vec<&str> = violations.iter().map(|v| v.label()).collect();
    format!("Missing or incorrect data in {}.", labels.join(", "))
}

/// Runs every rule against `draft` and the MIME type of the attached image,
/// if any.
pub fn validate_draft(draft: &EventDraft, image_mime_type: Option<&str>) -> ValidationReport {
    let mut violations = Vec::new();
    let name = draft.event_name.trim();

    if name.is_empty() {
        violations.push(Violation::MissingEventName);
    }
    if draft.event_date.is_none() {
        violations.push(Violation::MissingEventDate);
    }
    if draft.start_time.is_none() {
        violations.push(Violation::MissingStartTime);
    }
    if draft.end_time.is_none() {
        violations.push(Violation::MissingEndTime);
    }
    if draft.time_zone.is_none() {
        violations.push(Violation::MissingTimeZone);
    }

    if !name.is_empty() && !is_valid_event_name(name) {
        violations.push(Violation::InvalidEventName);
    }
    if !draft.description.trim().is_empty()
        && draft.description.chars().count() < MIN_DESCRIPTION_CHARS
    {
        violations.push(Violation::DescriptionTooShort);
    }
    if !draft.video_url.trim().is_empty() && !draft.video_url.starts_with(VIDEO_URL_PREFIX) {
        violations.push(Violation::InvalidVideoUrl);
    }
    if let Some(mime_type) = image_mime_type {
        if !ACCEPTED_IMAGE_TYPES.contains(&mime_type) {
            violations.push(Violation::UnsupportedBannerImage);
        }
    }

    ValidationReport { violations }
}

fn is_valid_event_name(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
