use super::*;
use chrono::NaiveDate;
use shared::domain::{TimeSlot, TimeZone};

fn complete_draft() -> EventDraft {
    EventDraft {
        event_name: "summer-fest".into(),
        event_date: NaiveDate::from_ymd_opt(2025, 6, 1),
        start_time: TimeSlot::at(10, 0),
        end_time: TimeSlot::at(23, 0),
        time_zone: Some(TimeZone::Eastern),
        description: "A fun outdoor festival".into(),
        video_url: String::new(),
    }
}

#[test]
fn complete_draft_is_valid() {
    let report = validate_draft(&complete_draft(), None);
    assert!(report.is_valid());
    assert!(report.message().is_none());
}

#[test]
fn every_combination_of_missing_required_fields_is_reported_exactly() {
    let required = [
        Violation::MissingEventName,
        Violation::MissingEventDate,
        Violation::MissingStartTime,
        Violation::MissingEndTime,
        Violation::MissingTimeZone,
    ];

    for mask in 0u8..32 {
        let mut draft = complete_draft();
        let mut expected = Vec::new();
        for (bit, violation) in required.iter().enumerate() {
            if mask & (1 << bit) == 0 {
                continue;
            }
            match violation {
                Violation::MissingEventName => draft.event_name = "   ".into(),
                Violation::MissingEventDate => draft.event_date = None,
                Violation::MissingStartTime => draft.start_time = None,
                Violation::MissingEndTime => draft.end_time = None,
                Violation::MissingTimeZone => draft.time_zone = None,
                _ => unreachable!(),
            }
            expected.push(*violation);
        }

        let report = validate_draft(&draft, None);
        assert_eq!(report.violations(), expected.as_slice(), "mask {mask:05b}");
        assert_eq!(report.is_valid(), mask == 0);
    }
}

#[test]
fn names_outside_alphanumeric_and_hyphen_are_rejected() {
    for name in ["summer fest", "summer_fest", "fête", "launch!", "a/b"] {
        let mut draft = complete_draft();
        draft.event_name = name.into();
        let report = validate_draft(&draft, None);
        assert_eq!(report.violations(), &[Violation::InvalidEventName], "{name}");
    }

    let mut draft = complete_draft();
    draft.event_name = "Launch-2025".into();
    assert!(validate_draft(&draft, None).is_valid());
}

#[test]
fn invalid_name_is_reported_alongside_other_problems() {
    let mut draft = complete_draft();
    draft.event_name = "bad name".into();
    draft.time_zone = None;
    let report = validate_draft(&draft, None);
    assert_eq!(
        report.violations(),
        &[Violation::MissingTimeZone, Violation::InvalidEventName]
    );
}

#[test]
fn description_must_exceed_fifteen_characters() {
    let mut draft = complete_draft();

    draft.description = "x".repeat(15);
    assert!(validate_draft(&draft, None).contains(Violation::DescriptionTooShort));

    draft.description = "x".repeat(16);
    assert!(validate_draft(&draft, None).is_valid());

    draft.description = "short".into();
    assert!(validate_draft(&draft, None).contains(Violation::DescriptionTooShort));

    draft.description = "   ".into();
    assert!(validate_draft(&draft, None).is_valid());
}

#[test]
fn video_url_only_needs_https_prefix() {
    let mut draft = complete_draft();

    for url in ["http://example.com", "example.com", "ftp://x", "HTTPS://x"] {
        draft.video_url = url.into();
        assert!(
            validate_draft(&draft, None).contains(Violation::InvalidVideoUrl),
            "{url}"
        );
    }

    for url in ["https://", "https://not a real url", "https://youtu.be/abc"] {
        draft.video_url = url.into();
        assert!(validate_draft(&draft, None).is_valid(), "{url}");
    }
}

#[test]
fn only_jpeg_and_png_images_pass() {
    let draft = complete_draft();
    assert!(validate_draft(&draft, Some("image/jpeg")).is_valid());
    assert!(validate_draft(&draft, Some("image/png")).is_valid());
    for mime in ["image/gif", "image/svg+xml", "application/pdf"] {
        assert_eq!(
            validate_draft(&draft, Some(mime)).violations(),
            &[Violation::UnsupportedBannerImage]
        );
    }
}

#[test]
fn message_lists_every_label_in_order() {
    let draft = EventDraft {
        description: "tiny".into(),
        ..EventDraft::default()
    };
    let report = validate_draft(&draft, Some("image/gif"));
    assert_eq!(
        report.message().as_deref(),
        Some(
            "Missing or incorrect data in Event Name, Date & Time, Start Time, End Time, \
             Time Zone, Description (must be more than 15 characters), \
             Valid Banner Image (Only JPG and PNG images are allowed)."
        )
    );
    assert_eq!(report.to_string(), report.message().expect("message"));
    assert_eq!(
        report
            .violations()
            .iter()
            .filter(|v| v.is_missing_field())
            .count(),
        5
    );
}
