//! Recording filename parser.
//!
//! Call recorders name files `YYYY-MM-DD_HH-MM_<call type>_<source>_<destination>.<ext>`.
//! Anything else simply yields no metadata.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::call::models::{CallDirection, CallMetadata};

/// Phone segments may contain dots; the extension must contain a letter so a dotted
/// destination number without an extension is kept whole.
fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(\d{4}-\d{2}-\d{2})_(\d{1,2})-(\d{2})_([^_]+)_([^_]+)_([^_]+?)(?:\.[A-Za-z0-9]*[A-Za-z][A-Za-z0-9]*)?$",
        )
        .expect("filename pattern is valid")
    })
}

/// Extracts call metadata from a recording filename.
///
/// Leading directories are ignored. Returns `None` when the name does not follow the
/// recorder's pattern or carries an impossible date or time.
pub fn parse_call_filename(filename: &str) -> Option<CallMetadata> {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .trim();

    let caps = filename_pattern().captures(base)?;

    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    let hour: u32 = caps[2].parse().ok()?;
    let minute: u32 = caps[3].parse().ok()?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let call_type = caps[4].to_string();

    Some(CallMetadata {
        date,
        time,
        direction: CallDirection::from_marker(&call_type),
        call_type,
        source_phone: caps[5].to_string(),
        destination_phone: caps[6].to_string(),
        original_filename: filename.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_outbound_recording() {
        let meta = parse_call_filename("2024-01-15_10-30_โทรออก_0811111111_0822222222.mp3")
            .expect("should parse");
        assert_eq!(meta.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(meta.time.format("%H:%M").to_string(), "10:30");
        assert_eq!(meta.call_type, "โทรออก");
        assert_eq!(meta.direction, CallDirection::Outbound);
        assert_eq!(meta.source_phone, "0811111111");
        assert_eq!(meta.destination_phone, "0822222222");
        assert_eq!(
            meta.original_filename,
            "2024-01-15_10-30_โทรออก_0811111111_0822222222.mp3"
        );
    }

    #[test]
    fn test_parses_inbound_without_extension() {
        let meta = parse_call_filename("2024-03-02_09-05_โทรเข้า_0899999999_021234567")
            .expect("should parse");
        assert_eq!(meta.direction, CallDirection::Inbound);
        assert_eq!(meta.destination_phone, "021234567");
    }

    #[test]
    fn test_ignores_leading_directories() {
        let meta = parse_call_filename("recordings/jan/2024-01-15_10-30_outbound_081_082.wav")
            .expect("should parse");
        assert_eq!(meta.source_phone, "081");
        assert_eq!(
            meta.original_filename,
            "recordings/jan/2024-01-15_10-30_outbound_081_082.wav"
        );
    }

    #[test]
    fn test_formatted_phone_segments_are_kept_raw() {
        let meta = parse_call_filename("2024-01-15_10-30_โทรออก_+66-81-111-1111_082 222 2222.m4a")
            .expect("should parse");
        assert_eq!(meta.source_phone, "+66-81-111-1111");
        assert_eq!(meta.destination_phone, "082 222 2222");
    }

    #[test]
    fn test_dotted_phone_segments_on_both_sides() {
        let meta = parse_call_filename("2024-01-15_10-30_outbound_081.111.1111_082.222.2222.mp3")
            .expect("should parse");
        assert_eq!(meta.source_phone, "081.111.1111");
        assert_eq!(meta.destination_phone, "082.222.2222");

        let meta = parse_call_filename("2024-01-15_10-30_outbound_081.111.1111_082.222.2222")
            .expect("should parse");
        assert_eq!(meta.destination_phone, "082.222.2222");
    }

    #[test]
    fn test_time_serializes_as_hour_minute() {
        let meta = parse_call_filename("2024-01-15_10-30_โทรออก_0811111111_0822222222.mp3")
            .expect("should parse");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["time"], "10:30");
    }

    #[test]
    fn test_unstructured_name_is_none() {
        assert!(parse_call_filename("meeting recording.mp3").is_none());
        assert!(parse_call_filename("").is_none());
    }

    #[test]
    fn test_missing_segment_is_none() {
        assert!(parse_call_filename("2024-01-15_10-30_โทรออก_0811111111.mp3").is_none());
    }

    #[test]
    fn test_impossible_date_is_none() {
        assert!(parse_call_filename("2024-13-40_10-30_โทรออก_081_082.mp3").is_none());
    }

    #[test]
    fn test_impossible_time_is_none() {
        assert!(parse_call_filename("2024-01-15_25-30_โทรออก_081_082.mp3").is_none());
    }
}
