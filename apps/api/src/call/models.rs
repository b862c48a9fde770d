use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Call-type marker the call recorder writes for outbound calls.
pub const OUTBOUND_MARKER: &str = "โทรออก";

/// Which party placed the call. Decides whose phone number is whose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    Outbound,
    Inbound,
}

impl CallDirection {
    /// Maps a raw call-type marker to a direction. Anything that is not an outbound
    /// marker counts as inbound.
    pub fn from_marker(marker: &str) -> Self {
        let marker = marker.trim();
        if marker == OUTBOUND_MARKER || marker.eq_ignore_ascii_case("outbound") {
            CallDirection::Outbound
        } else {
            CallDirection::Inbound
        }
    }
}

/// Metadata recovered from a structured recording filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMetadata {
    pub date: NaiveDate,
    #[serde(with = "hour_minute")]
    pub time: NaiveTime,
    /// Raw call-type marker as it appeared in the filename.
    pub call_type: String,
    pub direction: CallDirection,
    pub source_phone: String,
    pub destination_phone: String,
    pub original_filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalespersonRecord {
    pub name: String,
    pub phone: String,
}

/// One row of the customer history sheet, keyed by phone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerHistoryRecord {
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_call_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products_of_interest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_maker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_points: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objections: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_salesperson: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Call times are minute-precision, written as `HH:MM`.
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(de::Error::custom)
    }
}

/// Reference data loaded from the connected spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataContext {
    pub product_context: Option<String>,
    pub salespersons: Vec<SalespersonRecord>,
    pub customer_history: Vec<CustomerHistoryRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thai_outbound_marker() {
        assert_eq!(
            CallDirection::from_marker("โทรออก"),
            CallDirection::Outbound
        );
    }

    #[test]
    fn test_english_outbound_marker_is_case_insensitive() {
        assert_eq!(
            CallDirection::from_marker("OutBound"),
            CallDirection::Outbound
        );
    }

    #[test]
    fn test_other_markers_are_inbound() {
        assert_eq!(CallDirection::from_marker("โทรเข้า"), CallDirection::Inbound);
        assert_eq!(CallDirection::from_marker("inbound"), CallDirection::Inbound);
        assert_eq!(CallDirection::from_marker(""), CallDirection::Inbound);
    }

    #[test]
    fn test_call_time_serializes_as_hour_minute() {
        let meta = CallMetadata {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            call_type: OUTBOUND_MARKER.to_string(),
            direction: CallDirection::Outbound,
            source_phone: "0811111111".to_string(),
            destination_phone: "0822222222".to_string(),
            original_filename: "call.mp3".to_string(),
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["time"], "10:30");
        assert_eq!(json["date"], "2024-01-15");

        let back: CallMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn test_customer_record_omits_empty_fields() {
        let record = CustomerHistoryRecord {
            phone: "0822222222".to_string(),
            company: Some("Acme".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["company"], "Acme");
        assert!(json.get("budget").is_none());
    }
}
