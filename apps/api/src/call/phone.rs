//! Phone normalization and matching against the spreadsheet reference lists.
//!
//! Matching only ever compares digits. A number that normalizes to nothing never
//! matches anything, including another empty number.

use crate::call::models::{
    CallDirection, CallMetadata, CustomerHistoryRecord, DataContext, SalespersonRecord,
};

/// Strips every non-digit character.
pub fn normalize(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// True when both numbers are non-empty after normalization and equal.
pub fn matches(a: &str, b: &str) -> bool {
    let a = normalize(a);
    !a.is_empty() && a == normalize(b)
}

/// Phone numbers of a call split by party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSides<'a> {
    pub salesperson_phone: &'a str,
    pub customer_phone: &'a str,
}

/// Outbound calls are placed by the salesperson, so the source number is theirs.
/// Inbound calls flip the pair.
pub fn side_for(direction: CallDirection, metadata: &CallMetadata) -> CallSides<'_> {
    match direction {
        CallDirection::Outbound => CallSides {
            salesperson_phone: &metadata.source_phone,
            customer_phone: &metadata.destination_phone,
        },
        CallDirection::Inbound => CallSides {
            salesperson_phone: &metadata.destination_phone,
            customer_phone: &metadata.source_phone,
        },
    }
}

/// First salesperson whose phone matches, in sheet order.
pub fn find_salesperson<'a>(
    salespersons: &'a [SalespersonRecord],
    phone: &str,
) -> Option<&'a SalespersonRecord> {
    salespersons.iter().find(|s| matches(&s.phone, phone))
}

/// All history rows recorded against `phone`. Empty when nothing matches.
pub fn filter_customer_history(
    history: &[CustomerHistoryRecord],
    phone: &str,
) -> Vec<CustomerHistoryRecord> {
    history
        .iter()
        .filter(|r| matches(&r.phone, phone))
        .cloned()
        .collect()
}

/// Reference data that applies to one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallMatch {
    pub salesperson: Option<SalespersonRecord>,
    pub customer_history: Vec<CustomerHistoryRecord>,
}

/// Resolves the salesperson and customer history for a parsed call.
pub fn match_call(metadata: &CallMetadata, context: &DataContext) -> CallMatch {
    let sides = side_for(metadata.direction, metadata);
    CallMatch {
        salesperson: find_salesperson(&context.salespersons, sides.salesperson_phone).cloned(),
        customer_history: filter_customer_history(&context.customer_history, sides.customer_phone),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn metadata(direction: CallDirection) -> CallMetadata {
        CallMetadata {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            call_type: match direction {
                CallDirection::Outbound => "โทรออก".to_string(),
                CallDirection::Inbound => "โทรเข้า".to_string(),
            },
            direction,
            source_phone: "0811111111".to_string(),
            destination_phone: "0822222222".to_string(),
            original_filename: "call.mp3".to_string(),
        }
    }

    fn salesperson(name: &str, phone: &str) -> SalespersonRecord {
        SalespersonRecord {
            name: name.to_string(),
            phone: phone.to_string(),
        }
    }

    fn history(phone: &str, company: &str) -> CustomerHistoryRecord {
        CustomerHistoryRecord {
            phone: phone.to_string(),
            company: Some(company.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize("081-111-1111"), "0811111111");
        assert_eq!(normalize("+66 (81) 111 1111"), "66811111111");
        assert_eq!(normalize("n/a"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["081-111-1111", "", "abc", "+66 81 111", "๐๘๑"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_matches_is_symmetric() {
        let pairs = [
            ("081-111-1111", "0811111111"),
            ("0811111111", "0822222222"),
            ("", "0811111111"),
            ("", ""),
            ("ext.", "---"),
        ];
        for (a, b) in pairs {
            assert_eq!(matches(a, b), matches(b, a), "pair {a:?} {b:?}");
        }
    }

    #[test]
    fn test_empty_numbers_never_match() {
        assert!(!matches("", ""));
        assert!(!matches("n/a", "-"));
        assert!(!matches("", "0811111111"));
    }

    #[test]
    fn test_side_for_outbound() {
        let meta = metadata(CallDirection::Outbound);
        let sides = side_for(CallDirection::Outbound, &meta);
        assert_eq!(sides.salesperson_phone, "0811111111");
        assert_eq!(sides.customer_phone, "0822222222");
    }

    #[test]
    fn test_side_for_inbound() {
        let meta = metadata(CallDirection::Inbound);
        let sides = side_for(CallDirection::Inbound, &meta);
        assert_eq!(sides.salesperson_phone, "0822222222");
        assert_eq!(sides.customer_phone, "0811111111");
    }

    #[test]
    fn test_find_salesperson_through_formatting() {
        let list = vec![
            salesperson("Somchai", "089-000-0000"),
            salesperson("Suda", "081-111-1111"),
        ];
        let found = find_salesperson(&list, "0811111111").unwrap();
        assert_eq!(found.name, "Suda");
    }

    #[test]
    fn test_find_salesperson_first_wins() {
        let list = vec![
            salesperson("First", "0811111111"),
            salesperson("Second", "081 111 1111"),
        ];
        assert_eq!(find_salesperson(&list, "0811111111").unwrap().name, "First");
    }

    #[test]
    fn test_filter_history_without_matches_is_empty() {
        let rows = vec![history("0899999999", "Other")];
        assert!(filter_customer_history(&rows, "0822222222").is_empty());
        assert!(filter_customer_history(&[], "0822222222").is_empty());
    }

    #[test]
    fn test_match_call_outbound() {
        let context = DataContext {
            product_context: None,
            salespersons: vec![salesperson("Suda", "081-111-1111")],
            customer_history: vec![
                history("082-222-2222", "Acme"),
                history("0811111111", "Not a customer"),
                history("082 222 2222", "Acme again"),
            ],
        };
        let result = match_call(&metadata(CallDirection::Outbound), &context);
        assert_eq!(result.salesperson.unwrap().name, "Suda");
        assert_eq!(result.customer_history.len(), 2);
        assert!(result
            .customer_history
            .iter()
            .all(|r| normalize(&r.phone) == "0822222222"));
    }

    #[test]
    fn test_match_call_inbound_swaps_sides() {
        let context = DataContext {
            product_context: None,
            salespersons: vec![salesperson("Suda", "0811111111")],
            customer_history: vec![history("0811111111", "Caller Co")],
        };
        let result = match_call(&metadata(CallDirection::Inbound), &context);
        // 0811111111 is the customer on an inbound call
        assert!(result.salesperson.is_none());
        assert_eq!(result.customer_history.len(), 1);
    }
}
