//! Corporation wire → view mapping.

use std::sync::LazyLock;

use kyc_types::{Corporation, CorporationWire};
use regex::Regex;

use super::industry::industry_name;

/// `YYYY-MM-DD` prefix; anything may follow (e.g. a time component)
static FOUNDED_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-\d{2}-\d{2}").unwrap());

/// Extract the founding year from a `YYYY-MM-DD`-shaped date string.
///
/// Returns 0 when the string does not have that shape.
pub fn extract_founded_year(date: &str) -> i32 {
    FOUNDED_DATE_RE
        .captures(date.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|year| year.as_str().parse().ok())
        .unwrap_or(0)
}

/// Map a registry record into the dashboard view model. Never fails.
pub fn map_corporation(wire: &CorporationWire) -> Corporation {
    Corporation {
        id: wire.corp_id.clone(),
        name: wire.corp_name.clone(),
        name_en: non_empty(wire.corp_name_en.as_deref()).map(str::to_string),
        business_number: non_empty(wire.biz_no.as_deref()).map(str::to_string),
        registration_number: non_empty(wire.corp_reg_no.as_deref()).map(str::to_string),
        ceo_name: non_empty(wire.ceo_name.as_deref()).map(str::to_string),
        industry: resolve_industry(wire),
        industry_code: non_empty(wire.industry_code.as_deref()).map(str::to_string),
        founded_year: wire
            .founded_date
            .as_deref()
            .map(extract_founded_year)
            .unwrap_or(0),
        headquarters: non_empty(wire.hq_address.as_deref())
            .or_else(|| non_empty(wire.address.as_deref()))
            .unwrap_or_default()
            .to_string(),
        is_corporation: wire.is_corporation.unwrap_or(true),
        executives: Vec::new(),
        shareholders: Vec::new(),
        snapshots: Vec::new(),
    }
}

/// Business item if present, else the looked-up code name, else the raw code.
fn resolve_industry(wire: &CorporationWire) -> String {
    if let Some(item) = non_empty(wire.biz_item.as_deref()) {
        return item.to_string();
    }
    match non_empty(wire.industry_code.as_deref()) {
        Some(code) => industry_name(code).unwrap_or(code).to_string(),
        None => String::new(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn wire() -> CorporationWire {
        CorporationWire {
            corp_id: "corp-001".into(),
            corp_name: "Acme Electronics".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_founded_year_extraction() {
        assert_eq!(extract_founded_year("1998-04-01"), 1998);
        assert_eq!(extract_founded_year("2011-12-31T00:00:00Z"), 2011);
        assert_eq!(extract_founded_year("1998"), 0);
        assert_eq!(extract_founded_year("98-04-01"), 0);
        assert_eq!(extract_founded_year("April 1998"), 0);
        assert_eq!(extract_founded_year(""), 0);
    }

    #[test]
    fn test_minimal_record_defaults() {
        let corp = map_corporation(&wire());
        assert_eq!(corp.founded_year, 0);
        assert_eq!(corp.industry, "");
        assert_eq!(corp.headquarters, "");
        assert!(corp.is_corporation);
        assert!(corp.executives.is_empty());
        assert!(corp.shareholders.is_empty());
        assert!(corp.snapshots.is_empty());
    }

    #[test]
    fn test_null_wire_fields_degrade_to_defaults() {
        let wire: CorporationWire = serde_json::from_str(
            r#"{"corp_id": "c1", "corp_name": null, "founded_date": null,
                "hq_address": null, "is_corporation": null}"#,
        )
        .unwrap();
        let corp = map_corporation(&wire);
        assert_eq!(corp.name, "");
        assert_eq!(corp.founded_year, 0);
        assert_eq!(corp.headquarters, "");
        assert!(corp.is_corporation);
    }

    #[test]
    fn test_industry_prefers_business_item() {
        let corp = map_corporation(&CorporationWire {
            biz_item: Some("Semiconductor test equipment".into()),
            industry_code: Some("C26".into()),
            ..wire()
        });
        assert_eq!(corp.industry, "Semiconductor test equipment");
        assert_eq!(corp.industry_code.as_deref(), Some("C26"));
    }

    #[test]
    fn test_industry_from_code_lookup() {
        let corp = map_corporation(&CorporationWire {
            biz_item: Some("  ".into()),
            industry_code: Some("J62".into()),
            ..wire()
        });
        assert_eq!(corp.industry, "Software Development and IT Services");
    }

    #[test]
    fn test_industry_unknown_code_kept() {
        let corp = map_corporation(&CorporationWire {
            industry_code: Some("Z99".into()),
            ..wire()
        });
        assert_eq!(corp.industry, "Z99");
    }

    #[test]
    fn test_headquarters_precedence() {
        let both = map_corporation(&CorporationWire {
            hq_address: Some("Seoul HQ".into()),
            address: Some("Registered office".into()),
            ..wire()
        });
        assert_eq!(both.headquarters, "Seoul HQ");

        let fallback = map_corporation(&CorporationWire {
            hq_address: Some("".into()),
            address: Some("Registered office".into()),
            ..wire()
        });
        assert_eq!(fallback.headquarters, "Registered office");
    }

    #[test]
    fn test_explicit_non_corporation() {
        let corp = map_corporation(&CorporationWire {
            is_corporation: Some(false),
            ..wire()
        });
        assert!(!corp.is_corporation);
    }

    proptest! {
        #[test]
        fn well_formed_dates_yield_year(year in 1000i32..=9999, month in 1u32..=12, day in 1u32..=28) {
            let date = format!("{year:04}-{month:02}-{day:02}");
            prop_assert_eq!(extract_founded_year(&date), year);
        }

        #[test]
        fn dates_without_shape_yield_zero(s in "[^0-9]*") {
            prop_assert_eq!(extract_founded_year(&s), 0);
        }
    }
}
