//! Signal wire → view mapping.

use chrono::{DateTime, NaiveDateTime, Utc};
use kyc_types::{
    Impact, ImpactStrength, Signal, SignalCategory, SignalStatus, SignalSubType, SignalWire,
    WireSignalStatus,
};

/// Event type → UI sub-type. Anything not listed is treated as news.
const EVENT_SUB_TYPES: &[(&str, SignalSubType)] = &[
    // Direct: financial
    ("OVERDUE_FLAG_ON", SignalSubType::Financial),
    ("OVERDUE_FLAG_OFF", SignalSubType::Financial),
    ("FINANCIAL_STATEMENT_UPDATE", SignalSubType::Financial),
    ("CREDIT_RATING_CHANGE", SignalSubType::Financial),
    ("LOAN_EXPOSURE_CHANGE", SignalSubType::Financial),
    ("COLLATERAL_CHANGE", SignalSubType::Financial),
    // Direct: legal / governance / ownership
    ("LITIGATION_FILED", SignalSubType::Legal),
    ("BANKRUPTCY_FILING", SignalSubType::Legal),
    ("CEO_CHANGED", SignalSubType::Governance),
    ("EXECUTIVE_CHANGED", SignalSubType::Governance),
    ("SHAREHOLDER_CHANGED", SignalSubType::Ownership),
    ("OWNERSHIP_STRUCTURE_CHANGE", SignalSubType::Ownership),
    // Regulatory
    ("SANCTION_LISTED", SignalSubType::Regulatory),
    ("REGULATORY_ACTION", SignalSubType::Regulatory),
    ("LICENSE_REVOKED", SignalSubType::Regulatory),
    // Industry / environment
    ("INDUSTRY_SHOCK", SignalSubType::Industry),
    ("SUPPLY_CHAIN_DISRUPTION", SignalSubType::Industry),
    ("POLICY_CHANGE", SignalSubType::Macro),
    // News
    ("NEWS_MENTION", SignalSubType::News),
];

/// Map a wire event type to the UI sub-type; unlisted types map to `News`.
pub fn get_sub_type_from_event_type(event_type: &str) -> SignalSubType {
    EVENT_SUB_TYPES
        .iter()
        .find(|(e, _)| *e == event_type)
        .map(|(_, sub)| *sub)
        .unwrap_or(SignalSubType::News)
}

/// `HIGH`/`MED`/`LOW` → high/medium/low; anything else is medium.
pub fn map_strength(strength: &str) -> ImpactStrength {
    match strength {
        "HIGH" => ImpactStrength::High,
        "LOW" => ImpactStrength::Low,
        _ => ImpactStrength::Medium,
    }
}

/// Wire triage status → view status. Null and unrecognized values are `New`.
pub fn map_signal_status(status: Option<&str>) -> SignalStatus {
    match status {
        Some("REVIEWED") => SignalStatus::Review,
        Some("DISMISSED") => SignalStatus::Resolved,
        _ => SignalStatus::New,
    }
}

/// View status → wire status for the status-update mutation.
pub fn signal_status_to_wire(status: SignalStatus) -> WireSignalStatus {
    match status {
        SignalStatus::New => WireSignalStatus::New,
        SignalStatus::Review => WireSignalStatus::Reviewed,
        SignalStatus::Resolved => WireSignalStatus::Dismissed,
    }
}

pub fn map_category(signal_type: &str) -> SignalCategory {
    match signal_type.trim().to_lowercase().as_str() {
        "direct" => SignalCategory::Direct,
        "industry" => SignalCategory::Industry,
        "environment" => SignalCategory::Environment,
        other => SignalCategory::Unknown(other.to_string()),
    }
}

pub fn map_impact(impact_direction: &str) -> Impact {
    match impact_direction.trim().to_lowercase().as_str() {
        "risk" => Impact::Risk,
        "opportunity" => Impact::Opportunity,
        "neutral" => Impact::Neutral,
        other => Impact::Unknown(other.to_string()),
    }
}

/// Map a signal record into the dashboard view model. Never fails.
pub fn map_signal(wire: &SignalWire) -> Signal {
    Signal {
        id: wire.signal_id.clone(),
        corporation_id: wire.corp_id.clone(),
        corporation_name: wire.corp_name.clone().unwrap_or_default(),
        signal_category: map_category(&wire.signal_type),
        signal_sub_type: get_sub_type_from_event_type(&wire.event_type),
        event_type: wire.event_type.clone(),
        impact: map_impact(&wire.impact_direction),
        impact_strength: map_strength(&wire.impact_strength),
        confidence: wire
            .confidence
            .filter(|c| c.is_finite())
            .unwrap_or(0.0),
        evidence_count: wire.evidence_count.unwrap_or(0),
        title: wire.title.clone().unwrap_or_default(),
        summary: wire.summary.clone().unwrap_or_default(),
        status: map_signal_status(wire.signal_status.as_deref()),
        detected_at: wire
            .detected_at
            .as_deref()
            .or(wire.created_at.as_deref())
            .and_then(parse_timestamp),
    }
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` timestamp read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
