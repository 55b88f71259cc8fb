//! Wire format - JSON shapes returned by the backend API, pre-mapping.
//!
//! Field names follow the backend (snake_case). Anything the backend may
//! omit is optional and defaulted so that a sparse record still decodes.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ============================================================================
// PAGINATION
// ============================================================================

/// List envelope used by every collection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Paging parameters for corporation listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

// ============================================================================
// CORPORATIONS
// ============================================================================

/// Raw corporate registry record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorporationWire {
    pub corp_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub corp_name: String,
    #[serde(default)]
    pub corp_name_en: Option<String>,
    /// Business registration number
    #[serde(default)]
    pub biz_no: Option<String>,
    /// Corporate registration number
    #[serde(default)]
    pub corp_reg_no: Option<String>,
    #[serde(default)]
    pub ceo_name: Option<String>,
    /// Standard industry classification code
    #[serde(default)]
    pub industry_code: Option<String>,
    /// Free-text business item as registered
    #[serde(default)]
    pub biz_item: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub hq_address: Option<String>,
    /// Founding date, expected as `YYYY-MM-DD`
    #[serde(default)]
    pub founded_date: Option<String>,
    #[serde(default)]
    pub is_corporation: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Latest KYC snapshot for a corporation.
///
/// The snapshot body is backend-defined and kept as raw JSON; consumers
/// usually hand it to the drill-down renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporationSnapshot {
    pub snapshot_id: String,
    pub corp_id: String,
    #[serde(default)]
    pub snapshot_version: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub snapshot_json: serde_json::Value,
}

// ============================================================================
// SIGNALS
// ============================================================================

/// Raw signal event record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalWire {
    pub signal_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub corp_id: String,
    #[serde(default)]
    pub corp_name: Option<String>,
    /// DIRECT / INDUSTRY / ENVIRONMENT
    #[serde(default, deserialize_with = "null_as_default")]
    pub signal_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_type: String,
    /// RISK / OPPORTUNITY / NEUTRAL
    #[serde(default, deserialize_with = "null_as_default")]
    pub impact_direction: String,
    /// HIGH / MED / LOW
    #[serde(default, deserialize_with = "null_as_default")]
    pub impact_strength: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub evidence_count: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// NEW / REVIEWED / DISMISSED, null when never triaged
    #[serde(default)]
    pub signal_status: Option<String>,
    #[serde(default)]
    pub detected_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Signal triage status as the backend spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireSignalStatus {
    New,
    Reviewed,
    Dismissed,
}

impl WireSignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Reviewed => "REVIEWED",
            Self::Dismissed => "DISMISSED",
        }
    }
}

/// Query parameters for signal listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WireSignalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Body of `PATCH signals/{id}/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalStatusUpdate {
    pub status: WireSignalStatus,
}

/// Body of `POST signals/{id}/dismiss`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDismissal {
    pub reason: String,
}

/// Aggregate signal counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub by_type: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub by_impact: BTreeMap<String, u64>,
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// Headline numbers for the dashboard landing view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_corporations: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_signals: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new_signals: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_signals: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub opportunity_signals: u64,
    #[serde(default)]
    pub generated_at: Option<String>,
    /// Extra fields from server that we keep for drill-down
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ============================================================================
// ANALYSIS JOBS
// ============================================================================

/// Body of `POST jobs/analyze/run`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTriggerRequest {
    pub corp_id: String,
}

/// Response after triggering an analysis job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTriggerResponse {
    pub job_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// Current state of an analysis job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: String,
    /// QUEUED / RUNNING / SUCCEEDED / FAILED / CANCELLED
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub corp_id: Option<String>,
    /// 0.0 - 1.0 when reported
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub queued_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sparse_signal_decodes() {
        let json = r#"{"signal_id": "sig-1"}"#;
        let wire: SignalWire = serde_json::from_str(json).unwrap();
        assert_eq!(wire.signal_id, "sig-1");
        assert_eq!(wire.signal_status, None);
        assert_eq!(wire.signal_type, "");
    }

    #[test]
    fn test_null_signal_status_decodes() {
        let json = r#"{"signal_id": "sig-1", "signal_status": null}"#;
        let wire: SignalWire = serde_json::from_str(json).unwrap();
        assert_eq!(wire.signal_status, None);
    }

    #[test]
    fn test_null_strings_decode_as_empty() {
        let json = r#"{
            "signal_id": "sig-1",
            "corp_id": null,
            "signal_type": "DIRECT",
            "event_type": null,
            "impact_direction": "RISK",
            "impact_strength": null
        }"#;
        let wire: SignalWire = serde_json::from_str(json).unwrap();
        assert_eq!(wire.impact_strength, "");
        assert_eq!(wire.event_type, "");
        assert_eq!(wire.corp_id, "");
        assert_eq!(wire.signal_type, "DIRECT");

        let corp: CorporationWire =
            serde_json::from_str(r#"{"corp_id": "c1", "corp_name": null}"#).unwrap();
        assert_eq!(corp.corp_name, "");
    }

    #[test]
    fn test_null_counts_decode_as_zero() {
        let json = r#"{"total": null, "by_status": null}"#;
        let stats: SignalStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total, 0);
        assert!(stats.by_status.is_empty());

        let page: Page<CorporationWire> =
            serde_json::from_str(r#"{"items": [], "total": null}"#).unwrap();
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_empty_page_decodes() {
        let page: Page<CorporationWire> = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_signal_filter_skips_unset_params() {
        let filter = SignalFilter {
            status: Some(WireSignalStatus::New),
            limit: Some(20),
            ..Default::default()
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json, serde_json::json!({"status": "NEW", "limit": 20}));
    }

    #[test]
    fn test_dashboard_summary_keeps_extra_fields() {
        let json = r#"{"total_signals": 4, "top_industry": "C26"}"#;
        let summary: DashboardSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_signals, 4);
        assert_eq!(
            summary.extra.get("top_industry"),
            Some(&serde_json::json!("C26"))
        );
    }
}
