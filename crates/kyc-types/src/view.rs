//! View models - the shapes consumed by dashboard components, post-mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CORPORATION
// ============================================================================

/// Corporation as presented by the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corporation {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub business_number: Option<String>,
    pub registration_number: Option<String>,
    pub ceo_name: Option<String>,
    /// Business item if registered, else the resolved industry name
    pub industry: String,
    pub industry_code: Option<String>,
    /// 0 when the founding date is absent or malformed
    pub founded_year: i32,
    pub headquarters: String,
    pub is_corporation: bool,
    // Empty until the backend exposes these collections
    pub executives: Vec<Executive>,
    pub shareholders: Vec<Shareholder>,
    pub snapshots: Vec<SnapshotRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executive {
    pub name: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shareholder {
    pub name: String,
    pub ownership_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRef {
    pub snapshot_id: String,
    pub created_at: Option<String>,
}

// ============================================================================
// SIGNAL
// ============================================================================

/// Signal as presented by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: String,
    pub corporation_id: String,
    pub corporation_name: String,
    pub signal_category: SignalCategory,
    pub signal_sub_type: SignalSubType,
    pub event_type: String,
    pub impact: Impact,
    pub impact_strength: ImpactStrength,
    pub confidence: f64,
    pub evidence_count: u32,
    pub title: String,
    pub summary: String,
    pub status: SignalStatus,
    pub detected_at: Option<DateTime<Utc>>,
}

/// Lowercased wire `signal_type`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalCategory {
    Direct,
    Industry,
    Environment,
    /// Lowercased value the dashboard has no name for
    #[serde(untagged)]
    Unknown(String),
}

impl SignalCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Direct => "direct",
            Self::Industry => "industry",
            Self::Environment => "environment",
            Self::Unknown(s) => s,
        }
    }
}

/// Lowercased wire `impact_direction`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Risk,
    Opportunity,
    Neutral,
    #[serde(untagged)]
    Unknown(String),
}

impl Impact {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Risk => "risk",
            Self::Opportunity => "opportunity",
            Self::Neutral => "neutral",
            Self::Unknown(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactStrength {
    High,
    Medium,
    Low,
}

impl ImpactStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// UI sub-type derived from the wire event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSubType {
    Financial,
    Legal,
    Governance,
    Ownership,
    Regulatory,
    Industry,
    Macro,
    News,
}

impl SignalSubType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Legal => "legal",
            Self::Governance => "governance",
            Self::Ownership => "ownership",
            Self::Regulatory => "regulatory",
            Self::Industry => "industry",
            Self::Macro => "macro",
            Self::News => "news",
        }
    }
}

/// Triage status as the dashboard shows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    New,
    Review,
    Resolved,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Review => "review",
            Self::Resolved => "resolved",
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_as_str!(
    SignalCategory,
    Impact,
    ImpactStrength,
    SignalSubType,
    SignalStatus
);
