//! Query keys per resource family.

use kyc_types::{ListParams, SignalFilter};

use crate::query::QueryKey;

pub const CORPORATIONS: &str = "corporations";
pub const CORPORATION: &str = "corporation";
pub const SNAPSHOT: &str = "corporation-snapshot";
pub const SIGNALS: &str = "signals";
pub const SIGNAL: &str = "signal";
pub const SIGNAL_STATS: &str = "signal-stats";
pub const DASHBOARD: &str = "dashboard-summary";
pub const JOBS: &str = "jobs";

pub fn corporations(params: &ListParams) -> QueryKey {
    QueryKey::new(CORPORATIONS)
        .param("limit", params.limit)
        .param("offset", params.offset)
}

pub fn corporation(corp_id: &str) -> QueryKey {
    QueryKey::new(CORPORATION).push(corp_id)
}

pub fn corporation_snapshot(corp_id: &str) -> QueryKey {
    QueryKey::new(SNAPSHOT).push(corp_id)
}

/// Every signal list variant
pub fn all_signals() -> QueryKey {
    QueryKey::new(SIGNALS)
}

pub fn signals(filter: &SignalFilter) -> QueryKey {
    all_signals()
        .param("status", filter.status.map(|s| s.as_str()))
        .param("corp_id", filter.corp_id.as_deref())
        .param("signal_type", filter.signal_type.as_deref())
        .param("limit", filter.limit)
        .param("offset", filter.offset)
}

pub fn signal(signal_id: &str) -> QueryKey {
    QueryKey::new(SIGNAL).push(signal_id)
}

pub fn signal_stats() -> QueryKey {
    QueryKey::new(SIGNAL_STATS)
}

pub fn dashboard_summary() -> QueryKey {
    QueryKey::new(DASHBOARD)
}

pub fn all_jobs() -> QueryKey {
    QueryKey::new(JOBS)
}

pub fn job(job_id: &str) -> QueryKey {
    all_jobs().push(job_id)
}
