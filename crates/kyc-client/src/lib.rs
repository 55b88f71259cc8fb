//! KycApi trait: the sole API boundary between the dashboard core and the
//! backend. The dashboard depends on this trait, never on reqwest directly.

pub mod error;
pub mod http;

use async_trait::async_trait;
use kyc_types::{
    CorporationSnapshot, CorporationWire, DashboardSummary, JobStatus, JobTriggerResponse,
    ListParams, Page, SignalFilter, SignalStats, SignalWire, WireSignalStatus,
};

pub use error::ApiError;
pub use http::HttpKycApi;

pub type Result<T> = std::result::Result<T, ApiError>;

#[async_trait]
pub trait KycApi: Send + Sync {
    // ── Corporations ───────────────────────────────────────────

    async fn list_corporations(&self, params: &ListParams) -> Result<Page<CorporationWire>>;

    async fn get_corporation(&self, corp_id: &str) -> Result<CorporationWire>;

    /// Latest KYC snapshot for a corporation.
    async fn get_corporation_snapshot(&self, corp_id: &str) -> Result<CorporationSnapshot>;

    // ── Signals ────────────────────────────────────────────────

    async fn list_signals(&self, filter: &SignalFilter) -> Result<Page<SignalWire>>;

    async fn get_signal(&self, signal_id: &str) -> Result<SignalWire>;

    async fn get_signal_stats(&self) -> Result<SignalStats>;

    /// Set the triage status of a signal. Returns the updated record.
    async fn update_signal_status(
        &self,
        signal_id: &str,
        status: WireSignalStatus,
    ) -> Result<SignalWire>;

    /// Dismiss a signal with a free-text reason. Returns the updated record.
    async fn dismiss_signal(&self, signal_id: &str, reason: &str) -> Result<SignalWire>;

    // ── Dashboard / jobs ───────────────────────────────────────

    async fn get_dashboard_summary(&self) -> Result<DashboardSummary>;

    /// Queue an analysis job for a corporation.
    async fn trigger_analysis_job(&self, corp_id: &str) -> Result<JobTriggerResponse>;

    async fn get_job_status(&self, job_id: &str) -> Result<JobStatus>;
}
