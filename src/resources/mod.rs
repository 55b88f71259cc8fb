//! Typed resource accessors
//!
//! Each read binds a parameter-inclusive query key to a fetch-and-map
//! function and a freshness window. Each mutation performs the remote write
//! and then invalidates every cache family it affects, so the next read
//! refetches instead of patching cached data locally.
//!
//! | Mutation | Invalidates |
//! |----------|-------------|
//! | `update_signal_status` | signals lists, signal detail, signal stats, dashboard summary |
//! | `dismiss_signal` | signals lists, signal detail, signal stats, dashboard summary |
//! | `trigger_analysis` | jobs, corporation snapshot |
//! | job succeeded (poller) | signals lists, signal stats, dashboard summary, corporation snapshot |

pub mod keys;

use std::sync::Arc;

use kyc_client::{HttpKycApi, KycApi};
use kyc_types::{
    Corporation, CorporationSnapshot, DashboardSummary, JobStatus, JobTriggerResponse, ListParams,
    Signal, SignalFilter, SignalStats, SignalStatus,
};
use tracing::info;

use crate::config::{DashboardConfig, FreshnessConfig};
use crate::error::{DashboardError, Result};
use crate::mapper;
use crate::query::{QueryClient, QueryResult};

/// Entry point for dashboard data: the API, the query cache and the
/// freshness policy. Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct Dashboard {
    api: Arc<dyn KycApi>,
    queries: QueryClient,
    freshness: FreshnessConfig,
}

impl Dashboard {
    pub fn new(api: Arc<dyn KycApi>, queries: QueryClient, freshness: FreshnessConfig) -> Self {
        Self {
            api,
            queries,
            freshness,
        }
    }

    /// HTTP-backed dashboard with a fresh query cache
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let api = HttpKycApi::with_timeout(&config.api.base_url, config.api.timeout())?;
        Ok(Self::new(
            Arc::new(api),
            QueryClient::new(),
            config.freshness.clone(),
        ))
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn api(&self) -> &Arc<dyn KycApi> {
        &self.api
    }

    // =========================================================================
    // Corporations
    // =========================================================================

    pub async fn corporations(
        &self,
        params: ListParams,
    ) -> Result<QueryResult<Vec<Corporation>>> {
        let api = Arc::clone(&self.api);
        self.queries
            .query(
                keys::corporations(&params),
                self.freshness.corporations(),
                move || async move {
                    let page = api.list_corporations(&params).await?;
                    Ok::<_, DashboardError>(mapper::map_corporations(&page))
                },
            )
            .await
    }

    pub async fn corporation(&self, corp_id: &str) -> Result<QueryResult<Corporation>> {
        let api = Arc::clone(&self.api);
        let id = corp_id.to_string();
        self.queries
            .query(
                keys::corporation(corp_id),
                self.freshness.corporations(),
                move || async move {
                    let wire = api.get_corporation(&id).await?;
                    Ok::<_, DashboardError>(mapper::map_corporation(&wire))
                },
            )
            .await
    }

    pub async fn corporation_snapshot(
        &self,
        corp_id: &str,
    ) -> Result<QueryResult<CorporationSnapshot>> {
        let api = Arc::clone(&self.api);
        let id = corp_id.to_string();
        self.queries
            .query(
                keys::corporation_snapshot(corp_id),
                self.freshness.snapshot(),
                move || async move {
                    let snapshot = api.get_corporation_snapshot(&id).await?;
                    Ok::<_, DashboardError>(snapshot)
                },
            )
            .await
    }

    // =========================================================================
    // Signals
    // =========================================================================

    pub async fn signals(&self, filter: SignalFilter) -> Result<QueryResult<Vec<Signal>>> {
        let api = Arc::clone(&self.api);
        self.queries
            .query(
                keys::signals(&filter),
                self.freshness.signals(),
                move || async move {
                    let page = api.list_signals(&filter).await?;
                    Ok::<_, DashboardError>(mapper::map_signals(&page))
                },
            )
            .await
    }

    pub async fn signal(&self, signal_id: &str) -> Result<QueryResult<Signal>> {
        let api = Arc::clone(&self.api);
        let id = signal_id.to_string();
        self.queries
            .query(
                keys::signal(signal_id),
                self.freshness.signals(),
                move || async move {
                    let wire = api.get_signal(&id).await?;
                    Ok::<_, DashboardError>(mapper::map_signal(&wire))
                },
            )
            .await
    }

    pub async fn signal_stats(&self) -> Result<QueryResult<SignalStats>> {
        let api = Arc::clone(&self.api);
        self.queries
            .query(
                keys::signal_stats(),
                self.freshness.signals(),
                move || async move {
                    let stats = api.get_signal_stats().await?;
                    Ok::<_, DashboardError>(stats)
                },
            )
            .await
    }

    pub async fn update_signal_status(
        &self,
        signal_id: &str,
        status: SignalStatus,
    ) -> Result<Signal> {
        let wire = self
            .api
            .update_signal_status(signal_id, mapper::signal_status_to_wire(status))
            .await?;
        info!(signal_id, status = %status, "Signal status updated");

        self.invalidate_signal(signal_id).await;
        Ok(mapper::map_signal(&wire))
    }

    pub async fn dismiss_signal(&self, signal_id: &str, reason: &str) -> Result<Signal> {
        let wire = self.api.dismiss_signal(signal_id, reason).await?;
        info!(signal_id, "Signal dismissed");

        self.invalidate_signal(signal_id).await;
        Ok(mapper::map_signal(&wire))
    }

    async fn invalidate_signal(&self, signal_id: &str) {
        self.queries.invalidate(&keys::all_signals()).await;
        self.queries.invalidate(&keys::signal(signal_id)).await;
        self.queries.invalidate(&keys::signal_stats()).await;
        self.queries.invalidate(&keys::dashboard_summary()).await;
    }

    // =========================================================================
    // Dashboard / jobs
    // =========================================================================

    pub async fn dashboard_summary(&self) -> Result<QueryResult<DashboardSummary>> {
        let api = Arc::clone(&self.api);
        self.queries
            .query(
                keys::dashboard_summary(),
                self.freshness.dashboard(),
                move || async move {
                    let summary = api.get_dashboard_summary().await?;
                    Ok::<_, DashboardError>(summary)
                },
            )
            .await
    }

    /// Queue an analysis job for a corporation
    pub async fn trigger_analysis(&self, corp_id: &str) -> Result<JobTriggerResponse> {
        let response = self.api.trigger_analysis_job(corp_id).await?;
        info!(corp_id, job_id = %response.job_id, "Analysis job triggered");

        self.queries.invalidate(&keys::all_jobs()).await;
        self.queries
            .invalidate(&keys::corporation_snapshot(corp_id))
            .await;
        Ok(response)
    }

    /// Current job status. Always a fresh request (concurrent callers still
    /// share one).
    pub async fn job_status(&self, job_id: &str) -> Result<Arc<JobStatus>> {
        let api = Arc::clone(&self.api);
        let id = job_id.to_string();
        self.queries
            .fetch_query(keys::job(job_id), self.freshness.job(), move || async move {
                Ok::<_, DashboardError>(api.get_job_status(&id).await?)
            })
            .await
    }

    /// A finished analysis produces new signals and a new snapshot.
    pub(crate) async fn on_job_succeeded(&self, corp_id: Option<&str>) {
        self.queries.invalidate(&keys::all_signals()).await;
        self.queries.invalidate(&keys::signal_stats()).await;
        self.queries.invalidate(&keys::dashboard_summary()).await;
        if let Some(corp_id) = corp_id {
            self.queries
                .invalidate(&keys::corporation_snapshot(corp_id))
                .await;
        }
    }
}
