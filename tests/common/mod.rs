//! In-memory backend shared by the integration tests.
//!
//! `FakeApi` implements `KycApi` over plain vectors, counts every call per
//! endpoint and can replay a scripted sequence of job states.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kyc_client::{ApiError, KycApi, Result};
use kyc_dashboard::{Dashboard, FreshnessConfig, QueryClient};
use kyc_types::{
    CorporationSnapshot, CorporationWire, DashboardSummary, JobStatus, JobTriggerResponse,
    ListParams, Page, SignalFilter, SignalStats, SignalWire, WireSignalStatus,
};

/// One scripted answer of `get_job_status`
#[derive(Debug, Clone)]
pub enum JobStep {
    Status(&'static str),
    Fail(u16),
}

#[derive(Default)]
pub struct FakeApi {
    corporations: Mutex<Vec<CorporationWire>>,
    signals: Mutex<Vec<SignalWire>>,
    job_script: Mutex<VecDeque<JobStep>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    delay: Duration,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read waits this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_corporations(self, corporations: Vec<CorporationWire>) -> Self {
        *self.corporations.lock().unwrap() = corporations;
        self
    }

    pub fn with_signals(self, signals: Vec<SignalWire>) -> Self {
        *self.signals.lock().unwrap() = signals;
        self
    }

    /// Job states returned in order. The last step repeats.
    pub fn with_job_script(self, steps: Vec<JobStep>) -> Self {
        *self.job_script.lock().unwrap() = steps.into();
        self
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(endpoint)
            .copied()
            .unwrap_or(0)
    }

    async fn record(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn find_signal(&self, signal_id: &str) -> Result<SignalWire> {
        self.signals
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.signal_id == signal_id)
            .cloned()
            .ok_or_else(|| not_found(&format!("signals/{signal_id}")))
    }

    fn set_status(&self, signal_id: &str, status: WireSignalStatus) -> Result<SignalWire> {
        let mut signals = self.signals.lock().unwrap();
        let signal = signals
            .iter_mut()
            .find(|s| s.signal_id == signal_id)
            .ok_or_else(|| not_found(&format!("signals/{signal_id}")))?;
        signal.signal_status = Some(status.as_str().to_string());
        Ok(signal.clone())
    }
}

fn not_found(path: &str) -> ApiError {
    ApiError::status(path, 404, r#"{"detail":"Not found"}"#)
}

#[async_trait]
impl KycApi for FakeApi {
    async fn list_corporations(&self, params: &ListParams) -> Result<Page<CorporationWire>> {
        self.record("list_corporations").await;
        let all = self.corporations.lock().unwrap().clone();
        let total = all.len() as u64;
        let offset = params.offset.unwrap_or(0) as usize;
        let limit = params.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(Page {
            items: all.into_iter().skip(offset).take(limit).collect(),
            total,
        })
    }

    async fn get_corporation(&self, corp_id: &str) -> Result<CorporationWire> {
        self.record("get_corporation").await;
        self.corporations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.corp_id == corp_id)
            .cloned()
            .ok_or_else(|| not_found(&format!("corporations/{corp_id}")))
    }

    async fn get_corporation_snapshot(&self, corp_id: &str) -> Result<CorporationSnapshot> {
        self.record("get_corporation_snapshot").await;
        let version = self.calls("get_corporation_snapshot") as u32;
        Ok(CorporationSnapshot {
            snapshot_id: format!("snap-{corp_id}-{version}"),
            corp_id: corp_id.to_string(),
            snapshot_version: Some(version),
            created_at: None,
            snapshot_json: serde_json::json!({ "corp_id": corp_id }),
        })
    }

    async fn list_signals(&self, filter: &SignalFilter) -> Result<Page<SignalWire>> {
        self.record("list_signals").await;
        let items: Vec<SignalWire> = self
            .signals
            .lock()
            .unwrap()
            .iter()
            .filter(|s| match filter.status {
                Some(status) => s.signal_status.as_deref().unwrap_or("NEW") == status.as_str(),
                None => true,
            })
            .filter(|s| filter.corp_id.as_ref().map_or(true, |id| &s.corp_id == id))
            .cloned()
            .collect();
        Ok(Page {
            total: items.len() as u64,
            items,
        })
    }

    async fn get_signal(&self, signal_id: &str) -> Result<SignalWire> {
        self.record("get_signal").await;
        self.find_signal(signal_id)
    }

    async fn get_signal_stats(&self) -> Result<SignalStats> {
        self.record("get_signal_stats").await;
        let signals = self.signals.lock().unwrap();
        let mut stats = SignalStats {
            total: signals.len() as u64,
            ..Default::default()
        };
        for signal in signals.iter() {
            let status = signal.signal_status.clone().unwrap_or_else(|| "NEW".into());
            *stats.by_status.entry(status).or_default() += 1;
        }
        Ok(stats)
    }

    async fn update_signal_status(
        &self,
        signal_id: &str,
        status: WireSignalStatus,
    ) -> Result<SignalWire> {
        self.record("update_signal_status").await;
        self.set_status(signal_id, status)
    }

    async fn dismiss_signal(&self, signal_id: &str, _reason: &str) -> Result<SignalWire> {
        self.record("dismiss_signal").await;
        self.set_status(signal_id, WireSignalStatus::Dismissed)
    }

    async fn get_dashboard_summary(&self) -> Result<DashboardSummary> {
        self.record("get_dashboard_summary").await;
        let signals = self.signals.lock().unwrap();
        Ok(DashboardSummary {
            total_corporations: self.corporations.lock().unwrap().len() as u64,
            total_signals: signals.len() as u64,
            new_signals: signals
                .iter()
                .filter(|s| s.signal_status.as_deref().unwrap_or("NEW") == "NEW")
                .count() as u64,
            ..Default::default()
        })
    }

    async fn trigger_analysis_job(&self, corp_id: &str) -> Result<JobTriggerResponse> {
        self.record("trigger_analysis_job").await;
        Ok(JobTriggerResponse {
            job_id: format!("job-{corp_id}"),
            status: "QUEUED".to_string(),
        })
    }

    async fn get_job_status(&self, job_id: &str) -> Result<JobStatus> {
        self.record("get_job_status").await;
        let step = {
            let mut script = self.job_script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };
        match step.unwrap_or(JobStep::Status("QUEUED")) {
            JobStep::Status(status) => Ok(JobStatus {
                job_id: job_id.to_string(),
                status: status.to_string(),
                corp_id: job_id.strip_prefix("job-").map(str::to_string),
                ..Default::default()
            }),
            JobStep::Fail(code) => Err(ApiError::status(
                format!("jobs/{job_id}"),
                code,
                "unavailable",
            )),
        }
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn corporation(corp_id: &str, name: &str) -> CorporationWire {
    CorporationWire {
        corp_id: corp_id.to_string(),
        corp_name: name.to_string(),
        ..Default::default()
    }
}

pub fn signal(signal_id: &str, corp_id: &str) -> SignalWire {
    SignalWire {
        signal_id: signal_id.to_string(),
        corp_id: corp_id.to_string(),
        signal_type: "DIRECT".to_string(),
        event_type: "OVERDUE_FLAG_ON".to_string(),
        impact_direction: "RISK".to_string(),
        impact_strength: "HIGH".to_string(),
        confidence: Some(0.9),
        ..Default::default()
    }
}

/// Dashboard over a shared fake with default freshness windows
pub fn dashboard(api: Arc<FakeApi>) -> Dashboard {
    Dashboard::new(api, QueryClient::new(), FreshnessConfig::default())
}
