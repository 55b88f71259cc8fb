//! HTTP client for the KYC backend REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use kyc_types::{
    CorporationSnapshot, CorporationWire, DashboardSummary, JobStatus, JobTriggerRequest,
    JobTriggerResponse, ListParams, Page, SignalDismissal, SignalFilter, SignalStats,
    SignalStatusUpdate, SignalWire, WireSignalStatus,
};

use crate::{ApiError, KycApi, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// reqwest-backed [`KycApi`] implementation
#[derive(Clone)]
pub struct HttpKycApi {
    http: Client,
    base_url: Url,
}

impl HttpKycApi {
    /// Create a client with the default request timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments. Segments are
    /// percent-encoded, so ids containing `/` cannot escape the resource.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        tracing::debug!(path, "KYC API request");

        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(path, status = status.as_u16(), "KYC API returned error status");
            return Err(ApiError::status(path, status.as_u16(), &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                path: path.to_string(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let path = segments.join("/");
        self.send(&path, self.http.get(url)).await
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        let path = segments.join("/");
        self.send(&path, self.http.get(url).query(query)).await
    }

    async fn write<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        let path = segments.join("/");
        self.send(&path, self.http.request(method, url).json(body))
            .await
    }
}

/// Parse and normalise the base URL so that joining always appends.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|_| ApiError::InvalidUrl(raw.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl KycApi for HttpKycApi {
    async fn list_corporations(&self, params: &ListParams) -> Result<Page<CorporationWire>> {
        self.get_with_query(&["corporations"], params).await
    }

    async fn get_corporation(&self, corp_id: &str) -> Result<CorporationWire> {
        self.get(&["corporations", corp_id]).await
    }

    async fn get_corporation_snapshot(&self, corp_id: &str) -> Result<CorporationSnapshot> {
        self.get(&["corporations", corp_id, "snapshot", "latest"])
            .await
    }

    async fn list_signals(&self, filter: &SignalFilter) -> Result<Page<SignalWire>> {
        self.get_with_query(&["signals"], filter).await
    }

    async fn get_signal(&self, signal_id: &str) -> Result<SignalWire> {
        self.get(&["signals", signal_id]).await
    }

    async fn get_signal_stats(&self) -> Result<SignalStats> {
        self.get(&["signals", "stats"]).await
    }

    async fn update_signal_status(
        &self,
        signal_id: &str,
        status: WireSignalStatus,
    ) -> Result<SignalWire> {
        self.write(
            Method::PATCH,
            &["signals", signal_id, "status"],
            &SignalStatusUpdate { status },
        )
        .await
    }

    async fn dismiss_signal(&self, signal_id: &str, reason: &str) -> Result<SignalWire> {
        self.write(
            Method::POST,
            &["signals", signal_id, "dismiss"],
            &SignalDismissal {
                reason: reason.to_string(),
            },
        )
        .await
    }

    async fn get_dashboard_summary(&self) -> Result<DashboardSummary> {
        self.get(&["dashboard", "summary"]).await
    }

    async fn trigger_analysis_job(&self, corp_id: &str) -> Result<JobTriggerResponse> {
        self.write(
            Method::POST,
            &["jobs", "analyze", "run"],
            &JobTriggerRequest {
                corp_id: corp_id.to_string(),
            },
        )
        .await
    }

    async fn get_job_status(&self, job_id: &str) -> Result<JobStatus> {
        self.get(&["jobs", job_id]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let api = HttpKycApi::new("http://localhost:8000/api/v1").unwrap();
        assert_eq!(api.base_url().as_str(), "http://localhost:8000/api/v1/");
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let api = HttpKycApi::new("http://localhost:8000/api/v1/").unwrap();
        let url = api.endpoint(&["signals", "sig-1", "status"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/signals/sig-1/status");
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let api = HttpKycApi::new("http://localhost:8000/api/v1").unwrap();
        let url = api.endpoint(&["corporations", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/corporations/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            HttpKycApi::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpKycApi::new("mailto:ops@example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
