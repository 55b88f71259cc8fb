//! KYC Dashboard - data core for the corporate signal-monitoring dashboard
//!
//! Fetches corporation and risk-signal data from the backend REST API,
//! maps wire records into view models, caches them per query key and
//! renders arbitrary payloads for drill-down inspection.
//!
//! ## Data flow
//! Backend JSON -> `KycApi` -> mapper -> `QueryClient` cache -> consumer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kyc_dashboard::{Dashboard, DashboardConfig, SignalFilter};
//!
//! # async fn run() -> kyc_dashboard::Result<()> {
//! let config = DashboardConfig::load()?;
//! let dashboard = Dashboard::from_config(&config)?;
//! let signals = dashboard.signals(SignalFilter::default()).await?;
//! println!("{} signals", signals.data.len());
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Configuration (YAML + env overrides)
pub mod config;

// Wire -> view mapping
pub mod mapper;

// Query cache with request coalescing
pub mod query;

// Typed reads and mutations over the API
pub mod resources;

// Analysis job polling
pub mod polling;

// Generic drill-down rendering
pub mod drilldown;

pub use config::{ApiConfig, DashboardConfig, FreshnessConfig, PollingConfig};
pub use error::{DashboardError, Result};
pub use polling::{JobOutcome, JobPhase, JobPollHandle, JobPoller, JobSnapshot};
pub use query::{QueryClient, QueryKey, QueryOptions, QueryResult, QueryStats};
pub use resources::Dashboard;

pub use drilldown::{DrillDownPanel, DrillValue, DrillView, ExportFormat};

// Shared types, re-exported for consumers
pub use kyc_client::{ApiError, HttpKycApi, KycApi};
pub use kyc_types::*;
