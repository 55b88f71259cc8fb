//! Shared API Types for the KYC signal dashboard
//!
//! This crate is the single source of truth for every type crossing the
//! backend HTTP boundary, plus the view models consumed by the dashboard.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐  JSON   ┌──────────────┐  map   ┌──────────────┐
//! │  Backend API     │ ──────► │  wire types  │ ─────► │  view types  │
//! └──────────────────┘         └──────────────┘        └──────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Wire types mirror the backend exactly (snake_case, optional fields)
//! 2. Every optional wire field is `#[serde(default)]` - missing data never
//!    fails deserialization
//! 3. View types are only ever produced by the mapper, never deserialized
//!    from the backend

pub mod view;
pub mod wire;

pub use view::*;
pub use wire::*;
