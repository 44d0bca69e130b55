//! Business logic and reactive data layer between `fieldops-api` and
//! its consumers (CLI, resource server).
//!
//! This crate owns the domain model, the reactive store, and the command
//! pipeline for the fieldops workspace:
//!
//! - **[`Controller`]**: Central facade managing the full lifecycle:
//!   [`connect()`](Controller::connect) authenticates, fetches an initial
//!   data snapshot, then spawns background tasks for periodic refresh and
//!   command processing. [`Controller::oneshot()`] provides a lightweight
//!   connect-run-disconnect mode for single CLI invocations.
//!
//! - **[`DataStore`]**: Lock-free reactive storage (`DashMap` +
//!   `tokio::sync::watch` channels), one collection per backend table.
//!
//! - **[`Command`]**: Typed mutation requests routed through an `mpsc`
//!   channel to the controller's command processor. Mutations are keyed by
//!   record id: a second mutation for a record with one already in flight
//!   is rejected. Reads bypass the channel via `DataStore` snapshots.
//!
//! - **[`report`]**: Pure aggregation: status breakdowns, the six-month
//!   maintenance trend, and summary counters.
//!
//! - **[`export`]**: CSV rendering and the combined JSON report.

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod model;
pub mod report;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{AuthCredentials, BackendConfig, TlsVerification};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use store::DataStore;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alert,
    AlertKind,
    AlertStatus,
    Equipment,
    EquipmentKind,
    EquipmentStatus,
    Intervention,
    InterventionKind,
    InterventionStatus,
    Priority,
    Profile,
    Role,
    Severity,
    Site,
    SiteKind,
    SiteStatus,
};
