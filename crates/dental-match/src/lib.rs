//! Core engine for a marketplace connecting dental professionals with clinics.
//!
//! The library owns the pieces with real invariants: candidate scoring,
//! monthly candidacy gating, the registrant approval workflow, and contract
//! issuance with paired rating tokens. Persistence and notification delivery
//! stay behind traits so deployments can bring their own adapters.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
