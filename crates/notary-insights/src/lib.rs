//! Strategic insights for the notarization platform: stats aggregation over
//! users, documents and payments, advisory rules, and periodic activity
//! digests.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod insights;
pub mod scheduler;
pub mod stats;
pub mod telemetry;
