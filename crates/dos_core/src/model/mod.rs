//! Domain records shared by services, stores and the export pipeline.
//!
//! # Responsibility
//! - Define the row shapes exchanged with the hosted backend.
//! - Hold pure derivations over those rows (task stats, upcoming view).
//!
//! # Invariants
//! - Every persisted record is identified by a stable `Uuid`.
//! - Timestamps are Unix epoch milliseconds.

pub mod account;
pub mod calendar;
pub mod catalog;
pub mod clock;
pub mod notification;
pub mod project;
pub mod task;
