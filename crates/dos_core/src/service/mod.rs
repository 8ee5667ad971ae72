//! Use-case services behind the dashboard screens.
//!
//! # Responsibility
//! - Orchestrate backend calls into screen-level state and actions.
//! - Turn remote failures into transient notices for the shell.
//!
//! # Invariants
//! - Services never roll back optimistic local state.
//! - Every remote failure is both returned (or logged) and noticed.

pub mod admin;
pub mod calendar;
pub mod notice;
pub mod notifications;
pub mod project_schema;
pub mod project_wizard;
pub mod task_seed;
pub mod task_sync;
