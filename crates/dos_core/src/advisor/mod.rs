//! Decision helpers: legal-status quiz, social charges simulator and
//! business-plan forecast.
//!
//! Everything here is pure computation over static tables; no I/O.

pub mod charges;
pub mod forecast;
pub mod quiz;
