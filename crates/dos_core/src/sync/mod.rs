//! Realtime change feed and session propagation.
//!
//! # Responsibility
//! - Deliver backend row changes to the services that hold local copies.
//! - Broadcast sign-in/sign-out to every interested consumer.

pub mod change_feed;
pub mod session;
