//! Flutter-facing bindings over `dos_core`.

pub mod api;
