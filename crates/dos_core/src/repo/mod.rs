//! Backend collaborator contracts and the SQLite stand-in.
//!
//! # Responsibility
//! - Define one trait per backend concern (auth, tasks, projects,
//!   notifications, accounts) so services never see a concrete client.
//! - Ship `SqliteBackend`, a local implementation of every trait used by
//!   tests, the CLI smoke run and the FFI layer.
//! - Provide on-device key/value storage for UI state.
//!
//! # Invariants
//! - Every failure crossing this boundary is a `BackendError` (or
//!   `LocalStoreError` for on-device storage).
//! - Task, project and notification mutations publish change events.

pub mod account_repo;
pub mod backend_types;
pub mod local_store;
pub mod notification_repo;
pub mod project_repo;
pub mod sqlite_backend;
pub mod task_repo;
