//! Fixed reference data shown by the list views.
//!
//! Everything here is compiled in; nothing reads storage.

pub mod admin_steps;
pub mod financing;
pub mod legal_status;
pub mod resources;
pub mod sectors;

pub use admin_steps::{admin_steps, AdminStepTracker};
pub use financing::{filter_aids, financing_aids, paris_incubators, FinancingFilter};
pub use legal_status::{comparison_rows, legal_status, legal_statuses, ComparisonRow};
pub use resources::{categories, filter_resources, resources, ResourceFavorites};
pub use sectors::SECTORS;
