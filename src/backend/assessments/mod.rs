//! Assessments Module
//!
//! Career assessment results, learning progress and the per-user dashboard
//! summary.

pub mod handlers;

pub use handlers::{record_progress, save_assessment, user_data};
