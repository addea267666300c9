// ============================================================================
// coursebase Library
// ============================================================================

pub mod cli;
pub mod config;
pub mod core;
pub mod facade;
pub mod models;
pub mod storage;
pub mod web;

// Re-export main types for convenience
pub use config::AppConfig;
pub use core::{GatewayError, RecordId, ResourceKind, Result};
pub use facade::Database;
pub use models::{Category, Course, Enrollment, Lesson, Resource, Review, User};
pub use storage::DeletePolicy;
pub use web::{AppState, build_router};
