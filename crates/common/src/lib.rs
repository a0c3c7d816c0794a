//! Pressroom Common Library
//!
//! Shared code for the Pressroom content API including:
//! - Entity models and schema bootstrap
//! - Data access objects and transactional services
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities
//! - Media upload storage
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod dao;
pub mod db;
pub mod errors;
pub mod media;
pub mod metrics;
pub mod services;
pub mod slug;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::DbPool;
pub use errors::{AppError, Result};
pub use media::MediaStore;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
