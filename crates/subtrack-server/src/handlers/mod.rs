//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod auth;
pub mod health;
pub mod settings;
pub mod subscriptions;

// Re-export all handlers for use in router
pub use analytics::*;
pub use auth::*;
pub use health::*;
pub use settings::*;
pub use subscriptions::*;
