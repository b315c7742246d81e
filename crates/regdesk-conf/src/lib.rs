//! # regdesk configuration
//!
//! Layered settings for the registration dashboard.
//!
//! ## Features
//!
//! - **Multiple configuration sources**: built-in defaults, a TOML file, and
//!   environment variables, merged by priority
//! - **Type-safe settings**: one [`Settings`] struct per section with serde
//!   defaults for every field
//! - **Validation**: URLs, time zones, date-time patterns, and limits are
//!   checked before the settings are handed out
//!
//! ## Quick Start
//!
//! ```rust
//! use regdesk_conf::settings::SettingsBuilder;
//! use regdesk_conf::settings::sources::DefaultSource;
//! use serde_json::json;
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(DefaultSource::new().with_value("api", json!({"base_url": "https://fest.example.org/api"})))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.api.base_url, "https://fest.example.org/api");
//! assert_eq!(settings.table.summary_limit, 8);
//! ```
//!
//! ## Module Organization
//!
//! - [`settings`]: settings structs, the builder, sources, and validation

#![warn(missing_docs)]

pub mod settings;

// Re-export commonly used types at the crate root for convenience
pub use settings::{Settings, SettingsBuilder, SettingsError};
