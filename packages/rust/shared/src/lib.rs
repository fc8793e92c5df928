//! Shared types, error model, and configuration for ProfileScout.
//!
//! This crate is the foundation depended on by all other ProfileScout crates.
//! It provides:
//! - [`ProfileScoutError`]: the unified error type
//! - Domain types ([`RawPageSnapshot`], [`ProfileFragment`], [`CanonicalProfile`],
//!   [`Resolved`], [`ContactSet`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FetchBackend, FetchConfig, FetchSection, ServerConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{ProfileScoutError, Result};
pub use types::{
    CanonicalProfile, ContactSet, MAX_RECENT_CAPTIONS, MaybeEmpty, ProfileFragment,
    RawPageSnapshot, Resolved,
};
