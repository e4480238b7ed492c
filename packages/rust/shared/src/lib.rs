//! Shared types, error model, and configuration for founderlens.
//!
//! This crate is the foundation depended on by all other founderlens crates.
//! It provides:
//! - [`FounderLensError`]: the unified error type
//! - Domain types ([`CompanyRecord`], [`CompanyList`], [`ResultMapping`], [`RunSummary`])
//! - Configuration ([`AppConfig`], [`ScrapeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, OpenRouterConfig, ScrapeConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{FounderLensError, Result};
pub use types::{CompanyList, CompanyRecord, FounderList, ResultMapping, RunSummary};
