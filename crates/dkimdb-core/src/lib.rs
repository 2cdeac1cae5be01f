//! Shared domain types and configuration for the DKIM archive uploader.

pub mod app_config;
pub mod config;
pub mod error;
pub mod pairs;
pub mod tsv;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use pairs::{DomainSelectorPair, PageResult};
pub use tsv::parse_domain_selector_tsv;
