//! Configuration module for the page analyzer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing values fall back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use page_analyzer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("page-analyzer.toml")).unwrap();
//! println!("Probing up to {} links at once", config.analyzer.max_concurrent_probes);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnalyzerConfig, Config, HttpConfig, StorageConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
