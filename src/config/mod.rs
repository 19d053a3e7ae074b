//! Configuration module for Shelf-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so `Config::default()` describes a complete crawl of
//! the public demo bookshop.
//!
//! # Example
//!
//! ```no_run
//! use shelf_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shelf.toml")).unwrap();
//! println!("Crawling from: {}", config.crawler.root_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_ROOT_URL};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, DEFAULT_CONFIG_HASH};
pub use validation::validate;
