//! # config-utils
//!
//! Developer configuration utilities written in Rust.
//!
//! ## Features
//!
//! - Set operations (union, intersect, diff, rdiff, symdiff) on YAML files,
//!   flattened to a configurable depth and compared by key or by key and value
//! - Environment variable capture to YAML
//!
//! ## Quick Start
//!
//! ```rust
//! use config_utils::setops::{perform_set_operation, SetOpConfig, SetOperation};
//!
//! let a: serde_yaml::Mapping = serde_yaml::from_str("database: postgres\nport: 5432").unwrap();
//! let b: serde_yaml::Mapping = serde_yaml::from_str("database: postgres\nport: 3306").unwrap();
//! let both = perform_set_operation(&a, &b, SetOperation::Intersect, &SetOpConfig::default()).unwrap();
//! assert_eq!(both.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod data;
pub mod setops;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of config-utils.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
