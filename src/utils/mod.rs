//! Utility functions and helpers.

pub mod settings;

pub use settings::{SetOperationDefaults, Settings, SETTINGS_PATH_ENV};
