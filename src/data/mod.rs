//! Data loading, capture, and serialization.

pub mod env;
pub mod yaml;

pub use env::{capture_env, capture_env_from, EnvSnapshot};
pub use yaml::*;
