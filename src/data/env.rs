//! Environment variable capture.

use std::collections::BTreeMap;
use std::ffi::OsString;

/// Captured environment variables, sorted by name.
pub type EnvSnapshot = BTreeMap<String, String>;

/// Captures the environment of the current process.
pub fn capture_env() -> EnvSnapshot {
    capture_env_from(std::env::vars_os())
}

/// Builds a snapshot from name/value pairs.
///
/// Names and values that are not valid UTF-8 are converted lossily.
pub fn capture_env_from<I>(vars: I) -> EnvSnapshot
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .map(|(name, value)| {
            (
                name.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect()
}
