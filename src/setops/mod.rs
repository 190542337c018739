//! Set operations over YAML mappings.
//!
//! Both inputs are flattened to the configured depth, compared either by key
//! or by key and value, combined with one of the operations in
//! [`SetOperation`], and rebuilt into a nested mapping that holds the original
//! values of the surviving keys.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use tracing::debug;

pub mod error;
pub mod flatten;
pub mod hashable;

pub use error::SetOpError;
pub use flatten::{flatten, unflatten, FlatEntry, FlatMap, KeyPath};
pub use hashable::HashableValue;

/// How two flattened entries are matched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Entries match when their keys are equal.
    Keys,
    /// Entries match when both key and value are equal.
    #[default]
    Kv,
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareMode::Keys => write!(f, "keys"),
            CompareMode::Kv => write!(f, "kv"),
        }
    }
}

/// Which input file supplies the values of surviving keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The first file.
    First,
    /// The second file.
    Second,
}

/// The set operation applied to the two flattened files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperation {
    /// Entries present in either file.
    Union,
    /// Entries present in both files.
    Intersect,
    /// Entries in the first file but not the second.
    Diff,
    /// Entries in the second file but not the first.
    Rdiff,
    /// Entries present in exactly one file.
    Symdiff,
}

impl SetOperation {
    /// Every operation, in command order.
    pub const ALL: [SetOperation; 5] = [
        SetOperation::Union,
        SetOperation::Intersect,
        SetOperation::Diff,
        SetOperation::Rdiff,
        SetOperation::Symdiff,
    ];

    /// Returns the command name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            SetOperation::Union => "union",
            SetOperation::Intersect => "intersect",
            SetOperation::Diff => "diff",
            SetOperation::Rdiff => "rdiff",
            SetOperation::Symdiff => "symdiff",
        }
    }

    /// Returns the file whose values win when a key survives from both.
    pub fn preferred_source(self) -> Source {
        match self {
            SetOperation::Rdiff => Source::Second,
            _ => Source::First,
        }
    }

    /// Applies the operation to two sets.
    pub fn apply<T: Eq + Hash + Clone>(self, a: &HashSet<T>, b: &HashSet<T>) -> HashSet<T> {
        match self {
            SetOperation::Union => a.union(b).cloned().collect(),
            SetOperation::Intersect => a.intersection(b).cloned().collect(),
            SetOperation::Diff => a.difference(b).cloned().collect(),
            SetOperation::Rdiff => b.difference(a).cloned().collect(),
            SetOperation::Symdiff => a.symmetric_difference(b).cloned().collect(),
        }
    }
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters of a set operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOpConfig {
    /// Comparison mode, `kv` by default.
    pub compare: CompareMode,
    /// Flattening depth, `1` (root keys only) by default. `0` is unlimited.
    pub depth: usize,
}

impl Default for SetOpConfig {
    fn default() -> Self {
        Self {
            compare: CompareMode::Kv,
            depth: 1,
        }
    }
}

/// Computes the typed paths that survive `operation`.
pub fn surviving_keys(
    flat1: &FlatMap,
    flat2: &FlatMap,
    operation: SetOperation,
    compare: CompareMode,
) -> Result<HashSet<KeyPath>, SetOpError> {
    let keys = match compare {
        CompareMode::Keys => {
            let a: HashSet<&KeyPath> = flat1.keys().collect();
            let b: HashSet<&KeyPath> = flat2.keys().collect();
            operation.apply(&a, &b).into_iter().cloned().collect()
        }
        CompareMode::Kv => {
            let a = key_value_pairs(flat1)?;
            let b = key_value_pairs(flat2)?;
            operation
                .apply(&a, &b)
                .into_iter()
                .map(|(path, _)| path.clone())
                .collect()
        }
    };
    Ok(keys)
}

fn key_value_pairs(flat: &FlatMap) -> Result<HashSet<(&KeyPath, HashableValue)>, SetOpError> {
    flat.iter()
        .map(|e| -> Result<_, SetOpError> {
            Ok((&e.path, HashableValue::from_value(&e.value, &e.key)?))
        })
        .collect()
}

/// Runs `operation` over two root mappings and rebuilds the nested result.
///
/// Surviving keys come out in the preferred file's order, followed by keys
/// found only in the other file.
pub fn perform_set_operation(
    file1: &Mapping,
    file2: &Mapping,
    operation: SetOperation,
    config: &SetOpConfig,
) -> Result<Mapping, SetOpError> {
    let flat1 = flatten(file1, config.depth);
    let flat2 = flatten(file2, config.depth);
    debug!(
        operation = %operation,
        compare = %config.compare,
        depth = config.depth,
        file1_entries = flat1.len(),
        file2_entries = flat2.len(),
        "Flattened inputs"
    );

    let keys = surviving_keys(&flat1, &flat2, operation, config.compare)?;
    debug!(surviving = keys.len(), "Computed surviving keys");

    let (primary, secondary) = match operation.preferred_source() {
        Source::First => (&flat1, &flat2),
        Source::Second => (&flat2, &flat1),
    };
    let chosen = primary
        .iter()
        .filter(|e| keys.contains(&e.path))
        .chain(
            secondary
                .iter()
                .filter(|e| keys.contains(&e.path) && !primary.contains_key(&e.path)),
        );

    unflatten(chosen)
}
