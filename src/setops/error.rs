//! Set-operation error handling.

use thiserror::Error;

/// Errors raised while flattening, comparing, or rebuilding mappings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetOpError {
    /// The document root is not a YAML mapping.
    #[error("Root must be a YAML mapping, found {found}")]
    NotAMapping {
        /// Kind of value found at the root.
        found: &'static str,
    },

    /// A value has no hashable projection.
    #[error("Cannot compare tagged value `{tag}` at `{path}`")]
    UnhashableValue {
        /// Flattened key holding the value.
        path: String,
        /// The YAML tag that was encountered.
        tag: String,
    },

    /// Two surviving keys require the same node to be both a leaf and a mapping.
    #[error("Conflicting structure: `{leaf}` is a value but `{nested}` needs it to be a mapping")]
    StructuralConflict {
        /// Key that holds a leaf value.
        leaf: String,
        /// Key that nests below the leaf.
        nested: String,
    },
}
