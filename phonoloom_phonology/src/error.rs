// Typed failures for schema loading and sound/syllable operations.
//
// Every failure is detected synchronously at the call that triggers it and
// surfaced to the caller; nothing is logged-and-swallowed, and mutations
// validate before committing so a rejected call leaves no partial state.

use thiserror::Error;

/// Failures while parsing or validating a phonology schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate category: {0}")]
    DuplicateCategory(String),

    #[error("category {0} declares no values")]
    EmptyCategory(String),

    #[error("category {category} declares {len} values (max {max})")]
    CategoryTooLarge {
        category: String,
        len: usize,
        max: usize,
    },

    #[error("{context} references unknown category: {category}")]
    UnknownCategoryRef { context: String, category: String },

    #[error("{context} references unknown value {value} in category {category}")]
    UnknownValueRef {
        context: String,
        category: String,
        value: String,
    },

    #[error("duplicate orthography character: {0}")]
    DuplicateCharacter(char),

    #[error("orthography character {character} has unknown feature label: {label}")]
    UnknownFeatureLabel { character: char, label: String },
}

/// Failures raised by feature-matrix, sound, and syllable operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhonologyError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown value {value} in category {category}")]
    UnknownValue { category: String, value: String },

    #[error("category index {index} out of range (schema has {len} categories)")]
    CategoryOutOfRange { index: usize, len: usize },

    #[error("value index {index} out of range for category {category} ({len} values)")]
    ValueOutOfRange {
        category: String,
        index: usize,
        len: usize,
    },

    #[error("no vowel nucleus detected in template; use a `v` marker or explicit parts")]
    NoNucleusFound,

    #[error("template {0} has disjoint vowel groups; only one nucleus run is supported")]
    DisjointNuclei(String),

    #[error("unexpected template marker {0}; only `c` and `v` are recognized")]
    UnexpectedMarker(char),

    #[error("no orthography entry resolves character {0}")]
    UnresolvedCharacter(char),
}
