// Conditional-frequency statistics over feature-label corpora.
//
// Builds a recursive count trie from whitespace-delimited label sequences
// (typically sound descriptions like "voiced alveolar stop", or single
// transcription symbols) and answers relative-frequency queries against it:
//
// - `model.rs`: `FreqNode` (Leaf/Internal/Mixed tagged union) and
//   `FreqModel` — insert, strict lookup, relaxed search, conditional
//   probability, shard merge
// - `corpus.rs`: transcription-text preparation (length-mark expansion,
//   stress stripping, slash-span extraction, bigram insertion)
//
// This crate consumes label sequences and nothing else: sound objects from
// `phonoloom_phonology` feed it through their description strings, never
// the other way around. Dropped inputs are logged at debug level through
// `tracing`; errors are always surfaced to the caller as typed values.

pub mod corpus;
pub mod error;
pub mod model;

// Re-export key types at crate root for convenience.
pub use error::FreqError;
pub use model::{FreqModel, FreqNode};
