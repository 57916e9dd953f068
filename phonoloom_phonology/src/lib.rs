// Core phonology crate: feature schema, one-hot sound state, syllables.
//
// Models phonological sound units as vectors over articulatory feature
// categories and provides the operations everything else builds on:
//
// - `schema.rs`: `PhonologySchema` — categories, per-type construction
//   tables, lenition order, orthography; loaded once from JSON and injected
//   everywhere (no globals)
// - `matrix.rs`: `FeatureMatrix` — the one-hot category × value state of a
//   sound, with encode/decode/get/set/parse
// - `sounds.rs`: `Sound` + `SoundKind` — consonant/vowel construction
//   (features, orthography character, random), defaults, and the
//   lenition/fortition strength transitions
// - `syllable.rs`: `Syllable` — CV-template decomposition into
//   onset/nucleus/coda with mora weight
//
// The default schema ships as `data/phonology_schema.json`, embedded at
// compile time by `default_schema()`; alternative feature systems load
// through `PhonologySchema::from_json` without recompilation.
//
// Determinism constraint: all randomness is drawn through
// `phonoloom_prng::LoomRng` passed in by the caller, and no map with
// nondeterministic iteration order is used anywhere. A schema plus a seed
// reproduces identical sounds.

pub mod error;
pub mod matrix;
pub mod schema;
pub mod sounds;
pub mod syllable;

// Re-export key types at crate root for convenience.
pub use error::{PhonologyError, SchemaError};
pub use matrix::FeatureMatrix;
pub use schema::{
    default_schema, Category, LenitionStep, OrthographyEntry, PhonologySchema, SoundTypeConfig,
    WeakEnd,
};
pub use sounds::{Sound, SoundKind};
pub use syllable::Syllable;

#[cfg(test)]
mod tests {
    use super::*;
    use phonoloom_prng::LoomRng;

    // End-to-end: template to displayable sound sequence.
    #[test]
    fn test_template_to_characters() {
        let schema = default_schema();
        let mut syllable = Syllable::parse(&schema, "cvc").unwrap();
        let mut rng = LoomRng::new(2026);
        syllable.randomize(&schema, &mut rng);

        // Every randomized sound has a full description usable as a corpus
        // line, whether or not the orthography covers it.
        for sound in syllable.sounds() {
            let description = sound.description(&schema);
            assert!(!description.is_empty());
            assert!(description.split_whitespace().count() >= 4);
        }
    }

    #[test]
    fn test_schema_is_injected_not_ambient() {
        // Two schemas with different category orders disagree about an
        // ambiguous token; behavior follows the schema passed in, not any
        // process-wide state.
        let a = PhonologySchema::from_json(
            r#"{
                "categories": [
                    {"name": "x", "values": ["t"]},
                    {"name": "y", "values": ["t"]}
                ],
                "consonant": {}, "vowel": {}
            }"#,
        )
        .unwrap();
        let b = PhonologySchema::from_json(
            r#"{
                "categories": [
                    {"name": "y", "values": ["t"]},
                    {"name": "x", "values": ["t"]}
                ],
                "consonant": {}, "vowel": {}
            }"#,
        )
        .unwrap();

        let sound_a = Sound::from_features(&a, SoundKind::Consonant, "t");
        let sound_b = Sound::from_features(&b, SoundKind::Consonant, "t");
        assert_eq!(sound_a.get(&a, "x").unwrap(), Some(0));
        assert_eq!(sound_b.get(&b, "x").unwrap(), None);
    }
}
