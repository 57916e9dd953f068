// Sound variants: consonants and vowels over a shared feature matrix.
//
// A `Sound` is a `SoundKind` tag plus the one-hot `FeatureMatrix` that is
// its entire articulatory state, with optional provenance attributes (IPA
// transcription, source character) carried from construction. There is no
// inheritance hierarchy: type-specific behavior — which categories get
// defaulted, which are exempt from randomization — is table-driven from the
// schema's per-type config.
//
// Strength transitions (`weaken`/`strengthen`) implement a coarse linear
// lenition/fortition model: one ±1 step per call through the schema's
// priority-ordered strength categories (voicing, then manner, then place in
// the default schema). A category at its extreme clamps; the attempt falls
// through to the next-priority category only under the `intensify` flag,
// so a bare call is a no-op at the boundary. This is deliberately not a
// phonological rule engine.
//
// Randomized construction threads `&mut LoomRng` from the caller: the
// caller owns the RNG, and a schema plus a seed reproduces the same sound.

use crate::error::PhonologyError;
use crate::matrix::FeatureMatrix;
use crate::schema::{OrthographyEntry, PhonologySchema, WeakEnd};
use phonoloom_prng::LoomRng;
use serde::{Deserialize, Serialize};

/// Which variant a sound is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    Consonant,
    Vowel,
}

impl SoundKind {
    /// The CV-template marker for this kind.
    pub fn marker(self) -> char {
        match self {
            SoundKind::Consonant => 'c',
            SoundKind::Vowel => 'v',
        }
    }

    /// Parse a CV-template marker (case already folded by callers).
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'c' => Some(SoundKind::Consonant),
            'v' => Some(SoundKind::Vowel),
            _ => None,
        }
    }
}

/// Direction of a strength transition.
#[derive(Clone, Copy)]
enum Extreme {
    Weak,
    Strong,
}

/// A single sound: variant tag, feature matrix, and provenance.
///
/// The provenance attributes (`ipa`, `character`) describe what the sound
/// was built from; any mutation of the matrix clears them, since they no
/// longer transcribe the current state. `display` always re-derives the
/// character from the live features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    kind: SoundKind,
    matrix: FeatureMatrix,
    ipa: Option<String>,
    character: Option<char>,
}

impl Sound {
    /// A sound of the given kind with only its type defaults applied.
    pub fn new(schema: &PhonologySchema, kind: SoundKind) -> Self {
        let mut sound = Self {
            kind,
            matrix: FeatureMatrix::new(schema),
            ipa: None,
            character: None,
        };
        sound.apply_defaults(schema);
        sound
    }

    /// Build a sound from whitespace-delimited feature tokens.
    ///
    /// Tokens resolve through `FeatureMatrix::parse` (greedy first-category
    /// match, unknown tokens ignored); the type's defaults then fill any
    /// category the tokens left unset.
    pub fn from_features(schema: &PhonologySchema, kind: SoundKind, features: &str) -> Self {
        let mut sound = Self {
            kind,
            matrix: FeatureMatrix::new(schema),
            ipa: None,
            character: None,
        };
        sound.matrix.parse(schema, features);
        sound.apply_defaults(schema);
        sound
    }

    /// Build a sound from a display character via the orthography table.
    pub fn from_character(schema: &PhonologySchema, character: char) -> Result<Self, PhonologyError> {
        schema
            .entry_for_character(character)
            .map(|entry| Self::from_entry(schema, entry))
            .ok_or(PhonologyError::UnresolvedCharacter(character))
    }

    /// Build the sound an orthography record describes.
    fn from_entry(schema: &PhonologySchema, entry: &OrthographyEntry) -> Self {
        let mut sound = Self::from_features(schema, entry.kind, &entry.features.join(" "));
        sound.ipa = entry.ipa.clone();
        sound.character = Some(entry.character);
        sound
    }

    /// Build a random sound of the given kind.
    ///
    /// Samples one value uniformly for every category that is neither
    /// excluded for this type nor pinned in its `fixed` table; pinned
    /// categories are then set to their canonical value (airway stays
    /// egressive in the default schema).
    pub fn random(schema: &PhonologySchema, kind: SoundKind, rng: &mut LoomRng) -> Self {
        let config = schema.type_config(kind);
        let mut matrix = FeatureMatrix::new(schema);
        for (ci, cat) in schema.categories().iter().enumerate() {
            if config.is_excluded(&cat.name) || config.fixed_value(&cat.name).is_some() {
                continue;
            }
            matrix.set_at(ci, rng.range_usize(0, cat.values.len()));
        }
        for (category, value) in &config.fixed {
            if let Some(ci) = schema.category_index(category) {
                if let Some(vi) = schema.categories()[ci].value_index(value) {
                    matrix.set_at(ci, vi);
                }
            }
        }
        let mut sound = Self {
            kind,
            matrix,
            ipa: None,
            character: None,
        };
        sound.apply_defaults(schema);
        sound
    }

    pub fn kind(&self) -> SoundKind {
        self.kind
    }

    /// IPA transcription recorded at construction, if any.
    pub fn ipa(&self) -> Option<&str> {
        self.ipa.as_deref()
    }

    /// Source character recorded at construction, if any.
    pub fn character(&self) -> Option<char> {
        self.character
    }

    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    /// The active value index for a category, or `None` when unset.
    pub fn get(
        &self,
        schema: &PhonologySchema,
        category: &str,
    ) -> Result<Option<usize>, PhonologyError> {
        self.matrix.get(schema, category)
    }

    /// Set a category by value label, clearing stale provenance.
    pub fn set(
        &mut self,
        schema: &PhonologySchema,
        category: &str,
        value: &str,
    ) -> Result<(), PhonologyError> {
        self.matrix.set(schema, category, value)?;
        self.ipa = None;
        self.character = None;
        Ok(())
    }

    /// Take one lenition step: move the highest-priority strength category
    /// with room one value toward its weak extreme.
    ///
    /// A category at its weak extreme (or unset) clamps; with `intensify`
    /// the attempt falls through to the next strength category, otherwise
    /// the call is a no-op. Idempotent once every strength category sits at
    /// its weak extreme.
    pub fn weaken(&mut self, schema: &PhonologySchema, intensify: bool) {
        self.shift(schema, Extreme::Weak, intensify);
    }

    /// Take one fortition step toward the strong extremes; the mirror of
    /// `weaken`.
    pub fn strengthen(&mut self, schema: &PhonologySchema, intensify: bool) {
        self.shift(schema, Extreme::Strong, intensify);
    }

    fn shift(&mut self, schema: &PhonologySchema, toward: Extreme, intensify: bool) {
        for step in schema.lenition() {
            let Some(ci) = schema.category_index(&step.category) else {
                continue;
            };
            let len = schema.categories()[ci].values.len();
            let next = self.matrix.index_at(ci).and_then(|current| {
                let toward_start = matches!(
                    (toward, step.weak_end),
                    (Extreme::Weak, WeakEnd::Start) | (Extreme::Strong, WeakEnd::End)
                );
                if toward_start {
                    current.checked_sub(1)
                } else if current + 1 < len {
                    Some(current + 1)
                } else {
                    None
                }
            });
            match next {
                Some(vi) => {
                    self.matrix.set_at(ci, vi);
                    self.ipa = None;
                    self.character = None;
                    self.apply_defaults(schema);
                    return;
                }
                None if intensify => continue,
                None => return,
            }
        }
    }

    /// Fill any unset type-relevant category from the defaults table.
    fn apply_defaults(&mut self, schema: &PhonologySchema) {
        let config = schema.type_config(self.kind);
        for (category, value) in &config.defaults {
            let Some(ci) = schema.category_index(category) else {
                continue;
            };
            if self.matrix.index_at(ci).is_some() {
                continue;
            }
            if let Some(vi) = schema.categories()[ci].value_index(value) {
                self.matrix.set_at(ci, vi);
            }
        }
    }

    /// Active feature labels joined by spaces, in category order — the
    /// description format frequency corpora are built from.
    pub fn description(&self, schema: &PhonologySchema) -> String {
        self.matrix.labels(schema).join(" ")
    }

    /// The display character whose canonical features match this sound's
    /// current state, if the orthography table has one.
    pub fn display(&self, schema: &PhonologySchema) -> Option<char> {
        schema
            .orthography()
            .iter()
            .filter(|entry| entry.kind == self.kind)
            .find(|entry| Self::from_entry(schema, entry).matrix == self.matrix)
            .map(|entry| entry.character)
    }
}
