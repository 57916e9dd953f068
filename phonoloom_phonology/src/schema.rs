// Data-driven phonology schema: categories, value lists, sound-type tables.
//
// Everything the rest of the crate knows about articulatory features lives
// here in `PhonologySchema`, loaded from JSON at startup. The core never
// hardcodes category or value names — it reads them from the schema, which
// enables swapping feature systems (or whole constructed-language
// inventories) without recompilation.
//
// Category declaration order is semantic: `FeatureMatrix::parse` assigns an
// ambiguous token to the earliest declared category whose value list
// contains it, so reordering categories changes parse results.
//
// The schema is loaded once by the caller and passed by reference into
// matrix, sound, and syllable operations. There is no global schema and no
// load-time attribute synthesis; all access goes through declared fields.
//
// See also: `matrix.rs` for the one-hot rows sized from these categories,
// `sounds.rs` for how the per-type `excluded`/`defaults`/`fixed` tables and
// the `lenition` order drive construction and strength transitions.

use crate::error::SchemaError;
use crate::sounds::SoundKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Widest value list a category may declare. Rows in `FeatureMatrix` are
/// one-hot `u32` bit sets, so a category cannot exceed the row width.
pub const MAX_CATEGORY_VALUES: usize = 32;

/// One articulatory category: a label plus its ordered value labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Category label (e.g., "place").
    pub name: String,
    /// Ordered value labels (e.g., "bilabial" … "glottal"). Order is
    /// semantic: strength transitions step through adjacent entries.
    pub values: Vec<String>,
}

impl Category {
    /// Position of a value label in this category, matched
    /// case-insensitively.
    pub fn value_index(&self, label: &str) -> Option<usize> {
        self.values.iter().position(|v| v.eq_ignore_ascii_case(label))
    }
}

/// Per-sound-type construction tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundTypeConfig {
    /// Categories exempt from randomization and defaulting for this type.
    #[serde(default)]
    pub excluded: Vec<String>,
    /// Category → value applied to any unset type-relevant category after
    /// construction or a strength transition.
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    /// Category → value pinned during randomization (never sampled).
    #[serde(default)]
    pub fixed: BTreeMap<String, String>,
}

impl SoundTypeConfig {
    /// Whether a category is exempt from randomization/defaulting.
    pub fn is_excluded(&self, category: &str) -> bool {
        self.excluded.iter().any(|c| c.eq_ignore_ascii_case(category))
    }

    /// The pinned value for a category, if any.
    pub fn fixed_value(&self, category: &str) -> Option<&str> {
        self.fixed
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(category))
            .map(|(_, v)| v.as_str())
    }
}

/// Which end of a category's value list is its weak extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeakEnd {
    /// Index 0 is weakest (e.g., voicing: unvoiced first).
    Start,
    /// The last index is weakest (e.g., manner: lateral last).
    End,
}

/// One entry in the lenition priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LenitionStep {
    /// Category this step adjusts.
    pub category: String,
    /// Which end of the value list weakening moves toward.
    pub weak_end: WeakEnd,
}

/// One orthography record: a display character and its canonical features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrthographyEntry {
    /// The display character.
    pub character: char,
    /// Sound type this character denotes.
    pub kind: SoundKind,
    /// Canonical ordered feature-label sequence.
    pub features: Vec<String>,
    /// IPA transcription, when one exists.
    #[serde(default)]
    pub ipa: Option<String>,
}

/// A loaded, validated phonology schema.
///
/// Immutable after `from_json`. Entry order from the JSON file is preserved
/// everywhere (categories, values, orthography) for deterministic behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonologySchema {
    categories: Vec<Category>,
    consonant: SoundTypeConfig,
    vowel: SoundTypeConfig,
    #[serde(default)]
    lenition: Vec<LenitionStep>,
    #[serde(default)]
    orthography: Vec<OrthographyEntry>,
}

impl PhonologySchema {
    /// Parse and validate a schema from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: PhonologySchema = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// All categories, in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Position of a category label, matched case-insensitively.
    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// The category at a position, if in range.
    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Construction tables for a sound type.
    pub fn type_config(&self, kind: SoundKind) -> &SoundTypeConfig {
        match kind {
            SoundKind::Consonant => &self.consonant,
            SoundKind::Vowel => &self.vowel,
        }
    }

    /// Strength categories in priority order.
    pub fn lenition(&self) -> &[LenitionStep] {
        &self.lenition
    }

    /// All orthography records, in declaration order.
    pub fn orthography(&self) -> &[OrthographyEntry] {
        &self.orthography
    }

    /// The orthography record for a display character, if one exists.
    pub fn entry_for_character(&self, character: char) -> Option<&OrthographyEntry> {
        self.orthography.iter().find(|e| e.character == character)
    }

    /// Resolve a value label to `(category index, value index)` using the
    /// greedy first-category rule: categories are scanned in declaration
    /// order and the first containing the label (case-insensitively) wins.
    pub fn resolve(&self, label: &str) -> Option<(usize, usize)> {
        self.categories
            .iter()
            .enumerate()
            .find_map(|(ci, cat)| cat.value_index(label).map(|vi| (ci, vi)))
    }

    fn validate(&self) -> Result<(), SchemaError> {
        for (i, cat) in self.categories.iter().enumerate() {
            if self.categories[..i]
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&cat.name))
            {
                return Err(SchemaError::DuplicateCategory(cat.name.clone()));
            }
            if cat.values.is_empty() {
                return Err(SchemaError::EmptyCategory(cat.name.clone()));
            }
            if cat.values.len() > MAX_CATEGORY_VALUES {
                return Err(SchemaError::CategoryTooLarge {
                    category: cat.name.clone(),
                    len: cat.values.len(),
                    max: MAX_CATEGORY_VALUES,
                });
            }
        }

        for (type_name, config) in [("consonant", &self.consonant), ("vowel", &self.vowel)] {
            for category in &config.excluded {
                if self.category_index(category).is_none() {
                    return Err(SchemaError::UnknownCategoryRef {
                        context: format!("{type_name} excluded list"),
                        category: category.clone(),
                    });
                }
            }
            for (table_name, table) in [("defaults", &config.defaults), ("fixed", &config.fixed)] {
                for (category, value) in table {
                    let context = format!("{type_name} {table_name} table");
                    let Some(ci) = self.category_index(category) else {
                        return Err(SchemaError::UnknownCategoryRef {
                            context,
                            category: category.clone(),
                        });
                    };
                    if self.categories[ci].value_index(value).is_none() {
                        return Err(SchemaError::UnknownValueRef {
                            context,
                            category: category.clone(),
                            value: value.clone(),
                        });
                    }
                }
            }
        }

        for step in &self.lenition {
            if self.category_index(&step.category).is_none() {
                return Err(SchemaError::UnknownCategoryRef {
                    context: "lenition order".to_string(),
                    category: step.category.clone(),
                });
            }
        }

        for (i, entry) in self.orthography.iter().enumerate() {
            if self.orthography[..i]
                .iter()
                .any(|e| e.character == entry.character)
            {
                return Err(SchemaError::DuplicateCharacter(entry.character));
            }
            for label in &entry.features {
                if self.resolve(label).is_none() {
                    return Err(SchemaError::UnknownFeatureLabel {
                        character: entry.character,
                        label: label.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Load the default schema embedded at compile time.
///
/// Uses `include_str!` to embed `data/phonology_schema.json`. Panics if the
/// embedded JSON is malformed (should never happen in a released build).
pub fn default_schema() -> PhonologySchema {
    let json = include_str!("../../data/phonology_schema.json");
    PhonologySchema::from_json(json).expect("embedded phonology_schema.json is malformed")
}
