// One-hot feature matrix: the sole articulatory state of a sound.
//
// One row per schema category, stored as a `u32` bit set with at most one
// bit active. An all-zero row means "unset" — a sentinel distinct from
// value index 0, so "bilabial" (index 0) and "no place assigned" never
// collide. `MAX_CATEGORY_VALUES` in `schema.rs` guarantees every value list
// fits the row width.
//
// All operations are schema-parameterized: the matrix itself stores no
// labels, only positions. Label resolution is case-insensitive, and every
// mutation validates before committing — a rejected call leaves the row
// untouched.

use crate::error::PhonologyError;
use crate::schema::PhonologySchema;
use serde::{Deserialize, Serialize};

/// One-hot rows over a schema's categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    rows: Vec<u32>,
}

impl FeatureMatrix {
    /// Create a matrix with every category unset.
    pub fn new(schema: &PhonologySchema) -> Self {
        Self {
            rows: vec![0; schema.categories().len()],
        }
    }

    /// Encode a category label — or a value label within it — as an index.
    ///
    /// With `value` omitted, returns the category's position; with `value`
    /// supplied, returns the value's position within that category's list.
    pub fn encode(
        schema: &PhonologySchema,
        category: &str,
        value: Option<&str>,
    ) -> Result<usize, PhonologyError> {
        let ci = schema
            .category_index(category)
            .ok_or_else(|| PhonologyError::UnknownCategory(category.to_string()))?;
        match value {
            None => Ok(ci),
            Some(label) => schema.categories()[ci].value_index(label).ok_or_else(|| {
                PhonologyError::UnknownValue {
                    category: category.to_string(),
                    value: label.to_string(),
                }
            }),
        }
    }

    /// Decode a category index — or a value index within it — back to its
    /// label. Inverse of `encode`.
    pub fn decode<'s>(
        schema: &'s PhonologySchema,
        category_index: usize,
        value_index: Option<usize>,
    ) -> Result<&'s str, PhonologyError> {
        let cat = schema
            .category(category_index)
            .ok_or(PhonologyError::CategoryOutOfRange {
                index: category_index,
                len: schema.categories().len(),
            })?;
        match value_index {
            None => Ok(&cat.name),
            Some(vi) => cat
                .values
                .get(vi)
                .map(String::as_str)
                .ok_or(PhonologyError::ValueOutOfRange {
                    category: cat.name.clone(),
                    index: vi,
                    len: cat.values.len(),
                }),
        }
    }

    /// The active value index for a category, or `None` when unset.
    pub fn get(
        &self,
        schema: &PhonologySchema,
        category: &str,
    ) -> Result<Option<usize>, PhonologyError> {
        let ci = schema
            .category_index(category)
            .ok_or_else(|| PhonologyError::UnknownCategory(category.to_string()))?;
        Ok(self.index_at(ci))
    }

    /// The active value index at a category position, or `None` when unset.
    pub fn index_at(&self, category_index: usize) -> Option<usize> {
        let row = *self.rows.get(category_index)?;
        if row == 0 {
            None
        } else {
            Some(row.trailing_zeros() as usize)
        }
    }

    /// Set a category to a value by label (case-insensitive).
    pub fn set(
        &mut self,
        schema: &PhonologySchema,
        category: &str,
        value: &str,
    ) -> Result<(), PhonologyError> {
        let ci = schema
            .category_index(category)
            .ok_or_else(|| PhonologyError::UnknownCategory(category.to_string()))?;
        let vi = schema.categories()[ci].value_index(value).ok_or_else(|| {
            PhonologyError::UnknownValue {
                category: category.to_string(),
                value: value.to_string(),
            }
        })?;
        self.set_at(ci, vi);
        Ok(())
    }

    /// Set a category to a value by index. Out-of-range indices are
    /// rejected, never silently dropped.
    pub fn set_index(
        &mut self,
        schema: &PhonologySchema,
        category: &str,
        value_index: usize,
    ) -> Result<(), PhonologyError> {
        let ci = schema
            .category_index(category)
            .ok_or_else(|| PhonologyError::UnknownCategory(category.to_string()))?;
        let len = schema.categories()[ci].values.len();
        if value_index >= len {
            return Err(PhonologyError::ValueOutOfRange {
                category: schema.categories()[ci].name.clone(),
                index: value_index,
                len,
            });
        }
        self.set_at(ci, value_index);
        Ok(())
    }

    /// Overwrite a row with a one-hot bit. Caller has already validated
    /// both indices against the schema.
    pub(crate) fn set_at(&mut self, category_index: usize, value_index: usize) {
        self.rows[category_index] = 1 << value_index;
    }

    /// Assign whitespace-delimited feature tokens.
    ///
    /// Each token goes to the **first** category (schema declaration order)
    /// whose value list matches it case-insensitively; scanning stops for
    /// that token once matched, so a token present in two categories always
    /// lands in the earlier-declared one. Tokens matching no category are
    /// ignored.
    pub fn parse(&mut self, schema: &PhonologySchema, tokens: &str) {
        for token in tokens.split_whitespace() {
            if let Some((ci, vi)) = schema.resolve(token) {
                self.set_at(ci, vi);
            }
        }
    }

    /// Active value labels in category declaration order. Unset categories
    /// are skipped.
    pub fn labels<'s>(&self, schema: &'s PhonologySchema) -> Vec<&'s str> {
        schema
            .categories()
            .iter()
            .enumerate()
            .filter_map(|(ci, cat)| self.index_at(ci).map(|vi| cat.values[vi].as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::default_schema;

    fn one_hot(matrix: &FeatureMatrix) -> bool {
        matrix.rows.iter().all(|row| row.count_ones() <= 1)
    }

    #[test]
    fn test_encode_decode_round_trip_full_schema() {
        let schema = default_schema();
        for cat in schema.categories() {
            let ci = FeatureMatrix::encode(&schema, &cat.name, None).unwrap();
            assert_eq!(FeatureMatrix::decode(&schema, ci, None).unwrap(), cat.name);
            for value in &cat.values {
                let vi = FeatureMatrix::encode(&schema, &cat.name, Some(value)).unwrap();
                assert_eq!(FeatureMatrix::decode(&schema, ci, Some(vi)).unwrap(), value);
            }
        }
    }

    #[test]
    fn test_encode_unknown_category() {
        let schema = default_schema();
        let err = FeatureMatrix::encode(&schema, "tone", None).unwrap_err();
        assert_eq!(err, PhonologyError::UnknownCategory("tone".to_string()));
    }

    #[test]
    fn test_encode_unknown_value() {
        let schema = default_schema();
        let err = FeatureMatrix::encode(&schema, "manner", Some("trill")).unwrap_err();
        assert!(matches!(err, PhonologyError::UnknownValue { .. }));
    }

    #[test]
    fn test_decode_out_of_range() {
        let schema = default_schema();
        let err = FeatureMatrix::decode(&schema, 999, None).unwrap_err();
        assert!(matches!(err, PhonologyError::CategoryOutOfRange { .. }));

        let ci = schema.category_index("voicing").unwrap();
        let err = FeatureMatrix::decode(&schema, ci, Some(2)).unwrap_err();
        assert!(matches!(err, PhonologyError::ValueOutOfRange { index: 2, .. }));
    }

    #[test]
    fn test_unset_is_distinct_from_index_zero() {
        let schema = default_schema();
        let mut matrix = FeatureMatrix::new(&schema);
        assert_eq!(matrix.get(&schema, "place").unwrap(), None);

        matrix.set(&schema, "place", "bilabial").unwrap();
        assert_eq!(matrix.get(&schema, "place").unwrap(), Some(0));
    }

    #[test]
    fn test_set_by_label_case_insensitive() {
        let schema = default_schema();
        let mut matrix = FeatureMatrix::new(&schema);
        matrix.set(&schema, "Manner", "Fricative").unwrap();
        assert_eq!(matrix.get(&schema, "manner").unwrap(), Some(2));
    }

    #[test]
    fn test_set_index_rejects_out_of_range() {
        let schema = default_schema();
        let mut matrix = FeatureMatrix::new(&schema);
        matrix.set_index(&schema, "voicing", 1).unwrap();

        let err = matrix.set_index(&schema, "voicing", 2).unwrap_err();
        assert!(matches!(err, PhonologyError::ValueOutOfRange { index: 2, .. }));
        // Rejected call leaves prior state untouched.
        assert_eq!(matrix.get(&schema, "voicing").unwrap(), Some(1));
    }

    #[test]
    fn test_rows_stay_one_hot() {
        let schema = default_schema();
        let mut matrix = FeatureMatrix::new(&schema);
        assert!(one_hot(&matrix));

        matrix.set(&schema, "place", "bilabial").unwrap();
        matrix.set(&schema, "place", "glottal").unwrap();
        matrix.set(&schema, "place", "velar").unwrap();
        assert!(one_hot(&matrix));
        assert_eq!(matrix.get(&schema, "place").unwrap(), Some(7));

        matrix.parse(&schema, "voiced alveolar stop nasal");
        assert!(one_hot(&matrix));
    }

    #[test]
    fn test_parse_assigns_in_category_order() {
        let schema = default_schema();
        let mut matrix = FeatureMatrix::new(&schema);
        matrix.parse(&schema, "voiced alveolar stop");
        assert_eq!(matrix.get(&schema, "voicing").unwrap(), Some(1));
        assert_eq!(matrix.get(&schema, "place").unwrap(), Some(3));
        assert_eq!(matrix.get(&schema, "manner").unwrap(), Some(0));
        assert_eq!(matrix.get(&schema, "route").unwrap(), None);
    }

    #[test]
    fn test_parse_ambiguous_token_prefers_earlier_category() {
        let schema = PhonologySchema::from_json(
            r#"{
                "categories": [
                    {"name": "first", "values": ["shared"]},
                    {"name": "second", "values": ["shared"]}
                ],
                "consonant": {},
                "vowel": {}
            }"#,
        )
        .unwrap();
        let mut matrix = FeatureMatrix::new(&schema);
        matrix.parse(&schema, "shared");
        assert_eq!(matrix.get(&schema, "first").unwrap(), Some(0));
        assert_eq!(matrix.get(&schema, "second").unwrap(), None);
    }

    #[test]
    fn test_parse_ignores_unknown_tokens() {
        let schema = default_schema();
        let mut matrix = FeatureMatrix::new(&schema);
        matrix.parse(&schema, "sonorous voiced mumbled");
        assert_eq!(matrix.get(&schema, "voicing").unwrap(), Some(1));
        assert_eq!(matrix.labels(&schema), vec!["voiced"]);
    }

    #[test]
    fn test_labels_follow_category_order() {
        let schema = default_schema();
        let mut matrix = FeatureMatrix::new(&schema);
        // Tokens out of order; labels come back in schema order.
        matrix.parse(&schema, "stop voiced bilabial");
        assert_eq!(matrix.labels(&schema), vec!["bilabial", "stop", "voiced"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let schema = default_schema();
        let mut matrix = FeatureMatrix::new(&schema);
        matrix.parse(&schema, "voiced velar fricative");
        let json = serde_json::to_string(&matrix).unwrap();
        let restored: FeatureMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(matrix, restored);
    }
}
