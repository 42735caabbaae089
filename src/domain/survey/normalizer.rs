//! Schema Normalizer - flattens a schema document into question records.
//!
//! Scalar entries become one record each. Matrix entries expand into one
//! `mc` record per row, keyed `<prefix>_<row key>` and labelled
//! `"<matrix label> <row label>"`, inline at the matrix's position.
//!
//! Some schemas also carry standalone entries for individual matrix rows
//! whose `label` is a list rather than a string. Those labels are resolved
//! back against the parent matrix definition.
//!
//! # Matrix keys
//!
//! By default every matrix row is keyed with the fixed prefix `rankings`,
//! and list labels resolve against the entry named exactly `rankings`. This
//! ties the default to one schema's naming convention; use
//! [`SchemaNormalizer::with_matrix_key`] to pick another prefix or
//! [`SchemaNormalizer::deriving_matrix_keys`] to prefix rows with their own
//! matrix entry's key.

use serde_yaml::Value;

use super::errors::SchemaError;
use super::question::{QuestionRecord, MULTIPLE_CHOICE};
use super::schema::{LabelValue, QuestionDefinition, SchemaDocument};

/// Matrix key prefix used unless configured otherwise.
pub const DEFAULT_MATRIX_KEY: &str = "rankings";

/// How matrix row keys are formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixKeys {
    /// Every row key is `<prefix>_<row key>`; list labels resolve against
    /// the entry named exactly `<prefix>`.
    Fixed(String),
    /// Row keys use the matrix entry's own key as prefix; list labels
    /// resolve against the matrix entry whose key prefixes theirs.
    FromEntryKey,
}

/// Flattens schema documents into ordered question records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNormalizer {
    matrix_keys: MatrixKeys,
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaNormalizer {
    /// Creates a normalizer using the fixed `rankings` prefix.
    pub fn new() -> Self {
        Self::with_matrix_key(DEFAULT_MATRIX_KEY)
    }

    /// Creates a normalizer using a fixed matrix key prefix.
    pub fn with_matrix_key(prefix: impl Into<String>) -> Self {
        Self {
            matrix_keys: MatrixKeys::Fixed(prefix.into()),
        }
    }

    /// Creates a normalizer that prefixes rows with their matrix entry's key.
    pub fn deriving_matrix_keys() -> Self {
        Self {
            matrix_keys: MatrixKeys::FromEntryKey,
        }
    }

    pub fn matrix_keys(&self) -> &MatrixKeys {
        &self.matrix_keys
    }

    /// Normalizes an already-parsed YAML value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the value is not a mapping of question
    /// definitions, or a matrix `row` is not a mapping.
    pub fn normalize_value(&self, value: &Value) -> Result<Vec<QuestionRecord>, SchemaError> {
        let document = SchemaDocument::from_value(value)?;
        Ok(self.normalize(&document))
    }

    /// Normalizes a document into question records, in document order.
    pub fn normalize(&self, document: &SchemaDocument) -> Vec<QuestionRecord> {
        let mut records = Vec::with_capacity(document.len());

        for entry in document.entries() {
            let definition = &entry.definition;
            if definition.is_matrix() {
                self.expand_matrix(&entry.key, definition, &mut records);
            } else {
                records.push(self.scalar_record(document, &entry.key, definition));
            }
        }

        records
    }

    fn expand_matrix(&self, key: &str, matrix: &QuestionDefinition, out: &mut Vec<QuestionRecord>) {
        let prefix = match &self.matrix_keys {
            MatrixKeys::Fixed(prefix) => prefix.as_str(),
            MatrixKeys::FromEntryKey => key,
        };
        let matrix_label = parent_label(matrix);
        let options = matrix.options.to_list();

        out.extend(matrix.rows.iter().map(|row| {
            QuestionRecord::new(
                format!("{}_{}", prefix, row.key),
                Some(MULTIPLE_CHOICE.to_string()),
                Some(join_label(&matrix_label, &row.label)),
                options.clone(),
            )
        }));
    }

    fn scalar_record(
        &self,
        document: &SchemaDocument,
        key: &str,
        definition: &QuestionDefinition,
    ) -> QuestionRecord {
        let label = match &definition.label {
            LabelValue::Text(text) => Some(text.clone()),
            LabelValue::List(items) => Some(
                self.resolve_row_label(document, key)
                    .unwrap_or_else(|| items.join(" ")),
            ),
            LabelValue::Absent => None,
        };

        QuestionRecord::new(
            key,
            definition.question_type.clone(),
            label,
            definition.options.to_list(),
        )
    }

    /// Resolves the label of a standalone matrix-row entry from its parent.
    ///
    /// Returns `None` when `key` does not name a matrix row at all. A missing
    /// parent resolves to an empty label; a missing row to the bare parent label.
    fn resolve_row_label(&self, document: &SchemaDocument, key: &str) -> Option<String> {
        let (parent, suffix) = match &self.matrix_keys {
            MatrixKeys::Fixed(prefix) => {
                let suffix = key.strip_prefix(prefix.as_str())?.strip_prefix('_')?;
                (document.get(prefix), suffix)
            }
            MatrixKeys::FromEntryKey => {
                let (parent_key, parent) = document
                    .entries()
                    .iter()
                    .filter(|e| e.definition.is_matrix())
                    .filter(|e| {
                        key.len() > e.key.len() + 1
                            && key.starts_with(e.key.as_str())
                            && key.as_bytes()[e.key.len()] == b'_'
                    })
                    .map(|e| (e.key.as_str(), &e.definition))
                    .max_by_key(|(k, _)| k.len())?;
                (Some(parent), &key[parent_key.len() + 1..])
            }
        };

        let parent_text = parent.map(parent_label).unwrap_or_default();
        let row_label = parent
            .into_iter()
            .flat_map(|p| p.rows.iter())
            .find(|row| row.key == suffix)
            .map(|row| row.label.as_str())
            .filter(|label| !label.is_empty());

        Some(match row_label {
            Some(row_label) => join_label(&parent_text, row_label),
            None => parent_text,
        })
    }
}

/// A matrix's label as prefix text; list labels are joined with spaces.
fn parent_label(matrix: &QuestionDefinition) -> String {
    match &matrix.label {
        LabelValue::Text(text) => text.clone(),
        LabelValue::List(items) => items.join(" "),
        LabelValue::Absent => String::new(),
    }
}

/// Joins a parent label and a row label, with no separator after an empty parent.
fn join_label(parent: &str, row: &str) -> String {
    if parent.is_empty() {
        row.to_string()
    } else {
        format!("{} {}", parent, row)
    }
}

/// Normalizes a document with the default `rankings` matrix key.
pub fn normalize(document: &SchemaDocument) -> Vec<QuestionRecord> {
    SchemaNormalizer::new().normalize(document)
}
