//! Schema document model.
//!
//! A schema document maps question keys to question definitions. The raw
//! YAML shapes are irregular: `options` may be a sequence or a mapping,
//! `label` may be a string or a list, and matrix questions carry a `row`
//! mapping. Those shapes are classified once here, when the document is
//! parsed, into the tagged unions [`OptionsValue`] and [`LabelValue`].
//!
//! Mapping order is preserved throughout; it determines normalizer output
//! order.

use serde_yaml::{Mapping, Value};

use super::errors::SchemaError;
use super::question::MATRIX;

/// The `options` field of a question definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionsValue {
    /// No options, or options of an unsupported shape.
    #[default]
    Absent,
    /// Options listed in order.
    Sequence(Vec<String>),
    /// Options keyed by an arbitrary code; only the values are offered.
    Mapping(Vec<(String, String)>),
}

impl OptionsValue {
    /// Flattens the options into an ordered list of option texts.
    pub fn to_list(&self) -> Option<Vec<String>> {
        match self {
            OptionsValue::Absent => None,
            OptionsValue::Sequence(items) => Some(items.clone()),
            OptionsValue::Mapping(pairs) => Some(pairs.iter().map(|(_, v)| v.clone()).collect()),
        }
    }

    fn from_value(value: Option<&Value>) -> Self {
        match value.map(untag) {
            Some(Value::Sequence(items)) => {
                OptionsValue::Sequence(items.iter().filter_map(scalar_text).collect())
            }
            Some(Value::Mapping(map)) => OptionsValue::Mapping(
                map.iter()
                    .filter_map(|(k, v)| Some((scalar_text(k)?, scalar_text(v)?)))
                    .collect(),
            ),
            _ => OptionsValue::Absent,
        }
    }
}

/// The `label` field of a question definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LabelValue {
    #[default]
    Absent,
    /// A human-readable prompt.
    Text(String),
    /// A list standing in for a label that lives on the parent matrix.
    List(Vec<String>),
}

impl LabelValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LabelValue::Text(text) => Some(text),
            _ => None,
        }
    }

    fn from_value(value: Option<&Value>) -> Self {
        match value.map(untag) {
            Some(Value::Sequence(items)) => {
                LabelValue::List(items.iter().filter_map(scalar_text).collect())
            }
            Some(other) => scalar_text(other).map_or(LabelValue::Absent, LabelValue::Text),
            None => LabelValue::Absent,
        }
    }
}

/// One row of a matrix question: its display label and its key suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub label: String,
    pub key: String,
}

impl MatrixRow {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }
}

/// A single question definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionDefinition {
    pub question_type: Option<String>,
    pub label: LabelValue,
    pub options: OptionsValue,
    pub rows: Vec<MatrixRow>,
}

impl QuestionDefinition {
    /// Creates a definition of the given type with no label, options or rows.
    pub fn new(question_type: impl Into<String>) -> Self {
        Self {
            question_type: Some(question_type.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = LabelValue::Text(label.into());
        self
    }

    pub fn with_list_label<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label = LabelValue::List(items.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_options(mut self, options: OptionsValue) -> Self {
        self.options = options;
        self
    }

    pub fn with_row(mut self, label: impl Into<String>, key: impl Into<String>) -> Self {
        self.rows.push(MatrixRow::new(label, key));
        self
    }

    pub fn is_matrix(&self) -> bool {
        self.question_type.as_deref() == Some(MATRIX)
    }

    fn from_value(key: &str, value: &Value) -> Result<Self, SchemaError> {
        let map = match untag(value) {
            Value::Mapping(map) => map,
            other => {
                return Err(SchemaError::EntryNotMapping {
                    key: key.to_string(),
                    found: kind_name(other),
                })
            }
        };

        let question_type = map.get("type").and_then(scalar_text);
        let is_matrix = question_type.as_deref() == Some(MATRIX);

        // `row` only matters on matrix questions; elsewhere a malformed one is ignored.
        let rows = match parse_rows(key, map.get("row")) {
            Ok(rows) => rows,
            Err(err) if is_matrix => return Err(err),
            Err(_) => Vec::new(),
        };

        Ok(Self {
            question_type,
            label: LabelValue::from_value(map.get("label")),
            options: OptionsValue::from_value(map.get("options")),
            rows,
        })
    }
}

/// A keyed question definition within a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub key: String,
    pub definition: QuestionDefinition,
}

/// An ordered mapping from question key to question definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaDocument {
    entries: Vec<SchemaEntry>,
}

impl SchemaDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any existing definition under the same key in place.
    pub fn with_entry(mut self, key: impl Into<String>, definition: QuestionDefinition) -> Self {
        let key = key.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.definition = definition,
            None => self.entries.push(SchemaEntry { key, definition }),
        }
        self
    }

    /// Parses a document from YAML (or JSON) text.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|e| SchemaError::parse(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Builds a document from an already-parsed YAML value.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::NotAMapping`] if the top level is not a mapping
    /// - [`SchemaError::EntryNotMapping`] if a question definition is not a mapping
    /// - [`SchemaError::RowNotMapping`] if a matrix `row` is present but not a mapping
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let map = match untag(value) {
            Value::Mapping(map) => map,
            other => {
                return Err(SchemaError::NotAMapping {
                    found: kind_name(other),
                })
            }
        };

        let entries = map
            .iter()
            .map(|(key, definition)| -> Result<SchemaEntry, SchemaError> {
                let key = scalar_text(key).ok_or(SchemaError::InvalidKey {
                    found: kind_name(key),
                })?;
                let definition = QuestionDefinition::from_value(&key, definition)?;
                Ok(SchemaEntry { key, definition })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Looks up a definition by its exact key.
    pub fn get(&self, key: &str) -> Option<&QuestionDefinition> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.definition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_rows(key: &str, value: Option<&Value>) -> Result<Vec<MatrixRow>, SchemaError> {
    let map: &Mapping = match value.map(untag) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Mapping(map)) => map,
        Some(other) => {
            return Err(SchemaError::RowNotMapping {
                key: key.to_string(),
                found: kind_name(other),
            })
        }
    };

    Ok(map
        .iter()
        .map(|(label, row_key)| MatrixRow::new(row_text(label), row_text(row_key)))
        .collect())
}

/// Renders any row label or key as text so every row yields a record.
fn row_text(value: &Value) -> String {
    match untag(value) {
        Value::Null => String::new(),
        other => scalar_text(other).unwrap_or_else(|| {
            serde_yaml::to_string(other)
                .map(|text| text.trim_end().to_string())
                .unwrap_or_default()
        }),
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Renders a scalar as text; `null` and collections have no text form.
fn scalar_text(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match untag(value) {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
