//! File-based schema loading.
//!
//! Reads a schema document from disk. JSON files load too, since JSON is a
//! subset of YAML.

use std::path::Path;
use tokio::fs;

use crate::domain::survey::{SchemaDocument, SchemaError};

/// Reads and parses the schema document at `path`.
pub async fn load_schema(path: impl AsRef<Path>) -> Result<SchemaDocument, SchemaError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| SchemaError::io(path.display().to_string(), e.to_string()))?;

    let document = SchemaDocument::from_yaml_str(&text)?;
    tracing::debug!(path = %path.display(), entries = document.len(), "Loaded survey schema");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_yaml_schema() {
        let file = write_temp("q1:\n  type: mc\n  label: Color?\n  options: [Red, Blue]\n");

        let document = load_schema(file.path()).await.unwrap();

        assert_eq!(document.len(), 1);
        assert!(document.get("q1").is_some());
    }

    #[tokio::test]
    async fn loads_json_schema() {
        let file = write_temp(r#"{"why": {"type": "text", "label": "Why?"}}"#);

        let document = load_schema(file.path()).await.unwrap();

        assert_eq!(document.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let err = load_schema(&path).await.unwrap_err();

        assert!(matches!(err, SchemaError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_yaml_is_parse_error() {
        let file = write_temp("q1: [unclosed\n");

        let err = load_schema(file.path()).await.unwrap_err();

        assert!(matches!(err, SchemaError::Parse(_)));
    }

    #[tokio::test]
    async fn sequence_document_is_rejected() {
        let file = write_temp("- a\n- b\n");

        let err = load_schema(file.path()).await.unwrap_err();

        assert_eq!(err, SchemaError::NotAMapping { found: "sequence" });
    }
}
