//! Catalog of items to voice.

use crate::error::CatalogError;
use serde::Deserialize;
use std::path::Path;

/// One catalog record. The engine only ever reads these.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    pub id: Option<i64>,
    pub name: String,
    pub name_english: String,
    /// Target audio file, relative to the project base directory.
    pub audio: String,
}

impl CatalogEntry {
    /// Id for messages; `N/A` when the record has none.
    pub fn label(&self) -> String {
        self.id.map_or_else(|| "N/A".to_string(), |id| id.to_string())
    }
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<CatalogEntry>, CatalogError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_entries_in_order_and_ignores_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fruits.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 200, "name": "苹果", "name_english": "apple", "audio": "assets/fruits/200.mp3", "image": "a.png"},
                {"id": 201, "name": "香蕉", "name_english": "banana", "audio": "assets/fruits/201.mp3"}
            ]"#,
        )
        .unwrap();

        let entries = load_catalog(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, Some(200));
        assert_eq!(entries[1].name_english, "banana");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"[{"id": 7, "name_english": "kiwi"}]"#).unwrap();

        let entries = load_catalog(&path).unwrap();
        assert_eq!(entries[0].name, "");
        assert_eq!(entries[0].audio, "");
        assert_eq!(entries[0].label(), "7");
    }

    #[test]
    fn label_without_id() {
        assert_eq!(CatalogEntry::default().label(), "N/A");
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
