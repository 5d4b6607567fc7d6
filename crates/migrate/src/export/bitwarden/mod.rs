//! Bitwarden unencrypted JSON import format.
//!
//! Documents are rendered with two space indentation and
//! object keys sorted alphabetically at every level.
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::Result;

mod field;
mod item;
mod uri;

pub use field::{CustomField, FieldType, LinkedId};
pub use item::{
    Card, Identity, Item, ItemBuilder, ItemData, ItemType, Login, Reprompt,
    SecureNote,
};
pub use uri::{UriMatch, UriPattern};

/// Folder referenced by items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    /// Folder identifier.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
}

/// Assigns a folder identifier to each distinct folder name.
#[derive(Debug, Default)]
pub struct FolderRegistry {
    folders: Vec<Folder>,
}

impl FolderRegistry {
    /// Identifier for a folder name, creating the folder
    /// the first time the name is seen.
    pub fn resolve(&mut self, name: &str) -> Uuid {
        if let Some(folder) = self.folders.iter().find(|f| f.name == name) {
            return folder.id;
        }
        let folder = Folder {
            id: Uuid::new_v4(),
            name: name.to_owned(),
        };
        let id = folder.id;
        tracing::debug!(name = %name, id = %id, "new folder");
        self.folders.push(folder);
        id
    }

    /// Number of folders.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Whether no folders were created.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Folders in creation order.
    pub fn into_folders(self) -> Vec<Folder> {
        self.folders
    }
}

/// Bitwarden import document.
#[derive(Debug, Default, Serialize)]
pub struct BitwardenExport {
    folders: Vec<Folder>,
    items: Vec<Item>,
}

impl BitwardenExport {
    /// Create a document.
    pub fn new(folders: Vec<Folder>, items: Vec<Item>) -> Self {
        Self { folders, items }
    }

    /// Folders in the document.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Items in the document.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Render the document.
    pub fn to_json(&self) -> Result<String> {
        to_sorted_json(self)
    }

    /// Write the document to a file.
    ///
    /// The document is rendered in full and written to a
    /// temporary file in the destination directory which is then
    /// renamed over the destination path.
    pub async fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let buffer = self.to_json()?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        // Same directory so the rename never crosses devices
        let temp = NamedTempFile::new_in(dir)?;
        tokio::fs::write(temp.path(), buffer.as_bytes()).await?;
        temp.persist(path)?;

        tracing::info!(
            path = %path.display(),
            items = self.items.len(),
            folders = self.folders.len(),
            "wrote bitwarden export");
        Ok(())
    }
}

/// Pretty print a value with object keys in sorted order.
pub(crate) fn to_sorted_json<T: Serialize>(value: &T) -> Result<String> {
    let value = sort_keys(serde_json::to_value(value)?);
    Ok(serde_json::to_string_pretty(&value)?)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(values) => {
            Value::Array(values.into_iter().map(sort_keys).collect())
        }
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn folder_registry_reuses_ids() {
        let mut folders = FolderRegistry::default();
        let web = folders.resolve("Web");
        let bank = folders.resolve("Bank");
        assert_eq!(web, folders.resolve("Web"));
        assert_ne!(web, bank);
        assert_eq!(2, folders.len());
        let folders = folders.into_folders();
        assert_eq!("Web", folders[0].name);
        assert_eq!("Bank", folders[1].name);
    }

    #[test]
    fn empty_document() -> Result<()> {
        let doc = BitwardenExport::default();
        assert_eq!("{\n  \"folders\": [],\n  \"items\": []\n}", doc.to_json()?);
        Ok(())
    }

    #[test]
    fn nested_keys_sorted() -> Result<()> {
        let value = serde_json::json!({"b": {"z": 1, "a": [{"y": 2, "c": 3}]}, "a": 0});
        let json = to_sorted_json(&value)?;
        let compact: Value = serde_json::from_str(&json)?;
        assert_eq!(value, compact);
        assert!(json.find("\"a\": 0") < json.find("\"b\""));
        assert!(json.find("\"c\": 3") < json.find("\"y\": 2"));
        Ok(())
    }
}
