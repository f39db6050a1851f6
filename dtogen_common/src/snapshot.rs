use crate::accessor::ModelTypeAccessor;
use crate::model_type::ModelType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

pub const SNAPSHOT_FILE_SUFFIX: &str = ".model.json";

/// A consistent, immutable view of every model type a generation request may
/// look at, keyed by fully qualified name.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    #[serde(default)]
    types: BTreeMap<String, Arc<ModelType>>,
}

impl ModelSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a type
    pub fn insert(&mut self, model: ModelType) {
        self.types.insert(model.name.clone(), Arc::new(model));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModelType>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ModelType>> {
        self.types.values()
    }

    /// Top-level types only, in name order
    pub fn top_level_types(&self) -> impl Iterator<Item = &Arc<ModelType>> {
        self.types.values().filter(|t| t.declaring_type.is_none())
    }

    /// Merges `other` into this snapshot. Types already present are kept.
    pub fn merge(&mut self, other: &ModelSnapshot) {
        for (name, model) in &other.types {
            self.types
                .entry(name.clone())
                .or_insert_with(|| model.clone());
        }
    }

    /// Writes the snapshot as pretty JSON
    pub fn serialize_to_file(&self, file_path: &Path) -> Result<()> {
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(file_path)
            .context(format!(
                "Failed to open file for writing: {}",
                file_path.display()
            ))?;

        serde_json::to_writer_pretty(file, self).context(format!(
            "Failed to serialize model snapshot to: {}",
            file_path.display()
        ))
    }

    pub fn load_from_file(file_path: &Path) -> Result<ModelSnapshot> {
        let content = fs::read_to_string(file_path)
            .context(format!("Failed to read file: {}", file_path.display()))?;
        serde_json::from_str(&content)
            .context(format!("Failed to parse JSON from: {}", file_path.display()))
    }

    /// Loads and merges every `*.model.json` file in a directory, in file name order
    pub fn load_all_from_dir(dir_path: &Path) -> Result<ModelSnapshot> {
        if !dir_path.exists() {
            return Err(anyhow::anyhow!("Directory not found: {}", dir_path.display()));
        }

        let entries = fs::read_dir(dir_path)
            .context(format!("Failed to read directory: {}", dir_path.display()))?;

        let mut paths: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|f| f.to_str())
                    .is_some_and(|f| f.ends_with(SNAPSHOT_FILE_SUFFIX))
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(anyhow::anyhow!(
                "No model snapshot files found in {}",
                dir_path.display()
            ));
        }

        let mut merged = ModelSnapshot::new();
        for path in paths {
            merged.merge(&Self::load_from_file(&path)?);
        }
        Ok(merged)
    }
}

impl ModelTypeAccessor for ModelSnapshot {
    fn find_type(&self, name: &str) -> Option<Arc<ModelType>> {
        self.types.get(name).cloned()
    }
}

impl FromIterator<ModelType> for ModelSnapshot {
    fn from_iter<I: IntoIterator<Item = ModelType>>(iter: I) -> Self {
        let mut snapshot = ModelSnapshot::new();
        for model in iter {
            snapshot.insert(model);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_ref::TypeRef;
    use tempfile::TempDir;

    fn sample() -> ModelSnapshot {
        let mut form = ModelType::new("pkg.MyForm");
        form.superclass = Some(TypeRef::class("fw.AbstractForm"));
        form.nested_types = vec!["pkg.MyForm.NameField".to_string()];
        let mut field = ModelType::new("pkg.MyForm.NameField");
        field.declaring_type = Some("pkg.MyForm".to_string());
        [form, field].into_iter().collect()
    }

    #[test]
    fn roundtrip_through_files() {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        let path = temp_dir.path().join("forms").join("a.model.json");

        let snapshot = sample();
        snapshot.serialize_to_file(&path).expect("Failed to write snapshot");
        let loaded = ModelSnapshot::load_from_file(&path).expect("Failed to read snapshot");

        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.top_level_types().count(), 1);
    }

    #[test]
    fn load_all_merges_and_keeps_first_definition() {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        sample()
            .serialize_to_file(&temp_dir.path().join("a.model.json"))
            .unwrap();

        let mut other = ModelSnapshot::new();
        other.insert(ModelType::new("pkg.OtherForm"));
        let mut clash = ModelType::new("pkg.MyForm");
        clash.is_interface = true;
        other.insert(clash);
        other
            .serialize_to_file(&temp_dir.path().join("b.model.json"))
            .unwrap();
        fs::write(temp_dir.path().join("ignored.json"), "{}").unwrap();

        let merged = ModelSnapshot::load_all_from_dir(temp_dir.path()).unwrap();
        assert_eq!(merged.len(), 3);
        assert!(!merged.get("pkg.MyForm").unwrap().is_interface);
    }

    #[test]
    fn load_all_requires_snapshot_files() {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        let err = ModelSnapshot::load_all_from_dir(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("No model snapshot files"));
    }
}
