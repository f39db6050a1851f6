use anyhow::{Context, Result};
use dtogen_common::{ModelSnapshot, ModelType, TypeParseError};
use ron::de::from_reader;
use ron::ser::{PrettyConfig, to_writer_pretty};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;

/// Collects model types, either declared through the fluent DSL or loaded from RON
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelBuilder {
    pub types: Vec<ModelType>,
    #[serde(skip)]
    errors: Vec<TypeParseError>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with the framework runtime types
    pub fn with_runtime() -> Self {
        let mut builder = Self::new();
        crate::runtime::register_runtime(&mut builder);
        builder
    }

    /// Adds a type, replacing an earlier declaration with the same name
    pub fn push(&mut self, model: ModelType) {
        match self.types.iter_mut().find(|t| t.name == model.name) {
            Some(existing) => *existing = model,
            None => self.types.push(model),
        }
    }

    pub(crate) fn record_errors(&mut self, errors: impl IntoIterator<Item = TypeParseError>) {
        self.errors.extend(errors);
    }

    pub fn find(&self, name: &str) -> Option<&ModelType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Signature errors collected while declaring types
    pub fn errors(&self) -> &[TypeParseError] {
        &self.errors
    }

    /// Freezes the declared types into a snapshot. Fails on the first malformed signature.
    pub fn snapshot(&self) -> Result<ModelSnapshot, TypeParseError> {
        if let Some(err) = self.errors.first() {
            return Err(err.clone());
        }
        Ok(self.types.iter().cloned().collect())
    }

    // Method to write the ModelBuilder to a file
    pub fn write_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> io::Result<()> {
        if let Some(err) = self.errors.first() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, err.clone()));
        }
        let file = File::create(path)?;
        to_writer_pretty(file, &self.types, PrettyConfig::default()).map_err(io::Error::other)?;
        Ok(())
    }

    // Method to read the ModelBuilder from a file
    pub fn read_from_file<P: AsRef<std::path::Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;

        let types: Vec<ModelType> = from_reader(file).map_err(io::Error::other)?;
        log::debug!(
            "loaded {} model types from {}",
            types.len(),
            path.as_ref().display()
        );

        Ok(ModelBuilder {
            types,
            errors: Vec::new(),
        })
    }

    /// Reads a RON model file straight into a snapshot
    pub fn load_snapshot<P: AsRef<std::path::Path>>(path: P) -> Result<ModelSnapshot> {
        let path = path.as_ref();
        Self::read_from_file(path)
            .context(format!("Failed to read model file: {}", path.display()))?
            .snapshot()
            .context(format!("Malformed type signature in: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::GenerationCommand;
    use crate::runtime::names;
    use crate::type_builder::{DeclarationDsl, ModelTypeExt};
    use dtogen_common::ModelTypeAccessor;
    use tempfile::NamedTempFile;

    fn sample_builder() -> ModelBuilder {
        let mut builder = ModelBuilder::with_runtime();
        builder
            .model_type("pkg.MyForm")
            .extends(names::ABSTRACT_FORM)
            .nested("MainBox", |b| {
                b.extends(names::ABSTRACT_GROUP_BOX)
                    .nested("NameField", |f| f.extends(names::ABSTRACT_STRING_FIELD))
            })
            .build();
        builder
    }

    #[test]
    fn test_write_to_file() {
        let builder = sample_builder();
        let temp_file = NamedTempFile::new().unwrap();

        builder.write_to_file(temp_file.path()).unwrap();

        assert!(temp_file.path().exists());
        assert!(std::fs::metadata(temp_file.path()).unwrap().len() > 0);
    }

    #[test]
    fn test_read_from_file() {
        let builder = sample_builder();
        let temp_file = NamedTempFile::new().unwrap();
        builder.write_to_file(temp_file.path()).unwrap();

        let loaded = ModelBuilder::read_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.types, builder.types);
        let snapshot = loaded.snapshot().unwrap();
        let field = snapshot.require("pkg.MyForm.MainBox.NameField").unwrap();
        assert_eq!(field.declaring_type.as_deref(), Some("pkg.MyForm.MainBox"));
        assert!(snapshot.is_subtype_of(&field.name, names::IVALUE_FIELD).unwrap());
    }

    #[test]
    fn test_push_replaces_same_name() {
        let mut builder = ModelBuilder::new();
        builder.model_type("pkg.A").build();
        builder
            .model_type("pkg.A")
            .form_data(|d| d.command(GenerationCommand::Ignore))
            .build();
        assert_eq!(builder.types.len(), 1);
        assert_eq!(builder.types[0].annotations.len(), 1);
    }

    #[test]
    fn test_malformed_signature_blocks_snapshot() {
        let mut builder = ModelBuilder::new();
        builder.model_type("pkg.Broken").extends("pkg.List<").build();

        assert_eq!(builder.errors().len(), 1);
        assert!(builder.snapshot().is_err());
        let temp_file = NamedTempFile::new().unwrap();
        assert!(builder.write_to_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_read_from_missing_file() {
        assert!(ModelBuilder::read_from_file("/definitely/not/here.ron").is_err());
        let err = ModelBuilder::load_snapshot("/definitely/not/here.ron").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.ron"));
    }

    #[test]
    fn test_load_snapshot() {
        let builder = sample_builder();
        let temp_file = NamedTempFile::new().unwrap();
        builder.write_to_file(temp_file.path()).unwrap();

        let snapshot = ModelBuilder::load_snapshot(temp_file.path()).unwrap();
        assert_eq!(snapshot, builder.snapshot().unwrap());
    }
}
