// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use cargo_metadata::MetadataCommand;
use std::path::{Path, PathBuf};

pub const MODEL_FILE_NAME: &str = "dtogen.ron";

/// Find dtogen.ron in the workspace root using cargo metadata
pub fn find_workspace_model_file() -> Option<PathBuf> {
    let metadata = MetadataCommand::new().no_deps().exec().ok()?;
    let model_file = metadata.workspace_root.join(MODEL_FILE_NAME);
    if model_file.exists() {
        Some(model_file.into_std_path_buf())
    } else {
        None
    }
}

/// Resolves the model file to load: the explicit path, else the workspace
/// root's dtogen.ron, else dtogen.ron in `current_dir`.
pub fn resolve_model_file(explicit: Option<&Path>, current_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    find_workspace_model_file().or_else(|| {
        let local = current_dir.join(MODEL_FILE_NAME);
        local.exists().then_some(local)
    })
}
