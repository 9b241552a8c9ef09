use std::path::Path;

use crate::gate::errors::GateError;
use crate::gate::manifest::parse_manifest;
use crate::gate::types::{ActionManifest, ActionSpec};

/// Load all `.kdl` manifest files from the given directory, in file name
/// order, into a single `ActionManifest`.
pub fn load_manifests(dir: &Path) -> Result<ActionManifest, GateError> {
    if !dir.is_dir() {
        return Err(GateError::InvalidManifest(format!(
            "manifest directory `{}` does not exist or is not a directory",
            dir.display()
        )));
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "kdl")
                .unwrap_or(false)
        })
        .collect();
    entries.sort_by_key(|e| e.path());

    let mut parsed = Vec::new();
    for entry in &entries {
        let path = entry.path();
        let contents =
            std::fs::read_to_string(&path).map_err(|source| GateError::ManifestLoad {
                path: path.display().to_string(),
                source,
            })?;
        parsed.push(parse_manifest(&contents)?);
    }

    let manifest = merge_manifests(parsed);

    tracing::info!(
        files = entries.len(),
        actions = manifest.len(),
        "Loaded action manifests"
    );

    Ok(manifest)
}

/// Merge parsed files; a later declaration of the same action wins.
pub fn merge_manifests(parsed: Vec<Vec<ActionSpec>>) -> ActionManifest {
    let mut manifest = ActionManifest::default();
    for spec in parsed.into_iter().flatten() {
        if let Some(previous) = manifest.actions.insert(spec.name.clone(), spec) {
            tracing::warn!(action = %previous.name, "action declared more than once, keeping the later declaration");
        }
    }
    manifest
}
