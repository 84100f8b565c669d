use crate::error::BackendError;
use crate::model::Workspace;
use std::path::Path;

/// Save a workspace to a JSON file, creating parent directories as needed.
pub fn save_workspace(workspace: &Workspace, path: &Path) -> Result<(), BackendError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(workspace)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a workspace from a JSON file.
pub fn load_workspace(path: &Path) -> Result<Workspace, BackendError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
