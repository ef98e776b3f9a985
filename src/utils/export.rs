use std::path::Path;

use tracing::info;

use crate::errors::AppError;
use crate::models::translation::InputDescriptor;

/// Write generated program text to disk.
pub fn write_code(code: &str, path: &Path) -> Result<(), AppError> {
    ensure_parent(path)?;
    std::fs::write(path, code)
        .map_err(|e| AppError::FileWrite(format!("Cannot write {}: {}", path.display(), e)))?;
    info!("Wrote generated code to {}", path.display());
    Ok(())
}

/// Write the input descriptors as pretty-printed JSON.
pub fn write_metadata_json(metadata: &[InputDescriptor], path: &Path) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(metadata)?;
    ensure_parent(path)?;
    std::fs::write(path, json)
        .map_err(|e| AppError::FileWrite(format!("Cannot write {}: {}", path.display(), e)))?;
    info!("Wrote {} input descriptors to {}", metadata.len(), path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .map_err(|e| AppError::FileWrite(format!("Cannot create {}: {}", dir.display(), e))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_code_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("ea.js");
        write_code("module.exports = ExpertAdvisor;\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "module.exports = ExpertAdvisor;\n");
    }

    #[test]
    fn test_write_metadata_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.json");
        let metadata = vec![InputDescriptor {
            name: "lotSize".into(),
            param_type: "double".into(),
            default_value: "0.1".into(),
            description: "double parameter".into(),
        }];
        write_metadata_json(&metadata, &path).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([{
                "name": "lotSize",
                "type": "double",
                "defaultValue": "0.1",
                "description": "double parameter"
            }])
        );
    }
}
