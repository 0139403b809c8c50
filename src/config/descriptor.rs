//! Module descriptor (`*.dir`) loading.

use std::path::Path;

use serde_json::Value;

use crate::config::loader::{read_file, ConfigError, Result};

/// Read a module descriptor and parse it as JSON.
pub fn load_module_descriptor(path: &Path) -> Result<Value> {
    let content = read_file(path)?;
    let value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "Module descriptor loaded");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_valid_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web.dir");
        fs::write(&path, r#"{"server":{"port":3000,"hosts":["a","b"]}}"#).unwrap();

        let value = load_module_descriptor(&path).unwrap();
        assert_eq!(value, json!({"server": {"port": 3000, "hosts": ["a", "b"]}}));
    }

    #[test]
    fn test_non_object_json_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.dir");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert_eq!(load_module_descriptor(&path).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_missing_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_module_descriptor(&dir.path().join("nope.dir")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web.dir");
        fs::write(&path, "{ server: ").unwrap();

        match load_module_descriptor(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.dir");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            load_module_descriptor(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
