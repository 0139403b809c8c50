//! Resolution of `[Paths]` entries against the config directory.

use std::path::{Path, PathBuf};

/// True when the raw entry should be used as-is.
///
/// An entry counts as absolute when it starts with a root separator or
/// carries a drive-style colon anywhere (`C:/cfg/web.dir`).
pub fn is_absolute_entry(raw: &str) -> bool {
    raw.starts_with('/') || raw.starts_with('\\') || raw.contains(':')
}

/// Resolve a descriptor path entry relative to `root_dir`.
pub fn resolve_module_path(root_dir: &Path, raw: &str) -> PathBuf {
    if is_absolute_entry(raw) {
        PathBuf::from(raw)
    } else {
        root_dir.join(raw)
    }
}
