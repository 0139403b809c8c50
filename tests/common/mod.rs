//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway config directory.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `set.config`.
    pub fn settings(&self, content: &str) -> &Self {
        self.file("set.config", content)
    }

    /// Write any file relative to the directory, creating parents.
    pub fn file(&self, name: &str, content: &str) -> &Self {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.dir.path().join(name)).unwrap();
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Directory with the four well-known modules, one of them broken.
pub fn standard_fixture() -> Fixture {
    let fx = Fixture::new();
    fx.settings(
        "; root settings\n\
         [General]\n\
         name = Compear\n\
         debug = False\n\
         version = 1.5\n\
         \n\
         [Paths]\n\
         AIPart = aipart.dir\n\
         Hardware = devices/hardware.dir\n\
         MainCode = maincode.dir\n\
         Web = web.dir\n",
    )
    .file("aipart.dir", r#"{"version":"2.1","ai_provider":"local","model":{"name":"tiny","layers":4}}"#)
    .file("devices/hardware.dir", r#"{"serial":{"port":"/dev/ttyUSB0","baud":115200}}"#)
    .file("maincode.dir", "{ this is not json")
    .file("web.dir", r#"{"server":{"port":3000,"host":"0.0.0.0"}}"#);
    fx
}
