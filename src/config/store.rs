//! The loaded configuration directory and its read accessors.
//!
//! # Responsibilities
//! - Two-phase load: settings file first, then every `[Paths]` module
//! - Tolerate broken module descriptors (recorded, not fatal)
//! - Dotted-path lookups into module descriptors with default fallback
//! - Manual reload that swaps the whole state or keeps the old one
//!
//! # Design Decisions
//! - The store only exists once the settings file has been read, so there
//!   is no half-initialized state to guard against
//! - Lookups never fail: absence is `None` or the caller's default
//! - No internal locking; `reload` takes `&mut self`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::descriptor::load_module_descriptor;
use crate::config::events::{ConfigEvent, ListenerId, ListenerResult, Listeners};
use crate::config::loader::{load_settings, settings_path, ConfigError, Result};
use crate::config::paths::resolve_module_path;
use crate::config::settings::{RootConfig, SettingValue};
use crate::observability::metrics;

/// Config directory used when none is given.
pub const DEFAULT_CONFIG_DIR: &str = "ConfigDir";

/// Module names with dedicated accessors.
pub const AI_MODULE: &str = "aipart";
pub const HARDWARE_MODULE: &str = "hardware";
pub const MAIN_CODE_MODULE: &str = "maincode";
pub const WEB_MODULE: &str = "web";

/// A module descriptor that could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleFailure {
    /// Lower-cased module name.
    pub module: String,
    /// Resolved descriptor path; `None` when the entry was not a path.
    pub path: Option<PathBuf>,
    pub error: String,
}

/// Failures recorded by the most recent load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub failures: Vec<ModuleFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure(&self, module: &str) -> Option<&ModuleFailure> {
        let module = module.to_lowercase();
        self.failures.iter().find(|f| f.module == module)
    }
}

/// Everything produced by one pass over the config directory.
struct Snapshot {
    settings: RootConfig,
    modules: BTreeMap<String, Value>,
    report: LoadReport,
}

impl Snapshot {
    fn read(root_dir: &Path) -> Result<Self> {
        let settings = load_settings(root_dir)?;
        let (modules, report) = load_all_modules(root_dir, &settings);
        Ok(Self {
            settings,
            modules,
            report,
        })
    }
}

/// Load every descriptor named in `[Paths]`. Failures are collected.
fn load_all_modules(root_dir: &Path, settings: &RootConfig) -> (BTreeMap<String, Value>, LoadReport) {
    let mut modules = BTreeMap::new();
    let mut report = LoadReport::default();

    let Some(paths) = settings.paths() else {
        tracing::debug!("No [Paths] section, no modules to load");
        return (modules, report);
    };

    for (name, entry) in paths {
        let module = name.to_lowercase();

        let Some(raw) = entry.as_str() else {
            tracing::warn!(module = %module, value = %entry, "Module path is not a string, skipping");
            metrics::record_module_failure(&module);
            report.failures.push(ModuleFailure {
                module,
                path: None,
                error: format!("path entry is not a string: {}", entry),
            });
            continue;
        };

        let path = resolve_module_path(root_dir, raw);
        match load_module_descriptor(&path) {
            Ok(value) => {
                tracing::debug!(module = %module, path = %path.display(), "Module config loaded");
                modules.insert(module, value);
            }
            Err(e) => {
                tracing::warn!(module = %module, error = %e, "Failed to load module config, skipping");
                metrics::record_module_failure(&module);
                report.failures.push(ModuleFailure {
                    module,
                    path: Some(path),
                    error: e.to_string(),
                });
            }
        }
    }

    (modules, report)
}

/// Builder for a [`ConfigStore`], used to attach listeners before the
/// initial load.
#[derive(Debug, Default)]
pub struct ConfigStoreBuilder {
    root_dir: Option<PathBuf>,
    listeners: Listeners,
}

impl ConfigStoreBuilder {
    pub fn root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(dir.into());
        self
    }

    pub fn on_event<F>(mut self, event: ConfigEvent, callback: F) -> Self
    where
        F: Fn(ConfigEvent, &ConfigStore) -> ListenerResult + Send + Sync + 'static,
    {
        self.listeners.register(event, callback);
        self
    }

    /// Read the config directory and fire `Loaded` listeners.
    pub fn load(self) -> Result<ConfigStore> {
        let root_dir = self
            .root_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));

        let snapshot = Snapshot::read(&root_dir).inspect_err(|e| {
            tracing::error!(root_dir = %root_dir.display(), error = %e, "Config load failed");
        })?;

        let store = ConfigStore {
            root_dir,
            settings: snapshot.settings,
            modules: snapshot.modules,
            report: snapshot.report,
            listeners: self.listeners,
        };

        metrics::record_load("initial");
        metrics::record_modules_loaded(store.modules.len());
        tracing::info!(
            root_dir = %store.root_dir.display(),
            sections = store.settings.len(),
            modules = store.modules.len(),
            failed = store.report.failures.len(),
            "Config directory loaded"
        );

        store.listeners.fire(ConfigEvent::Loaded, &store);
        Ok(store)
    }
}

/// Settings plus module descriptors of one config directory.
#[derive(Debug)]
pub struct ConfigStore {
    root_dir: PathBuf,
    settings: RootConfig,
    modules: BTreeMap<String, Value>,
    report: LoadReport,
    listeners: Listeners,
}

impl ConfigStore {
    pub fn builder() -> ConfigStoreBuilder {
        ConfigStoreBuilder::default()
    }

    /// Load `<dir>/set.config` and its modules.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::builder().root_dir(dir).load()
    }

    /// Load from [`DEFAULT_CONFIG_DIR`].
    pub fn load_default() -> Result<Self> {
        Self::builder().load()
    }

    /// Re-read the settings file and all modules.
    ///
    /// On error the previous contents stay in place.
    pub fn reload(&mut self) -> Result<()> {
        tracing::info!(root_dir = %self.root_dir.display(), "Reloading config directory");

        let snapshot = match Snapshot::read(&self.root_dir) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                metrics::record_load("reload_failed");
                tracing::error!(error = %e, "Reload failed, keeping current configuration");
                return Err(e);
            }
        };

        self.settings = snapshot.settings;
        self.modules = snapshot.modules;
        self.report = snapshot.report;

        metrics::record_load("reload");
        metrics::record_modules_loaded(self.modules.len());
        tracing::info!(
            modules = self.modules.len(),
            failed = self.report.failures.len(),
            "Config directory reloaded"
        );

        self.listeners.fire(ConfigEvent::Reloaded, self);
        Ok(())
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        settings_path(&self.root_dir)
    }

    /// The parsed settings file.
    pub fn global_config(&self) -> &RootConfig {
        &self.settings
    }

    /// A single scalar from the settings file.
    pub fn setting(&self, section: &str, key: &str) -> Option<&SettingValue> {
        self.settings.get(section, key)
    }

    /// Descriptor of a module; the name is matched case-insensitively.
    pub fn module_config(&self, name: &str) -> Option<&Value> {
        self.modules.get(&name.to_lowercase())
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn ai_config(&self) -> Option<&Value> {
        self.module_config(AI_MODULE)
    }

    pub fn hardware_config(&self) -> Option<&Value> {
        self.module_config(HARDWARE_MODULE)
    }

    pub fn main_code_config(&self) -> Option<&Value> {
        self.module_config(MAIN_CODE_MODULE)
    }

    pub fn web_config(&self) -> Option<&Value> {
        self.module_config(WEB_MODULE)
    }

    /// Walk `dotted_path` (`"server.port"`) through a module descriptor.
    ///
    /// Returns `None` as soon as a step is not a JSON object or lacks the
    /// next key.
    pub fn lookup(&self, module: &str, dotted_path: &str) -> Option<&Value> {
        let mut current = self.module_config(module)?;
        for segment in dotted_path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Like [`lookup`](Self::lookup), falling back to `default`.
    pub fn get_value(&self, module: &str, dotted_path: &str, default: impl Into<Value>) -> Value {
        match self.lookup(module, dotted_path) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Typed lookup. `default` is returned when the value is absent or
    /// does not deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, module: &str, dotted_path: &str, default: T) -> T {
        self.lookup(module, dotted_path)
            .and_then(|value| T::deserialize(value).ok())
            .unwrap_or(default)
    }

    /// Failures recorded by the last load or reload.
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Pretty JSON of one module (`null` if not loaded) or, with `None`,
    /// of the settings and every loaded module.
    pub fn to_json(&self, module: Option<&str>) -> Result<String> {
        let tree = match module {
            Some(name) => self.module_config(name).cloned().unwrap_or(Value::Null),
            None => serde_json::json!({
                "global": self.settings.to_value(),
                "modules": self.modules,
            }),
        };
        serde_json::to_string_pretty(&tree).map_err(ConfigError::Serialize)
    }

    pub fn on_event<F>(&mut self, event: ConfigEvent, callback: F) -> ListenerId
    where
        F: Fn(ConfigEvent, &ConfigStore) -> ListenerResult + Send + Sync + 'static,
    {
        self.listeners.register(event, callback)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn web_store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "set.config", "[Paths]\nWeb = web.dir\n");
        write(dir.path(), "web.dir", r#"{"server":{"port":3000,"tls":false},"name":"site"}"#);
        let store = ConfigStore::load(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_module_names_are_lowercased() {
        let (_dir, store) = web_store();
        assert!(store.module_config("web").is_some());
        assert!(store.module_config("WEB").is_some());
        assert_eq!(store.module_names().collect::<Vec<_>>(), vec!["web"]);
        assert!(store.web_config().is_some());
        assert!(store.ai_config().is_none());
    }

    #[test]
    fn test_get_value_nested_and_default() {
        let (_dir, store) = web_store();
        assert_eq!(store.get_value("web", "server.port", 8080), json!(3000));
        assert_eq!(store.get_value("web", "server.missing", 8080), json!(8080));
        assert_eq!(store.get_value("hardware", "server.port", 8080), json!(8080));
    }

    #[test]
    fn test_get_value_through_scalar_returns_default() {
        let (_dir, store) = web_store();
        assert_eq!(store.get_value("web", "name.length", "none"), json!("none"));
        assert_eq!(store.get_value("web", "server.port.value", 1), json!(1));
        assert_eq!(store.get_value("web", "", 0), json!(0));
    }

    #[test]
    fn test_lookup_returns_subtree() {
        let (_dir, store) = web_store();
        assert_eq!(
            store.lookup("web", "server"),
            Some(&json!({"port": 3000, "tls": false}))
        );
    }

    #[test]
    fn test_get_as_typed() {
        let (_dir, store) = web_store();
        assert_eq!(store.get_as::<u16>("web", "server.port", 80), 3000);
        assert!(!store.get_as("web", "server.tls", true));
        // wrong type falls back
        assert_eq!(store.get_as::<u16>("web", "name", 80), 80);
    }

    #[test]
    fn test_to_json_single_and_all() {
        let (_dir, store) = web_store();
        let web: Value = serde_json::from_str(&store.to_json(Some("web")).unwrap()).unwrap();
        assert_eq!(web["server"]["port"], json!(3000));

        let missing = store.to_json(Some("ai")).unwrap();
        assert_eq!(missing, "null");

        let all: Value = serde_json::from_str(&store.to_json(None).unwrap()).unwrap();
        assert_eq!(all["global"]["Paths"]["Web"], json!("web.dir"));
        assert_eq!(all["modules"]["web"]["name"], json!("site"));
    }

    #[test]
    fn test_non_string_path_entry_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "set.config", "[Paths]\nflag = true\n");
        let store = ConfigStore::load(dir.path()).unwrap();

        let failure = store.load_report().failure("flag").unwrap();
        assert_eq!(failure.path, None);
        assert!(store.module_config("flag").is_none());
    }

    #[test]
    fn test_listeners_fire_in_order_and_can_be_removed() {
        let (_dir, mut store) = web_store();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        let id = store.on_event(ConfigEvent::Reloaded, move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        store.reload().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(store.remove_listener(id));
        assert!(!store.remove_listener(id));
        store.reload().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_listener_does_not_fail_reload() {
        let (_dir, mut store) = web_store();
        let seen = Arc::new(AtomicUsize::new(0));

        store.on_event(ConfigEvent::Reloaded, |_, _| Err("boom".into()));
        let s = seen.clone();
        store.on_event(ConfigEvent::Reloaded, move |event, store| {
            assert_eq!(event, ConfigEvent::Reloaded);
            assert!(store.web_config().is_some());
            s.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert!(store.reload().is_ok());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_builder_fires_loaded() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "set.config", "[General]\nname = x\n");
        let loaded = Arc::new(AtomicUsize::new(0));
        let reloaded = Arc::new(AtomicUsize::new(0));

        let l = loaded.clone();
        let r = reloaded.clone();
        let mut store = ConfigStore::builder()
            .root_dir(dir.path())
            .on_event(ConfigEvent::Loaded, move |_, _| {
                l.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .on_event(ConfigEvent::Reloaded, move |_, _| {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .load()
            .unwrap();

        assert_eq!(loaded.load(Ordering::SeqCst), 1);
        assert_eq!(reloaded.load(Ordering::SeqCst), 0);

        store.reload().unwrap();
        assert_eq!(loaded.load(Ordering::SeqCst), 1);
        assert_eq!(reloaded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_setting_accessor() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "set.config", "[General]\nworkers = 8\n");
        let store = ConfigStore::load(dir.path()).unwrap();
        assert_eq!(store.setting("General", "workers").and_then(SettingValue::as_i64), Some(8));
        assert_eq!(store.settings_path(), dir.path().join("set.config"));
    }
}
