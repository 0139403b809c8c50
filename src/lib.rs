//! Loader for a config directory: an INI-like `set.config` whose `[Paths]`
//! section names one JSON descriptor file per module.
//!
//! ```no_run
//! use confdir::ConfigStore;
//!
//! let store = ConfigStore::load("/etc/compear/ConfigDir")?;
//! let port = store.get_value("web", "server.port", 8080);
//! println!("web port: {}", port);
//! # Ok::<(), confdir::ConfigError>(())
//! ```

pub mod config;
pub mod observability;

pub use config::{ConfigError, ConfigEvent, ConfigStore, RootConfig, SettingValue, DEFAULT_CONFIG_DIR};
