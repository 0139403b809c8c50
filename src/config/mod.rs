//! Configuration directory loading.
//!
//! # Data Flow
//! ```text
//! <root>/set.config
//!     → settings.rs (INI-like parse, typed scalars)
//!     → RootConfig
//!
//! RootConfig [Paths] entries
//!     → paths.rs (resolve against <root>)
//!     → descriptor.rs (read + JSON parse, one per module)
//!     → module map (lower-cased names)
//!
//! store.rs owns both maps, answers lookups and runs reloads;
//! events.rs notifies listeners after a load or reload.
//! ```
//!
//! # Design Decisions
//! - A missing settings file is fatal; a broken module descriptor is not
//! - Reload builds a fresh snapshot and swaps it in only on success
//! - Settings parsing is permissive: unknown lines are skipped

pub mod descriptor;
pub mod events;
pub mod loader;
pub mod paths;
pub mod settings;
pub mod store;

pub use events::{ConfigEvent, ListenerId, ListenerResult};
pub use loader::{ConfigError, Result};
pub use settings::{parse_settings, RootConfig, SettingValue};
pub use store::{ConfigStore, ConfigStoreBuilder, LoadReport, ModuleFailure, DEFAULT_CONFIG_DIR};
