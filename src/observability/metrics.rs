//! Metrics recorded while loading configuration.
//!
//! # Metrics
//! - `confdir_loads_total` (counter): completed loads by `kind`
//!   (`initial`, `reload`, `reload_failed`)
//! - `confdir_module_failures_total` (counter): skipped descriptors by `module`
//! - `confdir_modules_loaded` (gauge): modules held after the last load

pub fn record_load(kind: &'static str) {
    ::metrics::counter!("confdir_loads_total", "kind" => kind).increment(1);
}

pub fn record_module_failure(module: &str) {
    ::metrics::counter!("confdir_module_failures_total", "module" => module.to_string()).increment(1);
}

pub fn record_modules_loaded(count: usize) {
    ::metrics::gauge!("confdir_modules_loaded").set(count as f64);
}
