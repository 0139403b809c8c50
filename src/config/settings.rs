//! Root settings file (`set.config`) parsing.
//!
//! # Grammar
//! ```text
//! ; comment
//! [Section]
//! key = value
//! ```
//!
//! # Design Decisions
//! - One pass, line oriented, no error path: anything that is not a
//!   comment, a section header or a `key = value` line inside a section
//!   is skipped
//! - Re-opening a section discards what it held before
//! - Values are typed on the way in (bool, integer, float, string)

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Name of the section that maps module names to descriptor files.
pub const PATHS_SECTION: &str = "Paths";

/// A scalar read from the settings file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl SettingValue {
    /// Infer the type of a raw (already trimmed) value.
    pub fn infer(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            return SettingValue::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return SettingValue::Bool(false);
        }
        if is_decimal_number(raw) {
            if !raw.contains(['.', 'e', 'E']) {
                if let Ok(n) = raw.parse::<i64>() {
                    return SettingValue::Integer(n);
                }
            }
            if let Ok(f) = raw.parse::<f64>() {
                if f.is_finite() {
                    return SettingValue::Float(f);
                }
            }
        }
        SettingValue::Text(raw.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Integer(n) => Some(*n as f64),
            SettingValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Integer(n) => write!(f, "{}", n),
            SettingValue::Float(x) => write!(f, "{}", x),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&SettingValue> for Value {
    fn from(value: &SettingValue) -> Self {
        match value {
            SettingValue::Bool(b) => Value::Bool(*b),
            SettingValue::Integer(n) => Value::from(*n),
            SettingValue::Float(f) => Value::from(*f),
            SettingValue::Text(s) => Value::String(s.clone()),
        }
    }
}

/// Key/value table of one settings section.
pub type Section = BTreeMap<String, SettingValue>;

/// Parsed settings file: section name to key/value table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RootConfig {
    sections: BTreeMap<String, Section>,
}

impl RootConfig {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&SettingValue> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    /// The module-name to descriptor-path table, if present.
    pub fn paths(&self) -> Option<&Section> {
        self.section(PATHS_SECTION)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// JSON view of the whole settings tree.
    pub fn to_value(&self) -> Value {
        let map = self
            .sections
            .iter()
            .map(|(name, section)| {
                let table = section
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect::<serde_json::Map<_, _>>();
                (name.clone(), Value::Object(table))
            })
            .collect::<serde_json::Map<_, _>>();
        Value::Object(map)
    }
}

/// Parse settings text into a [`RootConfig`].
pub fn parse_settings(content: &str) -> RootConfig {
    let mut sections: BTreeMap<String, Section> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim().to_string();
            sections.insert(name.clone(), Section::new());
            current = Some(name);
            continue;
        }

        let (Some(name), Some((key, raw))) = (current.as_deref(), line.split_once('=')) else {
            continue;
        };

        if let Some(section) = sections.get_mut(name) {
            section.insert(key.trim().to_string(), SettingValue::infer(raw.trim()));
        }
    }

    RootConfig { sections }
}

/// Optional sign, digits, optional fraction, optional exponent.
fn is_decimal_number(s: &str) -> bool {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
        None => (unsigned, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}
