//! Flat key-value configuration storage and lookup.
//!
//! Values are kept as written; coercion to numbers, strings and booleans
//! happens at lookup time and never fails loudly. A value that cannot be
//! coerced reads as absent so the caller's default applies.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

/// Maximum number of keys in a [`ConfigTable`].
pub const MAX_CONFIG_KEYS: usize = 128;

/// Maximum key length in a [`ConfigTable`].
pub const MAX_KEY_LEN: usize = 48;

/// Maximum length of a text value in a [`ConfigTable`].
pub const MAX_TEXT_LEN: usize = 64;

/// A single raw configuration value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// `true` / `false`
    Bool(bool),
    /// Integer or float, stored as f32
    Number(f32),
    /// Anything else
    Text(String<MAX_TEXT_LEN>),
}

impl ConfigValue {
    /// Read as a number. Numeric text is accepted.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            ConfigValue::Text(s) => s.trim().parse::<f32>().ok(),
            ConfigValue::Bool(_) => None,
        }
    }

    /// Read as text. Only text values qualify.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Read as a flag. Text values `true`, `yes`, `on` and `1` read as set,
    /// any other text as clear.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::Number(n) => Some(*n != 0.0),
            ConfigValue::Text(s) => {
                let s = s.trim();
                Some(
                    s.eq_ignore_ascii_case("true")
                        || s.eq_ignore_ascii_case("yes")
                        || s.eq_ignore_ascii_case("on")
                        || s == "1",
                )
            }
        }
    }
}

/// Resolver for symbolic configuration keys.
///
/// Every lookup returns `None` for a missing or uncoercible key; callers
/// supply the default.
pub trait ConfigSource {
    /// Look up the raw value for `key`.
    fn value(&self, key: &str) -> Option<&ConfigValue>;

    /// Look up a number.
    fn number(&self, key: &str) -> Option<f32> {
        self.value(key).and_then(ConfigValue::as_number)
    }

    /// Look up a text value.
    fn text(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(ConfigValue::as_str)
    }

    /// Look up a flag.
    fn flag(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(ConfigValue::as_bool)
    }

    /// Number with a default.
    fn number_or(&self, key: &str, default: f32) -> f32 {
        self.number(key).unwrap_or(default)
    }

    /// Text with a default.
    fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.text(key).unwrap_or(default)
    }

    /// Flag with a default.
    fn flag_or(&self, key: &str, default: bool) -> bool {
        self.flag(key).unwrap_or(default)
    }
}

/// Fixed-capacity flat configuration table.
///
/// Deserializes from a flat TOML document (`key = value` pairs at the top
/// level) and can be built by hand on targets without a parser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ConfigTable {
    entries: FnvIndexMap<String<MAX_KEY_LEN>, ConfigValue, MAX_CONFIG_KEYS>,
}

impl ConfigTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
        }
    }

    /// Set a value. Returns `false` if the key is too long or the table is full.
    pub fn set(&mut self, key: &str, value: ConfigValue) -> bool {
        let Ok(key) = String::try_from(key) else {
            return false;
        };
        self.entries.insert(key, value).is_ok()
    }

    /// Set a numeric value.
    pub fn set_number(&mut self, key: &str, value: f32) -> bool {
        self.set(key, ConfigValue::Number(value))
    }

    /// Set a text value. Returns `false` if the text does not fit.
    pub fn set_text(&mut self, key: &str, value: &str) -> bool {
        match String::try_from(value) {
            Ok(text) => self.set(key, ConfigValue::Text(text)),
            Err(_) => false,
        }
    }

    /// Set a flag.
    pub fn set_flag(&mut self, key: &str, value: bool) -> bool {
        self.set(key, ConfigValue::Bool(value))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }
}

impl ConfigSource for ConfigTable {
    fn value(&self, key: &str) -> Option<&ConfigValue> {
        let key: String<MAX_KEY_LEN> = String::try_from(key).ok()?;
        self.entries.get(&key)
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for &S {
    fn value(&self, key: &str) -> Option<&ConfigValue> {
        (**self).value(key)
    }
}
