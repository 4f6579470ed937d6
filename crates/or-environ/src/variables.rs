//! Core variable store
//!
//! Variables arrive as one flat string of `key=value` pairs separated by `;`.
//! The string is parsed once into an ordered mapping; lookups are exact key
//! matches, so `X` never matches `XY=1`.

use std::ffi::{CStr, CString};
use tracing::{trace, warn};

/// Separator between `key=value` pairs
pub const VARIABLE_DELIMITER: char = ';';

/// `CString` from `s`, truncated at the first NUL byte
fn c_string(s: &str) -> CString {
    let end = s.find('\0').unwrap_or(s.len());
    CString::new(&s[..end]).unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    raw: CString,
    entries: Vec<(String, CString)>,
}

impl VariableStore {
    /// Parse a raw variable string.
    ///
    /// Empty tokens are ignored, tokens without `=` are logged and skipped,
    /// and the first definition of a key wins.
    pub fn parse(raw: &str) -> Self {
        let raw = c_string(raw);
        let mut entries: Vec<(String, CString)> = Vec::new();

        for token in raw.to_string_lossy().split(VARIABLE_DELIMITER) {
            if token.is_empty() {
                continue;
            }
            let Some((key, value)) = token.split_once('=') else {
                warn!("Ignoring malformed core variable \"{}\"", token);
                continue;
            };
            if entries.iter().any(|(k, _)| k == key) {
                warn!("Core variable \"{}\" defined twice, keeping the first value", key);
                continue;
            }
            trace!("Core variable {} = {}", key, value);
            entries.push((key.to_string(), c_string(value)));
        }

        Self { raw, entries }
    }

    /// The unparsed string, for bulk queries
    pub fn raw(&self) -> &CStr {
        &self.raw
    }

    /// Value for exactly `key`
    pub fn get(&self, key: &str) -> Option<&CStr> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_c_str())
    }

    /// `(key, value)` pairs in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CStr)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_c_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
