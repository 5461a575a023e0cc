// ── Device identifier ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Longest identifier accepted. IMEIs are 15 digits (16 for IMEISV); the
/// slack covers vendor-padded serials.
pub const MAX_IMEI_LEN: usize = 20;

/// A device identifier: a trimmed, non-empty string of ASCII digits.
///
/// Input lists keep duplicates and order; `Imei` itself carries no
/// identity beyond its digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Imei(String);

impl Imei {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::invalid_input("IMEI must not be empty"));
        }
        if trimmed.len() > MAX_IMEI_LEN {
            return Err(CoreError::invalid_input(format!(
                "IMEI '{trimmed}' is longer than {MAX_IMEI_LEN} digits"
            )));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::invalid_input(format!(
                "IMEI '{trimmed}' must contain only digits"
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Imei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Imei {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Imei {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Imei> for String {
    fn from(imei: Imei) -> Self {
        imei.0
    }
}

impl AsRef<str> for Imei {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split pasted text into identifiers.
///
/// Commas and any whitespace separate entries; empty fragments are
/// dropped. Order and duplicates are preserved. One malformed entry
/// rejects the whole list.
pub fn parse_imei_list(text: &str) -> Result<Vec<Imei>, CoreError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(Imei::parse)
        .collect()
}
