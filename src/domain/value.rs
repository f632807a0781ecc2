use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// e-Business Register account user name.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// Body field name used by the register (`ariregister_kasutajanimi`).
    pub const FIELD: &'static str = "ariregister_kasutajanimi";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated user name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// e-Business Register account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
/// `Debug` output never shows the value.
pub struct Password(String);

impl Password {
    /// Body field name used by the register (`ariregister_parool`).
    pub const FIELD: &'static str = "ariregister_parool";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Response language requested from the register (`keel`).
pub enum Language {
    #[default]
    Eng,
    Est,
}

impl Language {
    /// Body field name used by the register (`keel`).
    pub const FIELD: &'static str = "keel";

    /// Every accepted language code, in display order.
    pub const ALLOWED: [&'static str; 2] = ["eng", "est"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eng => "eng",
            Self::Est => "est",
        }
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "eng" => Ok(Self::Eng),
            "est" => Ok(Self::Est),
            _ => Err(ValidationError::InvalidLanguage {
                input: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which register deployment to talk to.
pub enum Environment {
    #[default]
    Production,
    Test,
}

impl Environment {
    /// WSDL document URL for this deployment.
    pub fn service_url(self) -> &'static str {
        match self {
            Self::Production => "https://ariregxmlv6.rik.ee/?wsdl",
            Self::Test => "https://demo-ariregxmlv6.rik.ee/?wsdl",
        }
    }

    /// SOAP endpoint requests are posted to.
    pub fn service_endpoint(self) -> &'static str {
        match self {
            Self::Production => "https://ariregxmlv6.rik.ee/",
            Self::Test => "https://demo-ariregxmlv6.rik.ee/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Remote operation identifier (e.g. `lihtandmed_v2`).
///
/// Invariant: a valid XML element name, so it can be used as the body element
/// without escaping.
pub struct OperationName(String);

impl OperationName {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if !is_xml_name(trimmed) {
            return Err(ValidationError::InvalidOperationName { input: value });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ASCII subset of XML `NCName`: a letter or `_`, then letters, digits, `_`,
/// `-` or `.`.
pub(crate) fn is_xml_name(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}
