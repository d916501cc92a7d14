//! Validated identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// A name matching `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Object fields and named arguments are keyed by `Identifier`, so an
/// invalid name is rejected when the key is built rather than when it is
/// looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

/// Returned when a string is not a valid [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid identifier: '{0}'")]
pub struct InvalidIdentifier(pub String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidIdentifier> {
        let name = name.into();
        if Self::is_valid(&name) {
            Ok(Self(name))
        } else {
            Err(InvalidIdentifier(name))
        }
    }

    pub fn is_valid(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = InvalidIdentifier;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Identifier {
    type Error = InvalidIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for name in ["a", "_", "_private", "camelCase", "snake_case_2", "X9"] {
            assert!(Identifier::new(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for name in ["", "9lives", "with-dash", "with space", "dot.ted", "ünïcode"] {
            assert_eq!(
                Identifier::new(name),
                Err(InvalidIdentifier(name.to_string())),
                "{name}"
            );
        }
    }

    #[test]
    fn test_display_and_parse() {
        let id: Identifier = "name".parse().unwrap();
        assert_eq!(id.to_string(), "name");
        assert_eq!(id.as_str(), "name");
    }

    #[test]
    fn test_error_message() {
        let err = Identifier::new("1x").unwrap_err();
        assert_eq!(err.to_string(), "Invalid identifier: '1x'");
    }
}
