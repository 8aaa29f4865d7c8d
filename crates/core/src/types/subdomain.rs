//! Tenant subdomain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Subdomain`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SubdomainError {
    /// The input string is too short.
    #[error("subdomain must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("subdomain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("subdomain may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen.
    #[error("subdomain cannot start or end with a hyphen")]
    EdgeHyphen,
}

/// A tenant subdomain, the globally unique label a tenant logs in under.
///
/// Subdomains follow DNS-label rules: 3-63 characters, lowercase ASCII
/// letters, digits, and interior hyphens.
///
/// ## Examples
///
/// ```
/// use taskdeck_core::Subdomain;
///
/// assert!(Subdomain::parse("acme").is_ok());
/// assert!(Subdomain::parse("acme-corp").is_ok());
/// assert!(Subdomain::parse("-acme").is_err());
/// assert!(Subdomain::parse("Acme").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Subdomain(String);

impl Subdomain {
    /// Minimum subdomain length.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum subdomain length (DNS label limit).
    pub const MAX_LENGTH: usize = 63;

    /// Parse a `Subdomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is shorter than 3 or longer than 63
    /// characters, contains anything other than `[a-z0-9-]`, or starts or
    /// ends with a hyphen.
    pub fn parse(s: &str) -> Result<Self, SubdomainError> {
        if s.len() < Self::MIN_LENGTH {
            return Err(SubdomainError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SubdomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SubdomainError::InvalidCharacter);
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(SubdomainError::EdgeHyphen);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the subdomain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Subdomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Subdomain {
    type Err = SubdomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Subdomain {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Subdomain {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Subdomain {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Subdomain::parse("acme").is_ok());
        assert!(Subdomain::parse("acme-corp").is_ok());
        assert!(Subdomain::parse("team42").is_ok());
        assert!(Subdomain::parse("abc").is_ok());
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Subdomain::parse("ab"),
            Err(SubdomainError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(64);
        assert!(matches!(
            Subdomain::parse(&long),
            Err(SubdomainError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_uppercase_and_symbols() {
        assert!(matches!(
            Subdomain::parse("Acme"),
            Err(SubdomainError::InvalidCharacter)
        ));
        assert!(matches!(
            Subdomain::parse("acme.corp"),
            Err(SubdomainError::InvalidCharacter)
        ));
        assert!(matches!(
            Subdomain::parse("acme corp"),
            Err(SubdomainError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_rejects_edge_hyphens() {
        assert!(matches!(
            Subdomain::parse("-acme"),
            Err(SubdomainError::EdgeHyphen)
        ));
        assert!(matches!(
            Subdomain::parse("acme-"),
            Err(SubdomainError::EdgeHyphen)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let subdomain = Subdomain::parse("acme").unwrap();
        let json = serde_json::to_string(&subdomain).unwrap();
        assert_eq!(json, "\"acme\"");

        let parsed: Subdomain = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, subdomain);
    }
}
