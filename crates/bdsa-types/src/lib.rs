//! Validated identifier types for the BDSA case/stain/region protocol.
//!
//! Each type wraps a `String` that is guaranteed to match its format once
//! constructed. Raw strings coming off the wire may carry malformed values;
//! those are rejected at the `parse` boundary (or reported by the aggregate
//! validators in `bdsa-core`, which delegate to the predicates here).

/// Errors that can occur when creating validated identifier types.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The input was empty or contained only whitespace.
    #[error("identifier cannot be empty")]
    Empty,
    /// The input did not match the required format.
    #[error("'{value}' does not match the {expected} format")]
    Format { value: String, expected: &'static str },
}

/// An institution-qualified BDSA case identifier.
///
/// Exact format `BDSA-###-####`: a literal `BDSA` tag, a 3-digit institution
/// code, and a 4-digit case number. No other lengths, separators, or letter
/// cases are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BdsaCaseId(String);

impl BdsaCaseId {
    /// Parses an identifier, rejecting anything that is not `BDSA-###-####`.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, IdError> {
        let s = input.as_ref();
        if s.trim().is_empty() {
            return Err(IdError::Empty);
        }
        if !Self::is_valid(s) {
            return Err(IdError::Format {
                value: s.to_owned(),
                expected: "BDSA-###-####",
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Exact-match test against the `BDSA-###-####` pattern.
    pub fn is_valid(s: &str) -> bool {
        let b = s.as_bytes();
        b.len() == 13
            && b.starts_with(b"BDSA-")
            && b[5..8].iter().all(u8::is_ascii_digit)
            && b[8] == b'-'
            && b[9..13].iter().all(u8::is_ascii_digit)
    }

    /// The 3-digit institution code segment.
    pub fn institution_code(&self) -> &str {
        &self.0[5..8]
    }

    /// The 4-digit case number segment.
    pub fn case_number(&self) -> &str {
        &self.0[9..13]
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A 3-digit institution code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstitutionId(String);

impl InstitutionId {
    /// Parses an institution code; exactly three ASCII digits.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, IdError> {
        let s = input.as_ref();
        if s.trim().is_empty() {
            return Err(IdError::Empty);
        }
        if !Self::is_valid(s) {
            return Err(IdError::Format {
                value: s.to_owned(),
                expected: "3-digit institution code",
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// True iff the input is exactly three ASCII digits.
    pub fn is_valid(s: &str) -> bool {
        s.len() == 3 && s.bytes().all(|b| b.is_ascii_digit())
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A local (institution-internal) case identifier.
///
/// Letters, digits, and hyphens, matched case-insensitively. These come from
/// lab filenames and accession systems, so the format is deliberately loose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalCaseId(String);

impl LocalCaseId {
    /// Parses a local case identifier.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, IdError> {
        let s = input.as_ref();
        if s.trim().is_empty() {
            return Err(IdError::Empty);
        }
        if !Self::is_valid(s) {
            return Err(IdError::Format {
                value: s.to_owned(),
                expected: "local case identifier (letters, digits, hyphens)",
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// True iff the input is non-empty and contains only letters, digits,
    /// and hyphens.
    pub fn is_valid(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_newtype_impls {
    ($ty:ident) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $ty::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_newtype_impls!(BdsaCaseId);
string_newtype_impls!(InstitutionId);
string_newtype_impls!(LocalCaseId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_bdsa_case_id() {
        let id = BdsaCaseId::parse("BDSA-001-2024").expect("valid id");
        assert_eq!(id.institution_code(), "001");
        assert_eq!(id.case_number(), "2024");
        assert_eq!(id.as_str(), "BDSA-001-2024");
    }

    #[test]
    fn rejects_short_institution_code() {
        let err = BdsaCaseId::parse("BDSA-1-2024").expect_err("should reject 1-digit code");
        assert!(matches!(err, IdError::Format { .. }));
    }

    #[test]
    fn rejects_lowercase_tag() {
        assert!(!BdsaCaseId::is_valid("bdsa-001-2024"));
    }

    #[test]
    fn rejects_empty_bdsa_case_id() {
        let err = BdsaCaseId::parse("   ").expect_err("should reject whitespace");
        assert!(matches!(err, IdError::Empty));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(!BdsaCaseId::is_valid("BDSA-001-20245"));
        assert!(!BdsaCaseId::is_valid("BDSA-001-2024x"));
    }

    #[test]
    fn institution_id_requires_exactly_three_digits() {
        assert!(InstitutionId::is_valid("501"));
        assert!(!InstitutionId::is_valid("50"));
        assert!(!InstitutionId::is_valid("5011"));
        assert!(!InstitutionId::is_valid("5a1"));
    }

    #[test]
    fn local_case_id_is_case_insensitive() {
        assert!(LocalCaseId::is_valid("550058"));
        assert!(LocalCaseId::is_valid("Case-2024-b"));
        assert!(!LocalCaseId::is_valid("case_2024"));
        assert!(!LocalCaseId::is_valid(""));
    }

    #[test]
    fn serde_round_trips_and_validates() {
        let id: BdsaCaseId = serde_json::from_str("\"BDSA-501-0042\"").expect("valid json id");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"BDSA-501-0042\"");

        let bad: Result<BdsaCaseId, _> = serde_json::from_str("\"BDSA-501-42\"");
        assert!(bad.is_err());
    }
}
