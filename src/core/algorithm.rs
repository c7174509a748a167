//! The closed set of JWS algorithm names this tool understands.
//!
//! Strict parsing accepts the canonical spellings verbatim. Audit
//! canonicalization additionally folds the spellings attackers use to
//! slip an unsigned token past case-sensitive filters (`NONE`, `None`,
//! padded or NUL-terminated `none`, the empty string) into
//! [`Algorithm::None`].

use std::fmt;
use std::str::FromStr;

use crate::error::SemanticError;

/// A JWS `alg` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    HS256,
    HS384,
    HS512,
    RS256,
    RS384,
    RS512,
    ES256,
    ES384,
    ES512,
    PS256,
    PS384,
    PS512,
    /// Unsecured JWS (`"alg": "none"`).
    None,
}

/// Every accepted algorithm, signed ones first.
pub const ALL_ALGORITHMS: [Algorithm; 13] = [
    Algorithm::HS256,
    Algorithm::HS384,
    Algorithm::HS512,
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::ES256,
    Algorithm::ES384,
    Algorithm::ES512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
    Algorithm::None,
];

/// Literal spellings audit mode maps to `none` without normalization.
pub const NONE_SPELLINGS: [&str; 3] = ["none", "NONE", "None"];

impl Algorithm {
    /// Canonical header spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
            Algorithm::PS256 => "PS256",
            Algorithm::PS384 => "PS384",
            Algorithm::PS512 => "PS512",
            Algorithm::None => "none",
        }
    }

    /// Exact, case-sensitive lookup of a canonical spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_ALGORITHMS.into_iter().find(|alg| alg.as_str() == name)
    }

    /// Audit-mode canonicalization.
    ///
    /// Trims whitespace, lower-cases and strips NUL characters; anything
    /// that reduces to `none` or to nothing is `None`. Otherwise the raw
    /// value must be an exact signed-algorithm name or one of
    /// [`NONE_SPELLINGS`].
    pub fn canonicalize(raw: &str) -> Option<Self> {
        let folded: String = raw.trim().to_lowercase().replace('\0', "");
        if folded.is_empty() || folded == "none" {
            return Some(Algorithm::None);
        }

        if let Some(alg) = Self::from_name(raw) {
            return Some(alg);
        }

        NONE_SPELLINGS
            .contains(&raw)
            .then_some(Algorithm::None)
    }

    /// `HS*` family.
    pub fn is_symmetric(self) -> bool {
        self.as_str().starts_with("HS")
    }

    /// `RS*`, `ES*` and `PS*` families.
    pub fn is_asymmetric(self) -> bool {
        let name = self.as_str();
        name.starts_with("RS") || name.starts_with("ES") || name.starts_with("PS")
    }

    pub fn is_none(self) -> bool {
        self == Algorithm::None
    }

    /// Human-readable family label.
    pub fn family(self) -> &'static str {
        if self.is_symmetric() {
            "symmetric (HMAC)"
        } else if self.is_asymmetric() {
            "asymmetric"
        } else {
            "unsigned"
        }
    }

    /// Comma-separated list of accepted spellings for error messages.
    pub fn supported_list() -> String {
        ALL_ALGORITHMS
            .iter()
            .map(|alg| alg.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing: canonical spellings only.
impl FromStr for Algorithm {
    type Err = SemanticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SemanticError::UnsupportedAlgorithm {
            algorithm: serde_json::Value::from(s).to_string(),
            supported: Self::supported_list(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_round_trip() {
        for alg in ALL_ALGORITHMS {
            assert_eq!(alg.as_str().parse::<Algorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn test_strict_parse_rejects_case_variants_of_none() {
        for spelling in ["NONE", "None", " none ", "", "none\0"] {
            let err = spelling.parse::<Algorithm>().unwrap_err();
            assert!(matches!(err, SemanticError::UnsupportedAlgorithm { .. }));
        }
    }

    #[test]
    fn test_strict_parse_rejects_lowercase_signed_names() {
        assert!("hs256".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_canonicalize_folds_none_spellings() {
        for spelling in ["none", "NONE", "None", "nOnE", " none ", "", "none\0", "\0none\0"] {
            assert_eq!(
                Algorithm::canonicalize(spelling),
                Some(Algorithm::None),
                "spelling {spelling:?}"
            );
        }
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for spelling in ["NONE", "None", " none ", "", "none\0"] {
            let once = Algorithm::canonicalize(spelling).unwrap();
            assert_eq!(Algorithm::canonicalize(once.as_str()), Some(once));
        }
    }

    #[test]
    fn test_canonicalize_keeps_signed_names_verbatim() {
        assert_eq!(Algorithm::canonicalize("RS256"), Some(Algorithm::RS256));
        assert_eq!(Algorithm::canonicalize("PS512"), Some(Algorithm::PS512));
    }

    #[test]
    fn test_canonicalize_rejects_unknown_and_miscased_names() {
        assert_eq!(Algorithm::canonicalize("hs256"), None);
        assert_eq!(Algorithm::canonicalize(" HS256 "), None);
        assert_eq!(Algorithm::canonicalize("EdDSA"), None);
        assert_eq!(Algorithm::canonicalize("nonee"), None);
    }

    #[test]
    fn test_family_predicates() {
        assert!(Algorithm::HS384.is_symmetric());
        assert!(!Algorithm::HS384.is_asymmetric());
        for alg in [Algorithm::RS256, Algorithm::ES384, Algorithm::PS512] {
            assert!(alg.is_asymmetric());
            assert!(!alg.is_symmetric());
        }
        assert!(!Algorithm::None.is_symmetric());
        assert!(!Algorithm::None.is_asymmetric());
        assert!(Algorithm::None.is_none());
        assert_eq!(Algorithm::None.family(), "unsigned");
    }

    #[test]
    fn test_supported_list_names_all_thirteen() {
        let list = Algorithm::supported_list();
        assert_eq!(list.split(", ").count(), 13);
        assert!(list.starts_with("HS256"));
        assert!(list.ends_with("none"));
    }
}
