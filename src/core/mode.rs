//! Validation policy selection.

use std::fmt;

/// How strictly a token is judged.
///
/// `Strict` is the default everywhere. `Audit` is the permissive
/// attack-inspection policy: it admits 2-4 segment tokens, empty
/// signatures, missing or oddly spelled `none` algorithms, and turns
/// claim inconsistencies into warnings instead of failures. It must be
/// selected explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    #[default]
    Strict,
    Audit,
}

impl ValidationMode {
    pub fn is_audit(self) -> bool {
        self == ValidationMode::Audit
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Strict => f.write_str("strict"),
            ValidationMode::Audit => f.write_str("audit"),
        }
    }
}
