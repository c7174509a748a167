//! Semantic checks on decoded headers and payloads.
//!
//! Strict mode turns every violation into a [`SemanticError`]. Audit
//! mode keeps the same checks but records most of them as warning
//! diagnostics, so suspicious tokens are decoded and flagged rather
//! than rejected.

use serde_json::{Map, Value};

use crate::core::algorithm::Algorithm;
use crate::core::diagnostics::Diagnostic;
use crate::core::mode::ValidationMode;
use crate::error::{SemanticError, TokenPart};

/// Registered claims that hold Unix timestamps.
pub const TIMESTAMP_CLAIMS: [&str; 3] = ["iat", "exp", "nbf"];

/// `typ` spellings audit mode accepts without a warning.
const AUDIT_TYP_SPELLINGS: [&str; 2] = ["JWT", "jwt"];

/// A header that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedHeader {
    pub algorithm: Algorithm,
    /// The header with `alg` rewritten to its canonical spelling.
    pub header: Value,
    pub diagnostics: Vec<Diagnostic>,
}

/// Validate the `alg` and `typ` header parameters.
///
/// # Errors
///
/// Fails when the header is not an object, or the algorithm is missing
/// (strict) or unsupported, or `typ` is not `"JWT"` (strict).
pub fn validate_header(
    header: Value,
    mode: ValidationMode,
) -> Result<ValidatedHeader, SemanticError> {
    let Value::Object(mut fields) = header else {
        return Err(SemanticError::NotAnObject {
            part: TokenPart::Header,
        });
    };

    let mut diagnostics = Vec::new();
    let algorithm = match mode {
        ValidationMode::Strict => strict_algorithm(fields.get("alg"))?,
        ValidationMode::Audit => audit_algorithm(fields.get("alg"), &mut diagnostics)?,
    };
    check_type(&fields, mode, &mut diagnostics)?;

    fields.insert("alg".to_string(), Value::from(algorithm.as_str()));

    Ok(ValidatedHeader {
        algorithm,
        header: Value::Object(fields),
        diagnostics,
    })
}

fn strict_algorithm(alg: Option<&Value>) -> Result<Algorithm, SemanticError> {
    match alg {
        None | Some(Value::Null) => Err(SemanticError::MissingAlgorithm),
        Some(Value::String(name)) if name.is_empty() => Err(SemanticError::MissingAlgorithm),
        Some(Value::String(name)) => name.parse(),
        Some(other) => Err(unsupported(other)),
    }
}

fn audit_algorithm(
    alg: Option<&Value>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Algorithm, SemanticError> {
    match alg {
        None | Some(Value::Null) => {
            tracing::warn!("header has no \"alg\"; treating as none");
            diagnostics.push(Diagnostic::warning(
                "header is missing the \"alg\" field; treating it as \"none\"",
            ));
            Ok(Algorithm::None)
        }
        Some(Value::String(raw)) => {
            let algorithm = Algorithm::canonicalize(raw)
                .ok_or_else(|| unsupported(&Value::from(raw.as_str())))?;
            if algorithm.as_str() != raw {
                diagnostics.push(Diagnostic::warning(format!(
                    "non-canonical algorithm {} normalized to \"{algorithm}\"",
                    Value::from(raw.as_str())
                )));
            }
            Ok(algorithm)
        }
        Some(other) => Err(unsupported(other)),
    }
}

fn unsupported(value: &Value) -> SemanticError {
    SemanticError::UnsupportedAlgorithm {
        algorithm: value.to_string(),
        supported: Algorithm::supported_list(),
    }
}

fn check_type(
    fields: &Map<String, Value>,
    mode: ValidationMode,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), SemanticError> {
    let typ = match fields.get("typ") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::String(typ)) if typ.is_empty() => return Ok(()),
        Some(typ) => typ,
    };

    match mode {
        ValidationMode::Strict => {
            if typ.as_str() == Some("JWT") {
                Ok(())
            } else {
                Err(SemanticError::UnsupportedType {
                    typ: typ.to_string(),
                })
            }
        }
        ValidationMode::Audit => {
            let accepted = typ
                .as_str()
                .is_some_and(|typ| AUDIT_TYP_SPELLINGS.contains(&typ));
            if !accepted {
                tracing::warn!(%typ, "non-standard token type");
                diagnostics.push(Diagnostic::warning(format!(
                    "non-standard token type {typ}; expected \"JWT\" or \"jwt\""
                )));
            }
            Ok(())
        }
    }
}

/// Validate the timestamp claims of a payload.
///
/// Returns the warnings recorded in audit mode; strict mode returns an
/// empty list or the first violation.
///
/// # Errors
///
/// Fails when the payload is not an object (both modes), or in strict
/// mode when a timestamp claim is not a non-negative number, `iat` is
/// after `exp`, or `nbf` is after `exp`.
pub fn validate_payload(
    payload: &Value,
    mode: ValidationMode,
) -> Result<Vec<Diagnostic>, SemanticError> {
    let Some(claims) = payload.as_object() else {
        return Err(SemanticError::NotAnObject {
            part: TokenPart::Payload,
        });
    };

    let mut diagnostics = Vec::new();

    for claim in TIMESTAMP_CLAIMS {
        if let Some(value) = claims.get(claim) {
            if timestamp(Some(value)).is_none() {
                let err = SemanticError::InvalidTimestamp {
                    claim,
                    value: value.to_string(),
                };
                report(mode, err, &mut diagnostics)?;
            }
        }
    }

    let iat = timestamp(claims.get("iat"));
    let exp = timestamp(claims.get("exp"));
    let nbf = timestamp(claims.get("nbf"));

    if let (Some(iat), Some(exp)) = (iat, exp) {
        if iat > exp {
            report(mode, SemanticError::IssuedAfterExpiry { iat, exp }, &mut diagnostics)?;
        }
    }

    if let (Some(nbf), Some(exp)) = (nbf, exp) {
        if nbf > exp {
            report(mode, SemanticError::NotBeforeAfterExpiry { nbf, exp }, &mut diagnostics)?;
        }
    }

    Ok(diagnostics)
}

/// A claim value usable as a Unix timestamp.
pub fn timestamp(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|seconds| *seconds >= 0.0)
}

/// Strict: fail. Audit: downgrade to a warning.
fn report(
    mode: ValidationMode,
    err: SemanticError,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), SemanticError> {
    match mode {
        ValidationMode::Strict => Err(err),
        ValidationMode::Audit => {
            tracing::warn!(error = %err, "claim check downgraded to warning");
            diagnostics.push(Diagnostic::warning(err.to_string()));
            Ok(())
        }
    }
}
