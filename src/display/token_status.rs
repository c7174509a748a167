//! Token status display for temporal claims and algorithm family.
//!
//! Renders human-readable status information for a decoded token:
//! - algorithm and its family, and whether a signature is present
//! - `iat`, `nbf` and `exp` as RFC 3339 times
//! - overall status: "EXPIRED", "NOT YET VALID" or "VALID"

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use jwt_audit::core::model::format_timestamp;
use jwt_audit::{DecodedToken, Diagnostic};

/// Render the status block of `token` as evaluated at `now`.
pub fn render_token_status(token: &DecodedToken, now: DateTime<Utc>) -> String {
    let mut out = String::from("--- Token Status ---\n");
    let algorithm = token.algorithm();

    let _ = writeln!(out, "Algorithm:   {algorithm} ({})", algorithm.family());
    let signature = if token.has_signature() {
        "present"
    } else {
        "missing"
    };
    let _ = writeln!(out, "Signature:   {signature}");

    for (label, claim) in [("Issued at:  ", "iat"), ("Not before: ", "nbf")] {
        if let Some(rendered) = token.claim_timestamp(claim).and_then(format_timestamp) {
            let _ = writeln!(out, "{label} {rendered}");
        }
    }

    match token.claim_timestamp("exp").and_then(format_timestamp) {
        Some(rendered) => {
            let _ = writeln!(
                out,
                "Expires:     {rendered} ({})",
                token.time_until_expiration_at(now)
            );
        }
        None => {
            let _ = writeln!(out, "Expires:     {}", token.time_until_expiration_at(now));
        }
    }

    let status = if token.is_expired_at(now) {
        "EXPIRED"
    } else if !token.is_valid_for_use_at(now) {
        "NOT YET VALID"
    } else {
        "VALID"
    };
    let _ = writeln!(out, "Status:      {status}");

    if token.uses_none_algorithm() {
        out.push_str("Warning:     token is unsigned (alg \"none\")\n");
    } else if token.uses_asymmetric_algorithm() {
        out.push_str("Note:        asymmetric signatures are not verified by this tool\n");
    }

    out
}

/// Render the diagnostics block, or nothing when there are none.
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let mut out = String::from("--- Diagnostics ---\n");
    for diagnostic in diagnostics {
        let _ = writeln!(out, "{diagnostic}");
    }
    out
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::TimeZone;
    use jwt_audit::{JwtDecoder, ValidationMode};
    use serde_json::{Value, json};

    use super::*;

    fn decode(mode: ValidationMode, header: Value, payload: Value, signature: &str) -> JwtDecoder {
        let raw = format!(
            "{}.{}.{signature}",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(payload.to_string())
        );
        let mut decoder = JwtDecoder::new(mode);
        decoder.decode(&raw).unwrap();
        decoder
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn test_valid_token_status() {
        let decoder = decode(
            ValidationMode::Strict,
            json!({"alg": "HS256"}),
            json!({"iat": 1000, "exp": 1_000_000}),
            "c2ln",
        );
        let rendered = render_token_status(decoder.token().unwrap(), at(2000));

        assert!(rendered.contains("Token Status"));
        assert!(rendered.contains("Algorithm:   HS256 (symmetric (HMAC))"));
        assert!(rendered.contains("Signature:   present"));
        assert!(rendered.contains("Issued at:   1970-01-01T00:16:40Z"));
        assert!(rendered.contains("Status:      VALID"));
    }

    #[test]
    fn test_expired_token_status() {
        let decoder = decode(
            ValidationMode::Strict,
            json!({"alg": "HS256"}),
            json!({"exp": 1000}),
            "c2ln",
        );
        let rendered = render_token_status(decoder.token().unwrap(), at(2000));
        assert!(rendered.contains("(Expired)"));
        assert!(rendered.contains("Status:      EXPIRED"));
    }

    #[test]
    fn test_not_yet_valid_token_status() {
        let decoder = decode(
            ValidationMode::Strict,
            json!({"alg": "HS256"}),
            json!({"nbf": 5000}),
            "c2ln",
        );
        let rendered = render_token_status(decoder.token().unwrap(), at(2000));
        assert!(rendered.contains("Not before:  1970-01-01T01:23:20Z"));
        assert!(rendered.contains("Expires:     No expiration"));
        assert!(rendered.contains("Status:      NOT YET VALID"));
    }

    #[test]
    fn test_unsigned_token_status_warns() {
        let decoder = decode(
            ValidationMode::Audit,
            json!({"alg": "none"}),
            json!({"sub": "x"}),
            "",
        );
        let rendered = render_token_status(decoder.token().unwrap(), at(0));
        assert!(rendered.contains("Signature:   missing"));
        assert!(rendered.contains("unsigned"));
    }

    #[test]
    fn test_asymmetric_token_status_note() {
        let decoder = decode(ValidationMode::Strict, json!({"alg": "ES256"}), json!({}), "c2ln");
        let rendered = render_token_status(decoder.token().unwrap(), at(0));
        assert!(rendered.contains("asymmetric"));
    }

    #[test]
    fn test_render_diagnostics() {
        assert_eq!(render_diagnostics(&[]), "");
        let rendered = render_diagnostics(&[Diagnostic::warning("odd typ")]);
        assert_eq!(rendered, "--- Diagnostics ---\n[warning] odd typ\n");
    }
}
