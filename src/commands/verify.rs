//! Handler for the `verify` subcommand.
//!
//! Decodes a JWT under the selected policy and verifies its signature
//! with an HMAC shared secret. Tokens declaring `alg: none` are reported
//! as accepted without verification; asymmetric algorithms are reported
//! as unsupported.

use anyhow::{Context, Result};
use jwt_audit::{AuditError, JwtDecoder, Verification};
use serde_json::json;

use crate::cli::VerifyArgs;
use crate::display::json_printer::diagnostics_json;
use crate::display::token_status::render_diagnostics;

/// Execute the `verify` subcommand with the given arguments.
///
/// Returns whether the signature was accepted.
pub fn execute(args: &VerifyArgs) -> Result<bool> {
    let token = super::resolve_token(args.token.as_deref(), args.token_env.as_deref())?;
    let secret = super::resolve_secret(args.secret.as_ref(), args.secret_env.as_deref())?;

    let mut decoder = JwtDecoder::new(args.mode.into());
    let result = decoder.decode(&token)?;
    let decoded = decoder
        .token()
        .context("decoder holds no token after a successful decode")?;

    let algorithm = decoded.algorithm();
    if algorithm.is_symmetric() && secret.is_none() {
        return Err(AuditError::NoSecretProvided {
            algorithm: algorithm.to_string(),
        }
        .into());
    }

    let secret_bytes = secret.as_ref().map(|s| s.as_bytes()).unwrap_or_default();
    let verification = decoded.check_signature(secret_bytes);

    if args.json {
        let document = json!({
            "valid": verification.is_valid(),
            "outcome": outcome_label(&verification),
            "reason": verification.to_string(),
            "algorithm": algorithm.as_str(),
            "diagnostics": diagnostics_json(&result.diagnostics),
        });
        println!("{document:#}");
    } else {
        print!("{}", render_diagnostics(&result.diagnostics));
        let verdict = if verification.is_valid() {
            "VALID"
        } else {
            "INVALID"
        };
        println!("Signature:   {verdict} ({verification})");
    }

    Ok(verification.is_valid())
}

/// Stable identifier for each verification outcome.
fn outcome_label(verification: &Verification) -> &'static str {
    match verification {
        Verification::Valid => "valid",
        Verification::Unsigned => "unsigned",
        Verification::Mismatch => "mismatch",
        Verification::Unsupported { .. } => "unsupported",
        Verification::NoToken => "no_token",
    }
}
