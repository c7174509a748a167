//! Handler for the `decode` subcommand.
//!
//! Validates and decodes a JWT under the selected policy and prints its
//! header, payload, diagnostics and token status without verifying the
//! signature. Supports reading the token from a CLI argument,
//! environment variable, or stdin.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use jwt_audit::core::time_travel::parse_time_expression;
use jwt_audit::{DecodeResult, DecodedToken, JwtDecoder};
use serde_json::{Value, json};

use crate::cli::DecodeArgs;
use crate::display::json_printer::{diagnostics_json, render_section};
use crate::display::token_status::{render_diagnostics, render_token_status};

/// Execute the `decode` subcommand with the given arguments.
pub fn execute(args: &DecodeArgs) -> Result<()> {
    let token = super::resolve_token(args.token.as_deref(), args.token_env.as_deref())?;
    let now = match &args.at {
        Some(expression) => parse_time_expression(expression)?.timestamp,
        None => Utc::now(),
    };

    let mut decoder = JwtDecoder::new(args.mode.into());
    let result = decoder.decode(&token)?;
    let decoded = decoder
        .token()
        .context("decoder holds no token after a successful decode")?;

    if args.json {
        println!("{:#}", decode_json(&decoder, &result, decoded, now));
    } else {
        print!("{}", render_decoded(&result, decoded, now));
    }
    Ok(())
}

/// Human-readable sections for a decoded token.
fn render_decoded(result: &DecodeResult, decoded: &DecodedToken, now: DateTime<Utc>) -> String {
    let signature = if result.signature.is_empty() {
        "(empty)"
    } else {
        result.signature.as_str()
    };

    let mut out = render_section("Header", &result.header);
    out.push_str(&render_section("Payload", &decoded.formatted_payload()));
    out.push_str(&format!("--- Signature ---\n{signature}\n"));
    out.push_str(&render_diagnostics(&result.diagnostics));
    out.push_str(&render_token_status(decoded, now));
    out
}

/// Machine-readable document for `--json`.
fn decode_json(
    decoder: &JwtDecoder,
    result: &DecodeResult,
    decoded: &DecodedToken,
    now: DateTime<Utc>,
) -> Value {
    let algorithm = decoded.algorithm();
    json!({
        "mode": decoder.mode().to_string(),
        "header": result.header,
        "payload": result.payload,
        "signature": result.signature,
        "raw": {
            "header": result.raw.header,
            "payload": result.raw.payload,
            "signature": result.raw.signature,
        },
        "algorithm": algorithm.as_str(),
        "algorithm_family": algorithm.family(),
        "has_signature": decoded.has_signature(),
        "signing_input": decoded.signing_input(),
        "status": {
            "evaluated_at": now.to_rfc3339_opts(SecondsFormat::Secs, true),
            "expired": decoded.is_expired_at(now),
            "valid_for_use": decoded.is_valid_for_use_at(now),
            "time_until_expiration": decoded.time_until_expiration_at(now),
        },
        "diagnostics": diagnostics_json(&result.diagnostics),
    })
}
