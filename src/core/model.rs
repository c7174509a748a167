//! The decoded-token model and the decode pipeline that fills it.
//!
//! [`JwtDecoder`] owns at most one [`DecodedToken`]. Each call to
//! [`JwtDecoder::decode`] either replaces it with a fully validated
//! token or leaves the decoder empty; a failed decode never exposes
//! data from an earlier one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::core::algorithm::Algorithm;
use crate::core::decoder;
use crate::core::diagnostics::{
    Advisory, Diagnostic, MISSING_SIGNATURE_ADVISORY, NONE_ALGORITHM_ADVISORY, Notifier,
    TracingNotifier,
};
use crate::core::format::{self, TokenParts};
use crate::core::mode::ValidationMode;
use crate::core::semantic::{self, TIMESTAMP_CLAIMS};
use crate::core::signature::{self, Verification};
use crate::error::AuditError;

/// The raw base64url segments of a decoded token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegments {
    pub header: String,
    pub payload: String,
    /// Empty when the token carries no signature.
    pub signature: String,
}

/// What a successful decode hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult {
    pub header: Value,
    pub payload: Value,
    pub signature: String,
    pub raw: RawSegments,
    /// Warnings and notices raised along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// A validated token and its derived queries.
///
/// Implements a custom `Debug` that redacts `payload` and `signature`
/// to prevent accidental leakage of sensitive claim data.
#[derive(Clone)]
pub struct DecodedToken {
    token: String,
    algorithm: Algorithm,
    header: Value,
    payload: Value,
    raw: RawSegments,
    has_signature: bool,
}

impl fmt::Debug for DecodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedToken")
            .field("algorithm", &self.algorithm)
            .field("header", &self.header)
            .field("payload", &"[REDACTED]")
            .field("signature", &"[REDACTED]")
            .field("has_signature", &self.has_signature)
            .finish()
    }
}

impl DecodedToken {
    /// The trimmed token string.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Header with `alg` in canonical spelling.
    pub fn header(&self) -> &Value {
        &self.header
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The signature segment (possibly empty).
    pub fn signature(&self) -> &str {
        &self.raw.signature
    }

    pub fn raw(&self) -> &RawSegments {
        &self.raw
    }

    pub fn has_signature(&self) -> bool {
        self.has_signature
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn uses_none_algorithm(&self) -> bool {
        self.algorithm.is_none()
    }

    pub fn uses_symmetric_algorithm(&self) -> bool {
        self.algorithm.is_symmetric()
    }

    pub fn uses_asymmetric_algorithm(&self) -> bool {
        self.algorithm.is_asymmetric()
    }

    /// The exact bytes that were (or would be) signed:
    /// `header-segment.payload-segment`.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.raw.header, self.raw.payload)
    }

    /// A numeric timestamp claim, if present and valid.
    pub fn claim_timestamp(&self, claim: &str) -> Option<f64> {
        semantic::timestamp(self.payload.get(claim))
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// `false` without an `exp` claim, otherwise `exp < now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.claim_timestamp("exp")
            .is_some_and(|exp| exp < now.timestamp() as f64)
    }

    pub fn is_valid_for_use(&self) -> bool {
        self.is_valid_for_use_at(Utc::now())
    }

    /// Not expired and not before its `nbf`.
    pub fn is_valid_for_use_at(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp() as f64;
        let expired = self.claim_timestamp("exp").is_some_and(|exp| exp < now);
        let premature = self.claim_timestamp("nbf").is_some_and(|nbf| nbf > now);
        !expired && !premature
    }

    /// `"No expiration"`, `"Expired"`, or the remaining time such as `"2h 5m"`.
    pub fn time_until_expiration_at(&self, now: DateTime<Utc>) -> String {
        let Some(exp) = self.claim_timestamp("exp") else {
            return "No expiration".to_string();
        };
        let remaining = (exp as i64).saturating_sub(now.timestamp());
        if remaining <= 0 {
            "Expired".to_string()
        } else {
            format_duration(remaining)
        }
    }

    /// The payload plus an RFC 3339 `<claim>_formatted` entry for each
    /// numeric timestamp claim.
    pub fn formatted_payload(&self) -> Value {
        let mut formatted = self.payload.clone();
        if let Value::Object(claims) = &mut formatted {
            for claim in TIMESTAMP_CLAIMS {
                let rendered = semantic::timestamp(claims.get(claim)).and_then(format_timestamp);
                if let Some(rendered) = rendered {
                    claims.insert(format!("{claim}_formatted"), Value::from(rendered));
                }
            }
        }
        formatted
    }

    /// Run the signature verifier against this token.
    pub fn check_signature(&self, secret: &[u8]) -> Verification {
        signature::check(Some(self), secret)
    }
}

/// Render Unix seconds as an RFC 3339 UTC string.
pub fn format_timestamp(seconds: f64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(seconds as i64, 0)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

/// Render a positive number of seconds as the two largest units.
pub fn format_duration(seconds: i64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Decodes tokens under one validation policy and keeps the last
/// successful result.
pub struct JwtDecoder {
    mode: ValidationMode,
    current: Option<DecodedToken>,
    notifier: Box<dyn Notifier>,
}

impl fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("mode", &self.mode)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl Default for JwtDecoder {
    fn default() -> Self {
        Self::new(ValidationMode::default())
    }
}

impl JwtDecoder {
    /// A decoder that reports advisories through `tracing`.
    pub fn new(mode: ValidationMode) -> Self {
        Self::with_notifier(mode, Box::new(TracingNotifier))
    }

    pub fn with_notifier(mode: ValidationMode, notifier: Box<dyn Notifier>) -> Self {
        Self {
            mode,
            current: None,
            notifier,
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validate and decode `raw`, replacing the held token.
    ///
    /// # Errors
    ///
    /// Returns the first format, decode or semantic error. The decoder
    /// is empty afterwards.
    pub fn decode(&mut self, raw: &str) -> Result<DecodeResult, AuditError> {
        self.current = None;

        let (token, diagnostics) = self.run_pipeline(raw).inspect_err(|err| {
            tracing::debug!(
                mode = %self.mode,
                category = err.category(),
                error = %err,
                "decode failed"
            );
        })?;

        let result = DecodeResult {
            header: token.header.clone(),
            payload: token.payload.clone(),
            signature: token.raw.signature.clone(),
            raw: token.raw.clone(),
            diagnostics,
        };
        self.current = Some(token);
        Ok(result)
    }

    fn run_pipeline(&self, raw: &str) -> Result<(DecodedToken, Vec<Diagnostic>), AuditError> {
        let parts = format::validate(raw, self.mode)?;
        tracing::debug!(
            segments = parts.segments.len(),
            has_signature = parts.has_signature,
            "token shape accepted"
        );

        let (header, payload) = decoder::decode_header_and_payload(&parts)?;

        let validated = semantic::validate_header(header, self.mode)?;
        let mut diagnostics = validated.diagnostics;
        diagnostics.extend(semantic::validate_payload(&payload, self.mode)?);

        if !parts.extra_segments().is_empty() {
            diagnostics.push(Diagnostic::info(format!(
                "token has {} segments; everything after the signature was ignored",
                parts.segments.len()
            )));
        }

        if self.mode.is_audit() {
            for advisory in advisories(validated.algorithm, &parts) {
                self.notifier
                    .notify(advisory.message, advisory.severity, advisory.duration);
                diagnostics.push(advisory.into());
            }
        }

        let token = DecodedToken {
            raw: RawSegments {
                header: parts.header_segment().to_string(),
                payload: parts.payload_segment().to_string(),
                signature: parts.signature_segment().to_string(),
            },
            token: parts.token,
            algorithm: validated.algorithm,
            header: validated.header,
            payload,
            has_signature: parts.has_signature,
        };
        Ok((token, diagnostics))
    }

    /// The held token, if the last decode succeeded.
    pub fn token(&self) -> Option<&DecodedToken> {
        self.current.as_ref()
    }

    pub fn header(&self) -> Option<&Value> {
        self.current.as_ref().map(DecodedToken::header)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.current.as_ref().map(DecodedToken::payload)
    }

    pub fn signature(&self) -> Option<&str> {
        self.current.as_ref().map(DecodedToken::signature)
    }

    pub fn algorithm(&self) -> Option<Algorithm> {
        self.current.as_ref().map(DecodedToken::algorithm)
    }

    pub fn is_expired(&self) -> bool {
        self.current.as_ref().is_some_and(DecodedToken::is_expired)
    }

    pub fn is_valid_for_use(&self) -> bool {
        self.current.as_ref().is_some_and(DecodedToken::is_valid_for_use)
    }

    pub fn uses_none_algorithm(&self) -> bool {
        self.current.as_ref().is_some_and(DecodedToken::uses_none_algorithm)
    }

    pub fn uses_symmetric_algorithm(&self) -> bool {
        self.current.as_ref().is_some_and(DecodedToken::uses_symmetric_algorithm)
    }

    pub fn uses_asymmetric_algorithm(&self) -> bool {
        self.current.as_ref().is_some_and(DecodedToken::uses_asymmetric_algorithm)
    }

    /// Empty when nothing is decoded.
    pub fn signing_input(&self) -> String {
        self.current
            .as_ref()
            .map(DecodedToken::signing_input)
            .unwrap_or_default()
    }

    /// Detailed signature check of the held token.
    pub fn check_signature(&self, secret: &[u8]) -> Verification {
        signature::check(self.current.as_ref(), secret)
    }

    /// `true` for a matching HMAC or an unsigned (`none`) token.
    pub fn verify(&self, secret: &[u8]) -> bool {
        signature::verify(self.current.as_ref(), secret)
    }
}

fn advisories(algorithm: Algorithm, parts: &TokenParts) -> Vec<Advisory> {
    let mut raised = Vec::new();
    if algorithm.is_none() {
        raised.push(NONE_ALGORITHM_ADVISORY);
    }
    if !parts.has_signature && !algorithm.is_none() {
        raised.push(MISSING_SIGNATURE_ADVISORY);
    }
    raised
}
