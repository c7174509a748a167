//! Structural validation of the compact serialization.
//!
//! Splits the raw input into dot-separated segments and checks count,
//! emptiness and the base64url alphabet before anything is decoded.

use crate::core::mode::ValidationMode;
use crate::error::{FormatError, TokenPart};

/// Shortest strict token: three one-character segments and two dots.
pub const STRICT_MIN_LENGTH: usize = 5;

/// Audit floor, low enough for hand-built `none` tokens.
pub const AUDIT_MIN_LENGTH: usize = 15;

/// Substrings that mark the input as a URL in audit mode.
const URL_MARKERS: [&str; 5] = ["://", "www.", ".com", ".org", ".net"];

/// A token that passed structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts {
    /// The trimmed token.
    pub token: String,
    /// All dot-separated segments, in order.
    pub segments: Vec<String>,
    /// Whether a non-empty signature segment is present.
    pub has_signature: bool,
}

impl TokenParts {
    pub fn header_segment(&self) -> &str {
        &self.segments[0]
    }

    pub fn payload_segment(&self) -> &str {
        &self.segments[1]
    }

    /// The signature segment, or `""` for 2-part tokens.
    pub fn signature_segment(&self) -> &str {
        self.segments.get(2).map(String::as_str).unwrap_or_default()
    }

    /// Segments past the signature, which are never parsed.
    pub fn extra_segments(&self) -> &[String] {
        self.segments.get(3..).unwrap_or_default()
    }
}

/// Validate the shape of `raw` under the given policy.
///
/// # Errors
///
/// Returns the first violated rule: empty input, missing dots, URL or
/// free-text input (audit only), too short, wrong segment count, an
/// empty required part, or a part outside the base64url alphabet.
pub fn validate(raw: &str, mode: ValidationMode) -> Result<TokenParts, FormatError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(FormatError::Empty);
    }

    if !token.contains('.') {
        return Err(FormatError::MissingDots);
    }

    if mode.is_audit() {
        reject_non_token_input(token)?;
    }

    let minimum = match mode {
        ValidationMode::Strict => STRICT_MIN_LENGTH,
        ValidationMode::Audit => AUDIT_MIN_LENGTH,
    };
    if token.len() < minimum {
        return Err(FormatError::TooShort {
            length: token.len(),
            minimum,
        });
    }

    let segments: Vec<&str> = token.split('.').collect();
    let has_signature = match mode {
        ValidationMode::Strict => check_strict_segments(&segments)?,
        ValidationMode::Audit => check_audit_segments(&segments)?,
    };

    Ok(TokenParts {
        token: token.to_string(),
        segments: segments.into_iter().map(str::to_string).collect(),
        has_signature,
    })
}

/// Heuristics that turn an obviously wrong paste into a clear message.
fn reject_non_token_input(token: &str) -> Result<(), FormatError> {
    if token.starts_with("http") || URL_MARKERS.iter().any(|marker| token.contains(marker)) {
        return Err(FormatError::LooksLikeUrl);
    }

    if token.contains(' ') && token.split(' ').count() > 3 {
        return Err(FormatError::LooksLikeText);
    }

    Ok(())
}

fn check_strict_segments(segments: &[&str]) -> Result<bool, FormatError> {
    if segments.len() != 3 {
        return Err(FormatError::SegmentCount {
            expected: "3",
            actual: segments.len(),
        });
    }

    for (segment, part) in segments.iter().zip(TokenPart::ORDERED) {
        if segment.trim().is_empty() {
            return Err(FormatError::EmptyPart { part });
        }
    }

    for (segment, part) in segments.iter().zip(TokenPart::ORDERED) {
        if !is_base64url(segment) {
            return Err(FormatError::InvalidCharacters { part });
        }
    }

    Ok(true)
}

fn check_audit_segments(segments: &[&str]) -> Result<bool, FormatError> {
    if !(2..=4).contains(&segments.len()) {
        return Err(FormatError::SegmentCount {
            expected: "2-4",
            actual: segments.len(),
        });
    }

    for (segment, part) in segments.iter().zip([TokenPart::Header, TokenPart::Payload]) {
        if segment.trim().is_empty() {
            return Err(FormatError::EmptyPart { part });
        }
        if !is_base64url(segment) {
            return Err(FormatError::InvalidCharacters { part });
        }
    }

    match segments.get(2) {
        Some(signature) if !signature.is_empty() => {
            if !is_base64url(signature) {
                return Err(FormatError::InvalidCharacters {
                    part: TokenPart::Signature,
                });
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Non-empty and drawn from `[A-Za-z0-9_-]`.
pub fn is_base64url(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
