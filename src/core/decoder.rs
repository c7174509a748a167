//! JWT segment decoding.
//!
//! Turns a base64url-encoded header or payload segment into a JSON
//! value in three stages (base64url, UTF-8, JSON). Each stage's failure
//! is reported with the part it happened in and the underlying error
//! kept as the source.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;

use crate::core::format::TokenParts;
use crate::error::{DecodeError, TokenPart};

/// Unpadded URL-safe alphabet that tolerates non-zero trailing bits,
/// which some hand-built attack tokens carry.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Base64url-decode a segment and parse it as JSON.
///
/// # Errors
///
/// Returns a [`DecodeError`] tagged with `part` naming the stage that
/// failed.
pub fn decode_part(segment: &str, part: TokenPart) -> Result<Value, DecodeError> {
    let bytes = SEGMENT_ENGINE
        .decode(segment)
        .map_err(|source| DecodeError::Base64 { part, source })?;

    let text = String::from_utf8(bytes).map_err(|source| DecodeError::Utf8 { part, source })?;

    serde_json::from_str(&text).map_err(|source| DecodeError::Json { part, source })
}

/// Decode the header and payload segments of a validated token.
///
/// Both segments are always decoded. When both fail, the header error
/// is returned and the payload error is logged.
pub fn decode_header_and_payload(parts: &TokenParts) -> Result<(Value, Value), DecodeError> {
    let header = decode_part(parts.header_segment(), TokenPart::Header);
    let payload = decode_part(parts.payload_segment(), TokenPart::Payload);

    match (header, payload) {
        (Ok(header), Ok(payload)) => Ok((header, payload)),
        (Err(header_err), Err(payload_err)) => {
            tracing::debug!(error = %payload_err, "payload also failed to decode");
            Err(header_err)
        }
        (Err(err), Ok(_)) | (Ok(_), Err(err)) => Err(err),
    }
}
