//! JWT signature verification.
//!
//! Only the HMAC family is verified. Tokens declaring `none` are
//! accepted unconditionally, which is exactly the behavior an audit of
//! the "none" vulnerability needs to demonstrate. Asymmetric algorithms
//! are reported as unsupported rather than as a mismatch.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::core::algorithm::Algorithm;
use crate::core::model::DecodedToken;
use crate::error::SignatureError;

/// The result of a signature verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The recomputed HMAC matches the signature segment.
    Valid,
    /// `alg` is `none`; accepted without checking anything.
    Unsigned,
    /// The recomputed HMAC differs from the signature segment.
    Mismatch,
    /// The algorithm cannot be verified with a shared secret.
    Unsupported { algorithm: Algorithm },
    /// Nothing has been decoded.
    NoToken,
}

impl Verification {
    /// Whether the token would be accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid | Verification::Unsigned)
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Valid => f.write_str("signature is valid"),
            Verification::Unsigned => {
                f.write_str("accepted without verification: algorithm is \"none\"")
            }
            Verification::Mismatch => f.write_str("signature does not match the secret"),
            Verification::Unsupported { algorithm } => write!(
                f,
                "{algorithm} signatures cannot be verified with a shared secret"
            ),
            Verification::NoToken => f.write_str("no token has been decoded"),
        }
    }
}

/// Verify `token` against `secret`, explaining the outcome.
pub fn check(token: Option<&DecodedToken>, secret: &[u8]) -> Verification {
    let Some(token) = token else {
        return Verification::NoToken;
    };

    let algorithm = token.algorithm();
    if algorithm.is_none() {
        tracing::warn!("accepting unsigned token with alg \"none\"");
        return Verification::Unsigned;
    }

    if !algorithm.is_symmetric() {
        tracing::warn!(%algorithm, "algorithm not supported by the HMAC verifier");
        return Verification::Unsupported { algorithm };
    }

    let expected = match compute_hmac(algorithm, secret, &token.signing_input()) {
        Ok(digest) => URL_SAFE_NO_PAD.encode(digest),
        Err(err) => {
            tracing::warn!(error = %err, "HMAC computation failed");
            return Verification::Mismatch;
        }
    };

    if bool::from(expected.as_bytes().ct_eq(token.signature().as_bytes())) {
        Verification::Valid
    } else {
        tracing::warn!(%algorithm, "signature mismatch");
        Verification::Mismatch
    }
}

/// Verify `token` against `secret`. Never fails; see [`check`] for why
/// a token was rejected.
pub fn verify(token: Option<&DecodedToken>, secret: &[u8]) -> bool {
    check(token, secret).is_valid()
}

/// HMAC-SHA over `signing_input` with the hash named by `algorithm`.
///
/// # Errors
///
/// Returns [`SignatureError::UnsupportedAlgorithm`] for anything outside
/// the `HS*` family.
pub fn compute_hmac(
    algorithm: Algorithm,
    secret: &[u8],
    signing_input: &str,
) -> Result<Vec<u8>, SignatureError> {
    match algorithm {
        Algorithm::HS256 => mac::<Hmac<Sha256>>(secret, signing_input),
        Algorithm::HS384 => mac::<Hmac<Sha384>>(secret, signing_input),
        Algorithm::HS512 => mac::<Hmac<Sha512>>(secret, signing_input),
        other => Err(SignatureError::UnsupportedAlgorithm {
            algorithm: other.to_string(),
        }),
    }
}

fn mac<M: Mac + KeyInit>(secret: &[u8], signing_input: &str) -> Result<Vec<u8>, SignatureError> {
    let mut mac =
        <M as KeyInit>::new_from_slice(secret).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::model::JwtDecoder;
    use crate::core::mode::ValidationMode;

    /// Signed with `your-256-bit-secret` (the jwt.io sample).
    const HS256_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
        SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

    fn signed_token(algorithm: Algorithm, secret: &[u8]) -> String {
        let header = URL_SAFE_NO_PAD.encode(json!({"alg": algorithm.as_str()}).to_string());
        let payload = URL_SAFE_NO_PAD.encode(json!({"sub": "audit"}).to_string());
        let signing_input = format!("{header}.{payload}");
        let digest = compute_hmac(algorithm, secret, &signing_input).unwrap();
        let signature = URL_SAFE_NO_PAD.encode(digest);
        format!("{signing_input}.{signature}")
    }

    fn decoded(raw: &str, mode: ValidationMode) -> JwtDecoder {
        let mut decoder = JwtDecoder::new(mode);
        decoder.decode(raw).unwrap();
        decoder
    }

    #[test]
    fn test_jwt_io_sample_verifies() {
        let decoder = decoded(HS256_TOKEN, ValidationMode::Strict);
        assert_eq!(decoder.check_signature(b"your-256-bit-secret"), Verification::Valid);
        assert!(decoder.verify(b"your-256-bit-secret"));
    }

    #[test]
    fn test_one_byte_change_in_secret_fails() {
        let decoder = decoded(HS256_TOKEN, ValidationMode::Strict);
        assert_eq!(decoder.check_signature(b"your-256-bit-secreT"), Verification::Mismatch);
        assert!(!decoder.verify(b"your-256-bit-secreT"));
    }

    #[test]
    fn test_hs384_and_hs512_round_trip() {
        for algorithm in [Algorithm::HS384, Algorithm::HS512] {
            let raw = signed_token(algorithm, b"a-much-longer-shared-secret-for-sha2");
            let decoder = decoded(&raw, ValidationMode::Strict);
            assert!(decoder.verify(b"a-much-longer-shared-secret-for-sha2"), "{algorithm}");
            assert!(!decoder.verify(b"another-secret"), "{algorithm}");
        }
    }

    #[test]
    fn test_digest_lengths() {
        assert_eq!(compute_hmac(Algorithm::HS256, b"k", "x").unwrap().len(), 32);
        assert_eq!(compute_hmac(Algorithm::HS384, b"k", "x").unwrap().len(), 48);
        assert_eq!(compute_hmac(Algorithm::HS512, b"k", "x").unwrap().len(), 64);
    }

    #[test]
    fn test_hmac_accepts_keys_of_any_length() {
        let long_key = vec![0x5a_u8; 1_000];
        let keys: [&[u8]; 5] = [b"", b"k", &[1; 64], &[2; 129], long_key.as_slice()];
        for algorithm in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            for key in keys {
                assert!(compute_hmac(algorithm, key, "x").is_ok(), "{algorithm} {}", key.len());
            }
        }
    }

    #[test]
    fn test_empty_secret_is_accepted_by_hmac() {
        let raw = signed_token(Algorithm::HS256, b"");
        assert!(decoded(&raw, ValidationMode::Strict).verify(b""));
    }

    #[test]
    fn test_none_algorithm_always_verifies() {
        let decoder = decoded("eyJhbGciOiJub25lIn0.e30.", ValidationMode::Audit);
        let secrets: [&[u8]; 3] = [b"", b"anything", b"\x00\xff"];
        for secret in secrets {
            assert_eq!(decoder.check_signature(secret), Verification::Unsigned);
            assert!(decoder.verify(secret));
        }
    }

    #[test]
    fn test_none_algorithm_ignores_signature_content() {
        let raw = format!("{}.e30.Z2FyYmFnZQ", URL_SAFE_NO_PAD.encode(r#"{"alg":"None"}"#));
        assert!(decoded(&raw, ValidationMode::Audit).verify(b"secret"));
    }

    #[test]
    fn test_asymmetric_algorithm_is_unsupported_not_mismatch() {
        let raw = format!(
            "{}.{}.c2lnbmF0dXJl",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
            URL_SAFE_NO_PAD.encode("{}")
        );
        let decoder = decoded(&raw, ValidationMode::Strict);
        assert_eq!(
            decoder.check_signature(b"secret"),
            Verification::Unsupported {
                algorithm: Algorithm::RS256
            }
        );
        assert!(!decoder.verify(b"secret"));
    }

    #[test]
    fn test_no_token_is_false() {
        let decoder = JwtDecoder::new(ValidationMode::Audit);
        assert_eq!(decoder.check_signature(b"secret"), Verification::NoToken);
        assert!(!decoder.verify(b"secret"));
        assert!(!verify(None, b"secret"));
    }

    #[test]
    fn test_missing_signature_on_hmac_token_is_mismatch() {
        let raw = format!("{}.e30.", URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#));
        let decoder = decoded(&raw, ValidationMode::Audit);
        assert_eq!(decoder.check_signature(b"secret"), Verification::Mismatch);
    }

    #[test]
    fn test_compute_hmac_rejects_non_hmac() {
        let err = compute_hmac(Algorithm::ES256, b"k", "x").unwrap_err();
        assert_eq!(
            err,
            SignatureError::UnsupportedAlgorithm {
                algorithm: "ES256".to_string()
            }
        );
    }

    #[test]
    fn test_verification_display() {
        assert_eq!(Verification::Mismatch.to_string(), "signature does not match the secret");
        assert!(Verification::Unsigned.to_string().contains("none"));
        assert!(
            Verification::Unsupported {
                algorithm: Algorithm::PS256
            }
            .to_string()
            .contains("PS256")
        );
    }
}
