//! jwt-audit: decode, classify and verify JSON Web Tokens for security audits.
//!
//! The library exposes the audit pipeline used by the `jwt-audit` binary.
//! [`JwtDecoder`] validates a token under a [`ValidationMode`], keeps the
//! last successful result, and verifies HMAC signatures. `Strict` rejects
//! anything irregular; `Audit` admits attack-shaped tokens (missing
//! signatures, `none` spelled in odd ways, two-part tokens) and reports
//! them as [`Diagnostic`]s instead.
//!
//! ```
//! use jwt_audit::{JwtDecoder, ValidationMode};
//!
//! let mut decoder = JwtDecoder::new(ValidationMode::Audit);
//! decoder.decode("eyJhbGciOiJub25lIn0.e30.").unwrap();
//! assert!(decoder.uses_none_algorithm());
//! assert!(decoder.verify(b"any secret"));
//! ```

#![forbid(unsafe_code)]

pub mod core;
pub mod error;

pub use crate::core::{
    Algorithm, DecodeResult, DecodedToken, Diagnostic, JwtDecoder, Notifier, Severity,
    ValidationMode, Verification,
};
pub use crate::error::AuditError;
