//! Domain error types for jwt-audit.
//!
//! All business-logic errors are defined here using `thiserror`.
//! Each pipeline stage has its own error type so callers can tell a
//! malformed token shape from a decode failure or a semantic rejection.
//! These errors are converted to user-friendly messages at the CLI boundary.

use std::fmt;

use thiserror::Error;

/// The three positional parts of a compact JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPart {
    Header,
    Payload,
    Signature,
}

impl TokenPart {
    /// Part names in segment order.
    pub const ORDERED: [TokenPart; 3] =
        [TokenPart::Header, TokenPart::Payload, TokenPart::Signature];

    /// Lower-case name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenPart::Header => "header",
            TokenPart::Payload => "payload",
            TokenPart::Signature => "signature",
        }
    }
}

impl fmt::Display for TokenPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The token does not have an acceptable compact-serialization shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Nothing left after trimming surrounding whitespace.
    #[error("invalid token format: token cannot be empty")]
    Empty,

    /// No `.` separator anywhere in the input.
    #[error("invalid token format: token must contain dots as separators")]
    MissingDots,

    /// Audit-mode heuristic: the input looks like a URL.
    #[error("invalid input: URLs are not valid JWT tokens")]
    LooksLikeUrl,

    /// Audit-mode heuristic: the input looks like free text.
    #[error("invalid input: this appears to be text, not a JWT token")]
    LooksLikeText,

    /// Shorter than the mode's minimum length.
    #[error("invalid token format: token is {length} characters long, minimum is {minimum}")]
    TooShort {
        /// Length of the trimmed input.
        length: usize,
        /// Minimum accepted by the active mode.
        minimum: usize,
    },

    /// Wrong number of dot-separated segments.
    #[error(
        "invalid token format: expected {expected} parts separated by dots, \
         got {actual} parts"
    )]
    SegmentCount {
        /// Accepted segment count, e.g. `"3"` or `"2-4"`.
        expected: &'static str,
        /// Number of segments actually found.
        actual: usize,
    },

    /// A required segment is empty.
    #[error("invalid token format: {part} part cannot be empty")]
    EmptyPart {
        /// The empty segment.
        part: TokenPart,
    },

    /// A segment contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid token format: {part} contains invalid base64url characters")]
    InvalidCharacters {
        /// The offending segment.
        part: TokenPart,
    },
}

/// A header or payload segment could not be turned into JSON.
///
/// Each variant keeps the underlying codec or parser error as its source.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode {part}: invalid base64url encoding")]
    Base64 {
        part: TokenPart,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to decode {part}: decoded bytes are not valid UTF-8")]
    Utf8 {
        part: TokenPart,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to parse {part} as JSON")]
    Json {
        part: TokenPart,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Which part failed to decode.
    pub fn part(&self) -> TokenPart {
        match self {
            DecodeError::Base64 { part, .. }
            | DecodeError::Utf8 { part, .. }
            | DecodeError::Json { part, .. } => *part,
        }
    }
}

/// The decoded header or payload violates a semantic rule.
///
/// In audit mode the same values are rendered as warnings instead of
/// being returned, so the messages double as diagnostic text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("invalid JWT: {part} must be a JSON object")]
    NotAnObject { part: TokenPart },

    #[error("invalid JWT: header must contain \"alg\" (algorithm) field")]
    MissingAlgorithm,

    #[error("invalid JWT: unsupported algorithm {algorithm}; supported algorithms: {supported}")]
    UnsupportedAlgorithm {
        /// The offending value, JSON-quoted.
        algorithm: String,
        /// Comma-separated list of accepted names.
        supported: String,
    },

    #[error("invalid JWT: token type {typ} is not supported; expected \"JWT\"")]
    UnsupportedType {
        /// The offending value, JSON-quoted.
        typ: String,
    },

    #[error(
        "invalid JWT: \"{claim}\" claim must be a non-negative number (Unix timestamp), \
         got {value}"
    )]
    InvalidTimestamp { claim: &'static str, value: String },

    #[error("invalid JWT: \"iat\" (issued at) {iat} is after \"exp\" (expiration time) {exp}")]
    IssuedAfterExpiry { iat: f64, exp: f64 },

    #[error("invalid JWT: \"nbf\" (not before) {nbf} is after \"exp\" (expiration time) {exp}")]
    NotBeforeAfterExpiry { nbf: f64, exp: f64 },
}

/// HMAC computation could not run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("algorithm {algorithm} is not supported by the HMAC verifier")]
    UnsupportedAlgorithm { algorithm: String },

    /// Raised by the `hmac` constructor, which HMAC keys of any length pass.
    #[error("HMAC key rejected")]
    InvalidKey,
}

/// Errors that can occur while auditing a JWT.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// Failed to parse a time-travel expression.
    #[error("invalid time expression '{expression}': {reason}")]
    InvalidTimeExpression {
        /// The time expression that failed to parse.
        expression: String,
        /// Description of the parsing failure.
        reason: String,
    },

    /// No token was provided via any input method.
    #[error("no token provided: pass a token as an argument, via --token-env, or through stdin")]
    NoTokenProvided,

    /// An HMAC-signed token was given to `verify` without a secret.
    #[error("no secret provided: {algorithm} tokens need --secret or --secret-env")]
    NoSecretProvided {
        /// The token's algorithm.
        algorithm: String,
    },

    /// The specified environment variable is not set.
    #[error("environment variable '{name}' is not set")]
    EnvVarNotFound {
        /// Name of the missing environment variable.
        name: String,
    },

    /// The environment variable name cannot be looked up.
    #[error("invalid environment variable name '{name}'")]
    InvalidEnvVarName {
        /// The rejected name.
        name: String,
    },

    /// Reading the token from stdin failed.
    #[error("failed to read token from stdin: {reason}")]
    StdinRead {
        /// Description of the read failure.
        reason: String,
    },
}

impl AuditError {
    /// Coarse classification used in logs and JSON output.
    pub fn category(&self) -> &'static str {
        match self {
            AuditError::Format(_) => "format",
            AuditError::Decode(_) => "decode",
            AuditError::Semantic(_) => "semantic",
            _ => "input",
        }
    }
}
