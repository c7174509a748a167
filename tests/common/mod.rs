//! Shared test fixtures and helper utilities.
//!
//! Provides pre-built JWT tokens with known claims for use in the
//! integration tests.
#![allow(dead_code)]

/// The jwt.io sample token.
///
/// Header: `{"alg":"HS256","typ":"JWT"}`
/// Payload: `{"sub":"1234567890","name":"John Doe","iat":1516239022}`
/// Secret: [`JWT_IO_SECRET`]
pub const JWT_IO_HS256_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

/// Secret that signs [`JWT_IO_HS256_TOKEN`].
pub const JWT_IO_SECRET: &str = "your-256-bit-secret";

/// Unsigned token: `{"alg":"none"}` / `{}` with an empty signature.
pub const NONE_TOKEN: &str = "eyJhbGciOiJub25lIn0.e30.";

/// Header `{"alg":"RS256","typ":"JWT"}`, empty payload, placeholder signature.
pub const RS256_SHAPED_TOKEN: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.e30.c2lnbmF0dXJl";

/// A malformed token with only two parts (missing signature).
pub const MALFORMED_TOKEN_TWO_PARTS: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

/// An HS256 token followed by a fourth segment.
pub const FOUR_SEGMENT_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.e30.c2ln.ZXh0cmE";

/// A completely invalid token string.
pub const INVALID_TOKEN: &str = "not-a-valid-jwt";

/// HMAC secret used to sign test tokens for verify tests.
pub const HMAC_TEST_SECRET: &str = "verify-test-secret-key";

/// Create an HS256-signed token with the given claims.
pub fn create_hs256_token(secret: &str, claims: &serde_json::Value) -> String {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&header, claims, &key).unwrap()
}

/// Create an HS512-signed token with the given claims.
pub fn create_hs512_token(secret: &str, claims: &serde_json::Value) -> String {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    let header = Header::new(Algorithm::HS512);
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&header, claims, &key).unwrap()
}

/// Standard test claims used across verify tests.
pub fn standard_claims() -> serde_json::Value {
    serde_json::json!({
        "sub": "1234567890",
        "name": "Test User",
        "iat": 1516239022
    })
}

/// Claims valid from 2024-01-01 until 2030-01-01 (UTC).
pub fn bounded_claims() -> serde_json::Value {
    serde_json::json!({
        "sub": "bounded",
        "iat": 1704067200,
        "nbf": 1704067200,
        "exp": 1893456000
    })
}
