//! CLI argument definitions for jwt-audit.
//!
//! Uses `clap` derive macros to define the command-line interface.
//! Each subcommand has its own argument struct for type-safe parsing.
//!
//! # Security
//!
//! `DecodeArgs` and `VerifyArgs` implement custom `Debug` to redact
//! sensitive fields (tokens and secrets) and prevent accidental leakage
//! through debug formatting, error chains, or logging.

use std::fmt;

use clap::{Parser, Subcommand, ValueEnum};
use jwt_audit::ValidationMode;
use zeroize::Zeroizing;

/// An offline CLI for auditing JSON Web Tokens (JWTs): strict
/// validation, attack-shape detection, and HMAC signature checks.
#[derive(Debug, Parser)]
#[command(name = "jwt-audit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode, validate and classify a JWT without verifying its signature.
    Decode(DecodeArgs),

    /// Decode a JWT and verify its HMAC signature with a shared secret.
    Verify(VerifyArgs),
}

/// Validation policy selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    /// Reject anything that is not a well-formed, signed JWT.
    #[default]
    Strict,
    /// Accept attack-shaped tokens and report them as warnings.
    Audit,
}

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => ValidationMode::Strict,
            ModeArg::Audit => ValidationMode::Audit,
        }
    }
}

/// Arguments for the `decode` subcommand.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// The JWT token to decode. If omitted, reads from stdin.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,

    /// Validation policy.
    #[arg(long, value_enum, default_value_t = ModeArg::Strict)]
    pub mode: ModeArg,

    /// Evaluate expiry and not-before at a simulated time.
    ///
    /// Accepts relative expressions like "+7d", "-1h", "+30m" or
    /// absolute timestamps in RFC 3339 or Unix epoch format.
    #[arg(long, value_name = "EXPR")]
    pub at: Option<String>,

    /// Output raw JSON (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Custom `Debug` that redacts the token field to prevent accidental leakage.
impl fmt::Debug for DecodeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeArgs")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .field("mode", &self.mode)
            .field("at", &self.at)
            .field("json", &self.json)
            .finish()
    }
}

/// Arguments for the `verify` subcommand.
#[derive(clap::Args)]
pub struct VerifyArgs {
    /// The JWT token to verify. If omitted, reads from stdin.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,

    /// HMAC shared secret for signature validation.
    ///
    /// WARNING: Passing secrets via CLI arguments may expose them in shell
    /// history. Prefer using --secret-env instead.
    #[arg(
        long,
        value_name = "SECRET",
        value_parser = parse_zeroizing_string,
        conflicts_with = "secret_env"
    )]
    pub secret: Option<Zeroizing<String>>,

    /// Read the HMAC secret from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub secret_env: Option<String>,

    /// Validation policy.
    #[arg(long, value_enum, default_value_t = ModeArg::Strict)]
    pub mode: ModeArg,

    /// Output raw JSON (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Parse a string into a `Zeroizing<String>` for secure CLI arguments.
fn parse_zeroizing_string(s: &str) -> Result<Zeroizing<String>, std::convert::Infallible> {
    Ok(Zeroizing::new(s.to_string()))
}

/// Custom `Debug` that redacts token and secret fields to prevent
/// accidental leakage through debug formatting or error chains.
impl fmt::Debug for VerifyArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyArgs")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("secret_env", &self.secret_env)
            .field("mode", &self.mode)
            .field("json", &self.json)
            .finish()
    }
}
