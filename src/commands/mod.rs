//! Command handlers for each CLI subcommand.
//!
//! Each subcommand is implemented in its own module and exposes
//! a single `execute` function that receives the parsed arguments.
//! Token and secret input resolution is shared here.

pub mod decode;
pub mod verify;

use std::io::{IsTerminal, Read};

use jwt_audit::AuditError;
use zeroize::Zeroizing;

/// Maximum number of bytes read from stdin for a token.
const STDIN_MAX_BYTES: u64 = 1_048_576;

/// Resolve the token from the positional argument, an environment
/// variable, or stdin, in that order.
///
/// # Errors
///
/// Returns an error if the named environment variable is invalid or
/// unset, or if no non-empty token is available.
pub fn resolve_token(
    token: Option<&str>,
    token_env: Option<&str>,
) -> Result<Zeroizing<String>, AuditError> {
    let resolved = match (token, token_env) {
        (Some(token), _) => Zeroizing::new(token.to_string()),
        (None, Some(name)) => read_env_var(name)?,
        (None, None) => read_stdin()?,
    };

    if resolved.trim().is_empty() {
        return Err(AuditError::NoTokenProvided);
    }
    Ok(resolved)
}

/// Resolve an optional secret from a literal or an environment variable.
pub fn resolve_secret(
    secret: Option<&Zeroizing<String>>,
    secret_env: Option<&str>,
) -> Result<Option<Zeroizing<String>>, AuditError> {
    match (secret, secret_env) {
        (Some(secret), _) => Ok(Some(secret.clone())),
        (None, Some(name)) => read_env_var(name).map(Some),
        (None, None) => Ok(None),
    }
}

/// Read an environment variable after validating its name.
fn read_env_var(name: &str) -> Result<Zeroizing<String>, AuditError> {
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        return Err(AuditError::InvalidEnvVarName {
            name: name.to_string(),
        });
    }

    std::env::var(name)
        .map(Zeroizing::new)
        .map_err(|_| AuditError::EnvVarNotFound {
            name: name.to_string(),
        })
}

/// Read a token from stdin, unless stdin is an interactive terminal.
fn read_stdin() -> Result<Zeroizing<String>, AuditError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(AuditError::NoTokenProvided);
    }

    let mut buffer = Zeroizing::new(String::new());
    stdin
        .lock()
        .take(STDIN_MAX_BYTES)
        .read_to_string(&mut buffer)
        .map_err(|e| AuditError::StdinRead {
            reason: e.to_string(),
        })?;
    Ok(buffer)
}
