//! Advisory diagnostics.
//!
//! Audit mode never hides what it lets through: every downgraded rule
//! and every attack-relevant token shape is recorded as a [`Diagnostic`]
//! on the decode result, and the attack-relevant ones are also pushed to
//! a [`Notifier`] so a UI layer can surface them.

use std::fmt;
use std::time::Duration;

/// How loudly a diagnostic should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal finding produced while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// An advisory raised for an attack-relevant token shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advisory {
    pub message: &'static str,
    pub severity: Severity,
    /// How long a UI should keep the notice on screen.
    pub duration: Duration,
}

/// The token declares `"alg": "none"` (after canonicalization).
pub const NONE_ALGORITHM_ADVISORY: Advisory = Advisory {
    message: "None algorithm detected: this token has no signature verification",
    severity: Severity::Warning,
    duration: Duration::from_millis(7000),
};

/// The token has no signature but claims a signing algorithm.
pub const MISSING_SIGNATURE_ADVISORY: Advisory = Advisory {
    message: "Missing signature: token has no signature but its algorithm is not \"none\"",
    severity: Severity::Warning,
    duration: Duration::from_millis(5000),
};

impl From<Advisory> for Diagnostic {
    fn from(advisory: Advisory) -> Self {
        Self {
            severity: advisory.severity,
            message: advisory.message.to_string(),
        }
    }
}

/// Receiver for advisory notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity, duration: Duration);
}

/// Default notifier: forwards advisories to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity, duration: Duration) {
        let duration_ms = duration.as_millis() as u64;
        match severity {
            Severity::Warning => tracing::warn!(duration_ms, "{message}"),
            Severity::Info => tracing::info!(duration_ms, "{message}"),
        }
    }
}
