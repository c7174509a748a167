//! Core business logic for JWT auditing.
//!
//! This module contains the domain logic separated from CLI concerns.
//! All types and functions here are testable without the CLI layer.
//! The pipeline runs leaf-first: [`format`] → [`decoder`] → [`semantic`]
//! → [`model`], with [`signature`] verifying the committed token.

pub mod algorithm;
pub mod decoder;
pub mod diagnostics;
pub mod format;
pub mod mode;
pub mod model;
pub mod semantic;
pub mod signature;
pub mod time_travel;

pub use algorithm::Algorithm;
pub use diagnostics::{Diagnostic, Notifier, Severity};
pub use mode::ValidationMode;
pub use model::{DecodeResult, DecodedToken, JwtDecoder};
pub use signature::Verification;
