//! Terminal display and formatting utilities.
//!
//! Renders decoded sections, diagnostics and token status for
//! human-readable terminal output. Renderers return `String`s so the
//! command handlers decide where output goes.

pub mod json_printer;
pub mod token_status;
