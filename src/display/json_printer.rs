//! JSON rendering for terminal and machine-readable output.

use jwt_audit::Diagnostic;
use serde_json::{Value, json};

/// Render a titled section with 2-space indented JSON.
pub fn render_section(title: &str, value: &Value) -> String {
    format!("--- {title} ---\n{value:#}\n")
}

/// Diagnostics as a JSON array of `{severity, message}` objects.
pub fn diagnostics_json(diagnostics: &[Diagnostic]) -> Value {
    diagnostics
        .iter()
        .map(|d| json!({"severity": d.severity.as_str(), "message": d.message}))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_section_is_indented_json() {
        let rendered = render_section("Header", &json!({"alg": "HS256"}));
        assert_eq!(rendered, "--- Header ---\n{\n  \"alg\": \"HS256\"\n}\n");
    }

    #[test]
    fn test_diagnostics_json() {
        let value = diagnostics_json(&[Diagnostic::info("fourth segment ignored")]);
        assert_eq!(
            value,
            json!([{"severity": "info", "message": "fourth segment ignored"}])
        );
        assert_eq!(diagnostics_json(&[]), json!([]));
    }
}
