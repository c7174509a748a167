//! Time-travel evaluation for JWT temporal claims.
//!
//! Parses time expressions (relative like "+7d" or absolute like RFC 3339)
//! so `exp` and `nbf` can be evaluated against a simulated instant.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::AuditError;

/// A parsed time target for time-travel evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTarget {
    /// The resolved absolute timestamp.
    pub timestamp: DateTime<Utc>,
    /// The original expression provided by the user.
    pub expression: String,
}

/// Parse a time-travel expression relative to the current time.
///
/// Supports the following formats:
/// - Relative: `+7d`, `-1h`, `+30m`, `+1y`, `-5s`, `+2w`
/// - Absolute RFC 3339: `2024-01-15T14:30:00Z`
/// - Absolute Unix epoch: `1705312200`
///
/// # Errors
///
/// Returns an error if the expression doesn't match any known format.
pub fn parse_time_expression(expression: &str) -> Result<TimeTarget, AuditError> {
    parse_time_expression_at(expression, Utc::now())
}

/// Like [`parse_time_expression`], with relative offsets applied to `now`.
pub fn parse_time_expression_at(
    expression: &str,
    now: DateTime<Utc>,
) -> Result<TimeTarget, AuditError> {
    let trimmed = expression.trim();
    let invalid = |reason: String| AuditError::InvalidTimeExpression {
        expression: expression.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("expression is empty".to_string()));
    }

    let timestamp = if let Some(rest) = trimmed.strip_prefix('+') {
        let offset = parse_offset(rest).map_err(invalid)?;
        now.checked_add_signed(offset)
            .ok_or_else(|| invalid("offset is out of range".to_string()))?
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        let offset = parse_offset(rest).map_err(invalid)?;
        now.checked_sub_signed(offset)
            .ok_or_else(|| invalid("offset is out of range".to_string()))?
    } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let seconds: i64 = trimmed
            .parse()
            .map_err(|_| invalid("epoch seconds out of range".to_string()))?;
        DateTime::<Utc>::from_timestamp(seconds, 0)
            .ok_or_else(|| invalid("epoch seconds out of range".to_string()))?
    } else {
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| invalid(format!("not a relative offset, epoch or RFC 3339 time: {e}")))?
    };

    Ok(TimeTarget {
        timestamp,
        expression: expression.to_string(),
    })
}

/// Parse `<amount><unit>` such as `7d` into a duration.
fn parse_offset(spec: &str) -> Result<TimeDelta, String> {
    let split = spec
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| "missing unit (expected one of s, m, h, d, w, y)".to_string())?;
    let (amount, unit) = spec.split_at(split);

    if amount.is_empty() {
        return Err("missing amount before unit".to_string());
    }
    let amount: i64 = amount
        .parse()
        .map_err(|_| format!("amount '{amount}' is out of range"))?;

    let seconds_per_unit: i64 = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 604_800,
        "y" => 31_536_000,
        other => return Err(format!("unknown unit '{other}'")),
    };

    amount
        .checked_mul(seconds_per_unit)
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| "offset is out of range".to_string())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_forward() {
        let target = parse_time_expression_at("+7d", now()).unwrap();
        assert_eq!(target.timestamp, Utc.with_ymd_and_hms(2024, 1, 22, 12, 0, 0).unwrap());
        assert_eq!(target.expression, "+7d");
    }

    #[test]
    fn test_relative_backward() {
        let target = parse_time_expression_at("-90m", now()).unwrap();
        assert_eq!(target.timestamp, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_relative_units() {
        let base = now();
        let cases = [
            ("+5s", 5),
            ("+1h", 3_600),
            ("+2w", 1_209_600),
            ("+1y", 31_536_000),
        ];
        for (expr, seconds) in cases {
            let target = parse_time_expression_at(expr, base).unwrap();
            assert_eq!((target.timestamp - base).num_seconds(), seconds, "{expr}");
        }
    }

    #[test]
    fn test_epoch_seconds() {
        let target = parse_time_expression_at("1705312200", now()).unwrap();
        assert_eq!(target.timestamp.timestamp(), 1_705_312_200);
    }

    #[test]
    fn test_rfc3339() {
        let target = parse_time_expression_at("2024-01-15T14:30:00+02:00", now()).unwrap();
        assert_eq!(target.timestamp, Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let err = parse_time_expression_at("+7x", now()).unwrap_err();
        assert!(err.to_string().contains("unknown unit 'x'"));
    }

    #[test]
    fn test_missing_amount_or_unit_is_rejected() {
        assert!(parse_time_expression_at("+d", now()).is_err());
        assert!(parse_time_expression_at("+7", now()).is_err());
        assert!(parse_time_expression_at("", now()).is_err());
        assert!(parse_time_expression_at("yesterday", now()).is_err());
    }

    #[test]
    fn test_overflow_is_rejected() {
        let err = parse_time_expression_at("+99999999999999999y", now()).unwrap_err();
        assert!(matches!(err, AuditError::InvalidTimeExpression { .. }));
    }
}
