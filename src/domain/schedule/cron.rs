//! Six-field cron expressions: `minutes hours day-of-month month day-of-week year`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const MONTH_NAMES: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const DAY_NAMES: &[&str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Cron validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleValidationError {
    /// Wrong number of whitespace-separated fields
    FieldCount { found: usize },
    /// A field contains something other than values, names and operators
    InvalidField { field: &'static str, value: String },
    /// A numeric value is outside the field's range
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    /// Day-of-month and day-of-week are both set or both `?`
    DayConflict,
    /// Schedule name is empty
    EmptyName,
    /// Schedule name exceeds the scheduler's limit
    NameTooLong { length: usize, max: usize },
    /// Schedule name contains characters the scheduler rejects
    InvalidName { name: String },
}

impl fmt::Display for ScheduleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount { found } => {
                write!(f, "Cron expression needs 6 fields, found {}", found)
            }
            Self::InvalidField { field, value } => {
                write!(f, "Invalid {} field '{}'", field, value)
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "Value {} in {} field must be between {} and {}",
                value, field, min, max
            ),
            Self::DayConflict => write!(
                f,
                "Exactly one of day-of-month and day-of-week must be '?'"
            ),
            Self::EmptyName => write!(f, "Schedule name cannot be empty"),
            Self::NameTooLong { length, max } => {
                write!(f, "Schedule name too long: {} characters (max {})", length, max)
            }
            Self::InvalidName { name } => write!(
                f,
                "Invalid schedule name '{}': only letters, digits, '-', '_' and '.' are allowed",
                name
            ),
        }
    }
}

impl std::error::Error for ScheduleValidationError {}

impl From<ScheduleValidationError> for DomainError {
    fn from(err: ScheduleValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

struct FieldRule {
    name: &'static str,
    min: u32,
    max: u32,
    names: &'static [&'static str],
    question: bool,
    last: bool,
    weekday: bool,
    nth: bool,
}

const RULES: [FieldRule; 6] = [
    FieldRule {
        name: "minutes",
        min: 0,
        max: 59,
        names: &[],
        question: false,
        last: false,
        weekday: false,
        nth: false,
    },
    FieldRule {
        name: "hours",
        min: 0,
        max: 23,
        names: &[],
        question: false,
        last: false,
        weekday: false,
        nth: false,
    },
    FieldRule {
        name: "day-of-month",
        min: 1,
        max: 31,
        names: &[],
        question: true,
        last: true,
        weekday: true,
        nth: false,
    },
    FieldRule {
        name: "month",
        min: 1,
        max: 12,
        names: MONTH_NAMES,
        question: false,
        last: false,
        weekday: false,
        nth: false,
    },
    FieldRule {
        name: "day-of-week",
        min: 1,
        max: 7,
        names: DAY_NAMES,
        question: true,
        last: true,
        weekday: false,
        nth: true,
    },
    FieldRule {
        name: "year",
        min: 1970,
        max: 2199,
        names: &[],
        question: false,
        last: false,
        weekday: false,
        nth: false,
    },
];

/// Unsigned decimal digits only, no sign
fn parse_number(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl FieldRule {
    fn invalid(&self, value: &str) -> ScheduleValidationError {
        ScheduleValidationError::InvalidField {
            field: self.name,
            value: value.to_string(),
        }
    }

    fn check_range(&self, value: u32) -> Result<u32, ScheduleValidationError> {
        if value < self.min || value > self.max {
            return Err(ScheduleValidationError::OutOfRange {
                field: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }

    /// A single number or name
    fn value(&self, raw: &str) -> Result<u32, ScheduleValidationError> {
        if let Some(n) = parse_number(raw) {
            return self.check_range(n);
        }

        let upper = raw.to_ascii_uppercase();
        self.names
            .iter()
            .position(|name| *name == upper)
            .map(|idx| self.min + idx as u32)
            .ok_or_else(|| self.invalid(raw))
    }

    fn validate(&self, field: &str) -> Result<(), ScheduleValidationError> {
        if field == "?" {
            return if self.question {
                Ok(())
            } else {
                Err(self.invalid(field))
            };
        }

        for element in field.split(',') {
            self.validate_element(element)?;
        }

        Ok(())
    }

    fn validate_element(&self, element: &str) -> Result<(), ScheduleValidationError> {
        if element.is_empty() {
            return Err(self.invalid(element));
        }

        let (base, step) = match element.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (element, None),
        };

        if let Some(step) = step {
            let step = parse_number(step).ok_or_else(|| self.invalid(element))?;
            if step == 0 || step > self.max {
                return Err(self.invalid(element));
            }
        }

        if base == "*" {
            return Ok(());
        }

        if base == "L" && self.last {
            return Ok(());
        }

        if self.nth {
            if let Some((day, nth)) = base.split_once('#') {
                self.value(day)?;
                return match parse_number(nth) {
                    Some(1..=5) => Ok(()),
                    _ => Err(self.invalid(element)),
                };
            }
        }

        if self.weekday {
            if let Some(day) = base.strip_suffix('W') {
                self.value(day)?;
                return Ok(());
            }
        }

        if self.last {
            if let Some(day) = base.strip_suffix('L') {
                self.value(day)?;
                return Ok(());
            }
        }

        if let Some((start, end)) = base.split_once('-') {
            self.value(start)?;
            self.value(end)?;
            return Ok(());
        }

        self.value(base).map(|_| ())
    }
}

/// Validated cron expression
///
/// Parses with or without the `cron(...)` wrapper and always displays with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CronExpression {
    fields: Vec<String>,
}

impl CronExpression {
    pub fn parse(raw: &str) -> Result<Self, ScheduleValidationError> {
        let trimmed = raw.trim();
        let inner = trimmed
            .strip_prefix("cron(")
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(trimmed);

        let fields: Vec<String> = inner.split_whitespace().map(str::to_string).collect();

        if fields.len() != RULES.len() {
            return Err(ScheduleValidationError::FieldCount {
                found: fields.len(),
            });
        }

        for (field, rule) in fields.iter().zip(RULES.iter()) {
            rule.validate(field)?;
        }

        let dom_unset = fields[2] == "?";
        let dow_unset = fields[4] == "?";
        if dom_unset == dow_unset {
            return Err(ScheduleValidationError::DayConflict);
        }

        Ok(Self { fields })
    }

    /// A schedule that fires every day at `hour:minute`
    pub fn daily_at(hour: u32, minute: u32) -> Result<Self, ScheduleValidationError> {
        Self::parse(&format!("{} {} * * ? *", minute, hour))
    }

    /// A schedule that fires Monday to Friday at `hour:minute`
    pub fn weekdays_at(hour: u32, minute: u32) -> Result<Self, ScheduleValidationError> {
        Self::parse(&format!("{} {} ? * MON-FRI *", minute, hour))
    }

    /// Fields without the wrapper, space separated
    pub fn fields(&self) -> String {
        self.fields.join(" ")
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cron({})", self.fields())
    }
}

impl FromStr for CronExpression {
    type Err = ScheduleValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CronExpression {
    type Error = ScheduleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CronExpression> for String {
    fn from(expr: CronExpression) -> Self {
        expr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_wrapper() {
        let a = CronExpression::parse("cron(0 18 ? * MON-FRI *)").unwrap();
        let b = CronExpression::parse("0 18 ? * MON-FRI *").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "cron(0 18 ? * MON-FRI *)");
        assert_eq!(a.fields(), "0 18 ? * MON-FRI *");
    }

    #[test]
    fn test_valid_expressions() {
        for expr in [
            "0 8 * * ? *",
            "*/15 * * * ? *",
            "0 10 ? * 6L 2025",
            "0 12 L * ? *",
            "15 10 15W * ? *",
            "0 9 ? * 2#1 *",
            "0,30 6-18 ? JAN-MAR,dec sun,sat 2024-2030",
        ] {
            assert!(CronExpression::parse(expr).is_ok(), "expected '{}' to parse", expr);
        }
    }

    #[test]
    fn test_field_count() {
        assert_eq!(
            CronExpression::parse("0 18 * * *"),
            Err(ScheduleValidationError::FieldCount { found: 5 })
        );
    }

    #[test]
    fn test_day_conflict() {
        assert_eq!(
            CronExpression::parse("0 18 * * MON *"),
            Err(ScheduleValidationError::DayConflict)
        );
        assert_eq!(
            CronExpression::parse("0 18 ? * ? *"),
            Err(ScheduleValidationError::DayConflict)
        );
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            CronExpression::parse("60 18 * * ? *"),
            Err(ScheduleValidationError::OutOfRange { field: "minutes", value: 60, .. })
        ));
        assert!(matches!(
            CronExpression::parse("0 24 * * ? *"),
            Err(ScheduleValidationError::OutOfRange { field: "hours", .. })
        ));
        assert!(matches!(
            CronExpression::parse("0 0 ? * 8 *"),
            Err(ScheduleValidationError::OutOfRange { field: "day-of-week", .. })
        ));
        assert!(matches!(
            CronExpression::parse("0 0 * * ? 1969"),
            Err(ScheduleValidationError::OutOfRange { field: "year", .. })
        ));
    }

    #[test]
    fn test_invalid_tokens() {
        assert!(matches!(
            CronExpression::parse("? 18 * * ? *"),
            Err(ScheduleValidationError::InvalidField { field: "minutes", .. })
        ));
        assert!(matches!(
            CronExpression::parse("0 18 * FOO ? *"),
            Err(ScheduleValidationError::InvalidField { field: "month", .. })
        ));
        assert!(matches!(
            CronExpression::parse("0/0 18 * * ? *"),
            Err(ScheduleValidationError::InvalidField { .. })
        ));
        assert!(matches!(
            CronExpression::parse("0 9 ? * 2#6 *"),
            Err(ScheduleValidationError::InvalidField { .. })
        ));
        assert!(matches!(
            CronExpression::parse("+5 +8 * * ? *"),
            Err(ScheduleValidationError::InvalidField { field: "minutes", .. })
        ));
        assert!(matches!(
            CronExpression::parse("*/+5 8 * * ? *"),
            Err(ScheduleValidationError::InvalidField { field: "minutes", .. })
        ));
        assert!(matches!(
            CronExpression::parse("0 9 ? * 2#+1 *"),
            Err(ScheduleValidationError::InvalidField { field: "day-of-week", .. })
        ));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(
            CronExpression::daily_at(7, 30).unwrap().to_string(),
            "cron(30 7 * * ? *)"
        );
        assert_eq!(
            CronExpression::weekdays_at(20, 0).unwrap().to_string(),
            "cron(0 20 ? * MON-FRI *)"
        );
        assert!(CronExpression::daily_at(25, 0).is_err());
    }

    #[test]
    fn test_serde_round_trip_uses_wrapper() {
        let expr: CronExpression = serde_json::from_str("\"0 6 * * ? *\"").unwrap();
        assert_eq!(serde_json::to_string(&expr).unwrap(), "\"cron(0 6 * * ? *)\"");
    }
}
