use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Extracts structured (entity, field, value) information from constraint
/// violation messages so database errors can be surfaced with stable codes.
pub struct ConstraintParser;

/// Compiled regex patterns for constraint parsing, cached for performance
struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Matches "Key (field)=(value)" pattern in PostgreSQL messages
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            // Matches column names in quotes
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
            // Matches table names in quotes
            table_name: Regex::new(r#"table "([^"]+)""#).unwrap(),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique constraint violation into (entity, field, value).
    ///
    /// Tries the constraint name first (e.g. `bookings_booking_number_key`),
    /// then falls back to the `Key (field)=(value)` detail in the message.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some(constraint) = constraint_name {
            if let Some((entity, field)) = Self::parse_constraint_name(constraint) {
                if let Some((_, value)) = Self::extract_key_value_from_message(message) {
                    return Some((entity, field, value));
                }
                return Some((entity, field, "duplicate_value".to_string()));
            }
        }

        if let Some((field, value)) = Self::extract_key_value_from_message(message) {
            let entity = Self::extract_table_from_message(message)
                .unwrap_or_else(|| "resource".to_string());
            return Some((entity, field, value));
        }

        None
    }

    /// Parses a not-null violation into (entity, field).
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(field) = Self::extract_column_from_message(message) {
            let entity = Self::extract_table_from_message(message)
                .or_else(|| {
                    constraint_name.and_then(|c| Self::parse_constraint_name(c).map(|(e, _)| e))
                })
                .unwrap_or_else(|| "resource".to_string());
            return Some((entity, field));
        }

        None
    }

    /// Parses a foreign key violation into (entity, field, referenced value).
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some(constraint) = constraint_name {
            if let Some((entity, field)) = Self::parse_foreign_key_constraint_name(constraint) {
                if let Some((_, value)) = Self::extract_key_value_from_message(message) {
                    return Some((entity, field, value));
                }
                return Some((entity, field, "invalid_reference".to_string()));
            }
        }

        if let Some((field, value)) = Self::extract_key_value_from_message(message) {
            let entity = Self::extract_table_from_message(message)
                .unwrap_or_else(|| "resource".to_string());
            return Some((entity, field, value));
        }

        None
    }

    /// Parses a check violation into (entity, field).
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(constraint) = constraint_name {
            if let Some((entity, field)) = Self::parse_constraint_name(constraint) {
                return Some((entity, field));
            }
        }

        if let Some(field) = Self::extract_column_from_message(message) {
            let entity = Self::extract_table_from_message(message)
                .unwrap_or_else(|| "resource".to_string());
            return Some((entity, field));
        }

        None
    }

    /// Parses a `{table}_{field}_{suffix}` constraint name, e.g.
    /// `bookings_booking_number_key` -> ("bookings", "booking_number").
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let parts: Vec<&str> = constraint.split('_').collect();
        if parts.len() < 3 {
            return None;
        }

        let suffix = parts[parts.len() - 1];
        if !matches!(suffix, "key" | "idx" | "check" | "fkey" | "unique") {
            return None;
        }

        let entity = parts[0].to_string();
        let field = parts[1..parts.len() - 1].join("_");
        if field.is_empty() {
            return None;
        }
        Some((entity, field))
    }

    /// Parses a foreign key constraint name, keeping the `_id` suffix on the
    /// field, e.g. `bookings_barber_id_fkey` -> ("bookings", "barber_id").
    pub fn parse_foreign_key_constraint_name(constraint: &str) -> Option<(String, String)> {
        if !constraint.ends_with("_fkey") {
            return None;
        }
        Self::parse_constraint_name(constraint)
    }

    /// Extracts (field, value) from a `Key (field)=(value)` message detail.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns().key_value.captures(message).map(|caps| {
            (
                caps.get(1).map_or("", |m| m.as_str()).to_string(),
                caps.get(2).map_or("", |m| m.as_str()).to_string(),
            )
        })
    }

    /// Extracts a quoted column name from the message.
    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
    }

    /// Extracts a quoted table name from the message.
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .table_name
            .captures(message)
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("bookings_booking_number_key"),
            Some(("bookings".to_string(), "booking_number".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_email_key"),
            Some(("users".to_string(), "email".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("pkey"), None);
    }

    #[test]
    fn parses_foreign_key_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_foreign_key_constraint_name("bookings_barber_id_fkey"),
            Some(("bookings".to_string(), "barber_id".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_foreign_key_constraint_name("bookings_barber_id_key"),
            None
        );
    }

    #[test]
    fn extracts_key_value_from_message() {
        let message = "duplicate key value violates unique constraint \"bookings_booking_number_key\"\nDETAIL: Key (booking_number)=(BK-20260314-A1B2C3) already exists.";
        assert_eq!(
            ConstraintParser::extract_key_value_from_message(message),
            Some((
                "booking_number".to_string(),
                "BK-20260314-A1B2C3".to_string()
            ))
        );
    }

    #[test]
    fn extracts_column_from_message() {
        let message = "null value in column \"start_time\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::extract_column_from_message(message),
            Some("start_time".to_string())
        );
    }

    #[test]
    fn parses_unique_violation_end_to_end() {
        let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(test@example.com) already exists.";
        assert_eq!(
            ConstraintParser::parse_unique_violation(message, Some("users_email_key")),
            Some((
                "users".to_string(),
                "email".to_string(),
                "test@example.com".to_string()
            ))
        );
    }

    #[test]
    fn parses_foreign_key_violation_end_to_end() {
        let message = "insert or update on table \"bookings\" violates foreign key constraint \"bookings_barber_id_fkey\"\nDETAIL: Key (barber_id)=(999) is not present in table \"barbers\".";
        assert_eq!(
            ConstraintParser::parse_foreign_key_violation(message, Some("bookings_barber_id_fkey")),
            Some((
                "bookings".to_string(),
                "barber_id".to_string(),
                "999".to_string()
            ))
        );
    }
}
