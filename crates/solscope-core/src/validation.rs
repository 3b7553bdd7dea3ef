//! Input validation for path and query parameters.
//!
//! Every market route validates its raw parameters against a [`Schema`]
//! before any cache lookup or upstream call happens. Schemas are plain
//! constants; a rule is the address heuristic, membership in a fixed set of
//! values, or bounded free text.

use crate::{SolscopeError, SolscopeResult};
use std::fmt;
use validator::ValidationError;

/// Kind of parameter a schema checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    TokenAddress,
    WalletAddress,
    TimeInterval,
    SearchQuery,
}

impl ParamKind {
    /// Name of the parameter as it appears in routes and error bodies.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TokenAddress => "tokenAddress",
            Self::WalletAddress => "walletAddress",
            Self::TimeInterval => "interval",
            Self::SearchQuery => "q",
        }
    }

    const fn failure_message(self) -> &'static str {
        match self {
            Self::TokenAddress => "Invalid token address format",
            Self::WalletAddress => "Invalid wallet address format",
            Self::TimeInterval => "Invalid time interval",
            Self::SearchQuery => "Invalid search query",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Predicate a raw value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `^[A-Za-z0-9]{32,44}$`
    Address,
    /// Value must be one of the listed strings.
    OneOf(&'static [&'static str]),
    /// Non-blank text of at most `max_chars` characters, without control characters.
    Text { max_chars: usize },
}

/// A parameter kind paired with its rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub kind: ParamKind,
    pub rule: Rule,
}

/// Every interval the dashboard knows about.
pub const ALL_INTERVALS: &[&str] = &["1h", "24h", "7d", "1m"];

/// Intervals offered by the statistics view.
pub const STATS_INTERVALS: &[&str] = &["1h", "24h", "7d"];

/// Intervals offered by the price chart.
pub const CHART_INTERVALS: &[&str] = &["1h", "1d", "1w", "1m"];

pub const TOKEN_ADDRESS: Schema = Schema {
    kind: ParamKind::TokenAddress,
    rule: Rule::Address,
};

pub const WALLET_ADDRESS: Schema = Schema {
    kind: ParamKind::WalletAddress,
    rule: Rule::Address,
};

pub const TIME_INTERVAL: Schema = Schema::interval(ALL_INTERVALS);

/// Longest search text forwarded upstream.
pub const SEARCH_QUERY_MAX_CHARS: usize = 100;

pub const SEARCH_QUERY: Schema = Schema {
    kind: ParamKind::SearchQuery,
    rule: Rule::Text {
        max_chars: SEARCH_QUERY_MAX_CHARS,
    },
};

impl Schema {
    /// Interval schema restricted to a route-specific set.
    #[must_use]
    pub const fn interval(allowed: &'static [&'static str]) -> Self {
        Self {
            kind: ParamKind::TimeInterval,
            rule: Rule::OneOf(allowed),
        }
    }

    /// Checks `value` and hands it back unchanged when it passes.
    pub fn validate<'a>(&self, value: &'a str) -> SolscopeResult<&'a str> {
        let outcome = match self.rule {
            Rule::Address => rules::address(value),
            Rule::OneOf(allowed) => rules::one_of(value, allowed),
            Rule::Text { max_chars } => rules::text(value, max_chars),
        };

        outcome
            .map(|()| value)
            .map_err(|e| SolscopeError::validation(self.kind, failure_message(self.kind, &e)))
    }
}

fn failure_message(kind: ParamKind, error: &ValidationError) -> String {
    match &error.message {
        Some(detail) => format!("{}: {}", kind.failure_message(), detail),
        None => kind.failure_message().to_string(),
    }
}

/// Validates a raw value against a schema.
pub fn validate<'a>(schema: &Schema, value: &'a str) -> SolscopeResult<&'a str> {
    schema.validate(value)
}

/// Predicates behind the schemas.
pub mod rules {
    use std::borrow::Cow;
    use validator::ValidationError;

    pub const ADDRESS_MIN_LEN: usize = 32;
    pub const ADDRESS_MAX_LEN: usize = 44;

    /// Base58-length heuristic: 32 to 44 ASCII letters or digits.
    ///
    /// No base58 decoding is attempted, so `0`, `O`, `I` and `l` pass.
    pub fn address(value: &str) -> Result<(), ValidationError> {
        if !(ADDRESS_MIN_LEN..=ADDRESS_MAX_LEN).contains(&value.len()) {
            return Err(ValidationError::new("address_length"));
        }
        if !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ValidationError::new("address_characters"));
        }
        Ok(())
    }

    /// Value must be a member of `allowed`.
    pub fn one_of(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
        if allowed.contains(&value) {
            return Ok(());
        }
        let mut error = ValidationError::new("not_allowed");
        error.message = Some(Cow::Owned(format!("expected one of {}", allowed.join(", "))));
        Err(error)
    }

    /// Free text: not blank, at most `max_chars` characters, no control characters.
    pub fn text(value: &str, max_chars: usize) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            let mut error = ValidationError::new("blank");
            error.message = Some(Cow::Borrowed("must not be empty"));
            return Err(error);
        }
        if value.chars().count() > max_chars {
            let mut error = ValidationError::new("too_long");
            error.message = Some(Cow::Owned(format!("at most {} characters", max_chars)));
            return Err(error);
        }
        if value.chars().any(char::is_control) {
            return Err(ValidationError::new("control_characters"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    const VALID_44: &str = "So11111111111111111111111111111111111111112A";

    #[test]
    fn test_address_length_bounds() {
        assert_eq!(VALID_44.len(), 44);
        assert!(address(VALID_44).is_ok());
        assert!(address(&"a".repeat(32)).is_ok());
        assert!(address(&"Z9".repeat(19)).is_ok());
        assert!(address(&"a".repeat(31)).is_err());
        assert!(address(&"a".repeat(45)).is_err());
        assert!(address("").is_err());
    }

    #[test]
    fn test_address_characters() {
        let mut with_dash = "a".repeat(40);
        with_dash.push('-');
        assert!(address(&with_dash).is_err());
        assert!(address(&format!("{} ", "b".repeat(40))).is_err());
        assert!(address(&format!("{}_", "c".repeat(40))).is_err());
        // multi-byte letters are rejected even when the byte length fits
        assert!(address(&"é".repeat(20)).is_err());
    }

    #[test]
    fn test_short_token_rejected_with_kind() {
        let err = TOKEN_ADDRESS.validate("abc").unwrap_err();
        match err {
            SolscopeError::Validation { kind, message } => {
                assert_eq!(kind, ParamKind::TokenAddress);
                assert_eq!(message, "Invalid token address format");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_valid_value_returned_unchanged() {
        assert_eq!(validate(&TOKEN_ADDRESS, VALID_44).unwrap(), VALID_44);
        assert_eq!(validate(&WALLET_ADDRESS, VALID_44).unwrap(), VALID_44);
    }

    #[test]
    fn test_wallet_kind_reported() {
        let err = WALLET_ADDRESS.validate("not-a-wallet").unwrap_err();
        assert!(matches!(
            err,
            SolscopeError::Validation { kind: ParamKind::WalletAddress, .. }
        ));
    }

    #[test]
    fn test_all_intervals_accepted() {
        for interval in ALL_INTERVALS {
            assert!(TIME_INTERVAL.validate(interval).is_ok(), "{interval}");
        }
    }

    #[test]
    fn test_unknown_intervals_rejected() {
        for interval in ["", "2h", "24H", "1d", "30d", " 1h", "1h "] {
            assert!(TIME_INTERVAL.validate(interval).is_err(), "{interval:?}");
        }
    }

    #[test]
    fn test_route_specific_interval_sets() {
        let stats = Schema::interval(STATS_INTERVALS);
        let chart = Schema::interval(CHART_INTERVALS);
        assert!(stats.validate("24h").is_ok());
        assert!(stats.validate("1m").is_err());
        assert!(chart.validate("1w").is_ok());
        assert!(chart.validate("24h").is_err());
    }

    #[test]
    fn test_search_query_bounds() {
        assert_eq!(SEARCH_QUERY.validate("bonk").unwrap(), "bonk");
        assert!(SEARCH_QUERY.validate("wrapped sol").is_ok());
        assert!(SEARCH_QUERY.validate(&"é".repeat(SEARCH_QUERY_MAX_CHARS)).is_ok());

        for bad in ["", "   ", "line\nbreak"] {
            let err = SEARCH_QUERY.validate(bad).unwrap_err();
            assert!(
                matches!(err, SolscopeError::Validation { kind: ParamKind::SearchQuery, .. }),
                "{bad:?}"
            );
        }

        let err = SEARCH_QUERY.validate(&"a".repeat(SEARCH_QUERY_MAX_CHARS + 1)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid search query: at most 100 characters");
        assert_eq!(
            SEARCH_QUERY.validate("").unwrap_err().to_string(),
            "Invalid search query: must not be empty"
        );
    }

    #[test]
    fn test_interval_message_lists_allowed_values() {
        let err = Schema::interval(STATS_INTERVALS).validate("5m").unwrap_err();
        assert_eq!(err.to_string(), "Invalid time interval: expected one of 1h, 24h, 7d");
    }
}
