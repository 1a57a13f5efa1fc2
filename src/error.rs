use thiserror::Error;

/// Startup configuration problems. Any of these stops the process before the
/// polling loop starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown strategy `{0}` (expected FIXED_PRICE or PAUSING)")]
    UnknownStrategy(String),

    #[error("invalid time of day `{0}` (expected HH:MM)")]
    InvalidTimeOfDay(String),

    #[error("invalid UTC offset `{0}` (expected +HH:MM or -HH:MM)")]
    InvalidUtcOffset(String),

    #[error("invalid site bid entry `{0}` (expected site_id=amount)")]
    InvalidSiteBid(String),

    #[error("poll interval must be at least one second")]
    InvalidPollInterval,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("currency `{0}` is not a three-letter ISO-4217 code")]
    InvalidCurrency(String),

    #[error("bid amount {0} must be a finite, non-negative number")]
    InvalidAmount(String),

    #[error("stats for line item `{found}` delivered while deciding `{expected}`")]
    LineItemMismatch { expected: String, found: String },

    #[error("line item `{0}` has a site bid with an empty site id")]
    EmptySiteId(String),
}
