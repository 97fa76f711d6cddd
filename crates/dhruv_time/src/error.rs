//! Error types for time conversions.

/// Errors from calendar, offset or Julian Date conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Calendar fields do not form a valid date/time.
    #[error("invalid calendar value: {0}")]
    InvalidCalendar(String),
    /// Timezone designator could not be parsed.
    #[error("invalid timezone offset: {0}")]
    InvalidOffset(String),
    /// Julian Date is not finite or cannot be represented as a calendar instant.
    #[error("julian date out of range: {0}")]
    JdOutOfRange(f64),
}
