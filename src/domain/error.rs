//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for alphacycle.
#[derive(Debug, thiserror::Error)]
pub enum AlphaCycleError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price series out of order at row {index}: {date} follows {previous}")]
    UnsortedSeries {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("duplicate date {date} at row {index}")]
    DuplicateDate { index: usize, date: NaiveDate },

    #[error("invalid price {price} on {date}: prices must be positive and finite")]
    InvalidPrice { date: NaiveDate, price: f64 },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AlphaCycleError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        AlphaCycleError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        AlphaCycleError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&AlphaCycleError> for std::process::ExitCode {
    fn from(err: &AlphaCycleError) -> Self {
        let code: u8 = match err {
            AlphaCycleError::Io(_) | AlphaCycleError::Report { .. } => 1,
            AlphaCycleError::ConfigParse { .. }
            | AlphaCycleError::ConfigMissing { .. }
            | AlphaCycleError::ConfigInvalid { .. } => 2,
            AlphaCycleError::UnsortedSeries { .. }
            | AlphaCycleError::DuplicateDate { .. }
            | AlphaCycleError::InvalidPrice { .. }
            | AlphaCycleError::Data { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    fn exit_code(err: &AlphaCycleError) -> String {
        format!("{:?}", ExitCode::from(err))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn config_errors_map_to_exit_code_two() {
        let err = AlphaCycleError::invalid("engine", "entry_ratio", "out of range");
        assert_eq!(exit_code(&err), format!("{:?}", ExitCode::from(2)));
        let err = AlphaCycleError::missing("engine", "seed_capital");
        assert_eq!(exit_code(&err), format!("{:?}", ExitCode::from(2)));
    }

    #[test]
    fn data_errors_map_to_exit_code_five() {
        let err = AlphaCycleError::UnsortedSeries {
            index: 3,
            previous: date(2024, 1, 5),
            date: date(2024, 1, 4),
        };
        assert_eq!(exit_code(&err), format!("{:?}", ExitCode::from(5)));
        let err = AlphaCycleError::DuplicateDate {
            index: 2,
            date: date(2024, 1, 4),
        };
        assert_eq!(exit_code(&err), format!("{:?}", ExitCode::from(5)));
    }

    #[test]
    fn messages_name_the_offending_key() {
        let err = AlphaCycleError::invalid("engine", "panic_trigger", "must be below buy_trigger");
        assert_eq!(
            err.to_string(),
            "invalid config value [engine] panic_trigger: must be below buy_trigger"
        );
        let err = AlphaCycleError::missing("engine", "seed_capital");
        assert_eq!(err.to_string(), "missing config key [engine] seed_capital");
    }

    #[test]
    fn unsorted_message_includes_both_dates() {
        let err = AlphaCycleError::UnsortedSeries {
            index: 1,
            previous: date(2024, 1, 5),
            date: date(2024, 1, 4),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-01-05"));
        assert!(msg.contains("2024-01-04"));
    }
}
