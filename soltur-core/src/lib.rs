pub mod calendar;
pub mod reconcile;

pub use calendar::{DateRange, StayInterval};
pub use reconcile::{
    first_uncovered_night, is_date_selectable, is_interval_fully_available, merge_to_ranges,
    parse_available_dates,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Zero-night stay: check-in {check_in} must precede check-out {check_out}")]
    ZeroNightStay {
        check_in: chrono::NaiveDate,
        check_out: chrono::NaiveDate,
    },
    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
