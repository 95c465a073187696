//! Error types for the volatility analytics core.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VolError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("insufficient data: need {required} points, have {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid quote: {0}")]
    InvalidQuote(String),

    #[error("option expired {expiry} (as of {as_of})")]
    ExpiredOption { expiry: NaiveDate, as_of: NaiveDate },

    #[error("data source error: {0}")]
    DataSource(String),
}

pub type VolResult<T> = Result<T, VolError>;

impl VolError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    pub fn invalid_quote(msg: impl Into<String>) -> Self {
        Self::InvalidQuote(msg.into())
    }

    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource(msg.into())
    }
}
