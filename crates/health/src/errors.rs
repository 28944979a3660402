//! Error types for health-data access

use thiserror::Error;

use crate::metric::MetricKind;

#[derive(Error, Debug)]
pub enum HealthError {
    /// Read access to the metric was never granted
    #[error("not authorized to read {0}")]
    NotAuthorized(MetricKind),

    /// Characteristic data (sex, date of birth) was requested before authorization
    #[error("not authorized to read characteristics")]
    CharacteristicsNotAuthorized,

    /// The provider has no value for a characteristic
    #[error("no data available for {0}")]
    NoData(&'static str),

    /// Backend failure
    #[error("health provider error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fixture parse error: {0}")]
    Fixture(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HealthError>;
