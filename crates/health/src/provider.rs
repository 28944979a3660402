//! Health-data provider capability
//!
//! The provider is the only source of live readings. It grants read access
//! per metric, answers "most recent value" queries and streams changes.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use vitalrisk_core::BiologicalSex;

use crate::errors::Result;
use crate::metric::MetricKind;

/// Date of birth components; the provider may omit any of them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOfBirth {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

impl DateOfBirth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: Some(date.year()),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }

    /// Calendar-year difference to `today`; `None` without a birth year
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.year.map(|year| today.year() - year)
    }
}

#[async_trait]
pub trait HealthProvider: Send + Sync {
    /// Ask for read access to `metrics` plus the sex and date-of-birth
    /// characteristics. Returns whether access was granted.
    async fn request_authorization(&self, metrics: &[MetricKind]) -> Result<bool>;

    async fn biological_sex(&self) -> Result<BiologicalSex>;

    async fn date_of_birth(&self) -> Result<DateOfBirth>;

    /// Most recent reading, or `None` when there is no sample
    async fn fetch_latest(&self, metric: MetricKind) -> Result<Option<f64>>;

    /// Current reading followed by every later change
    fn observe(&self, metric: MetricKind) -> Result<watch::Receiver<Option<f64>>>;
}
