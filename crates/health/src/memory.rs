//! In-memory health provider
//!
//! Holds samples per metric and pushes the latest reading to observers over
//! `watch` channels. Can be seeded from a JSON fixture:
//!
//! ```json
//! {
//!   "sex": "Female",
//!   "date_of_birth": { "year": 1988 },
//!   "samples": [
//!     { "metric": "heart_rate", "value": 72, "start": "2025-03-01T08:00:00Z" },
//!     { "metric": "sleep_hours", "start": "2025-02-28T23:00:00Z", "end": "2025-03-01T06:30:00Z" }
//!   ]
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};
use vitalrisk_core::BiologicalSex;

use crate::errors::{HealthError, Result};
use crate::metric::MetricKind;
use crate::provider::{DateOfBirth, HealthProvider};

/// One stored reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Ignored for sleep (duration is derived) and workouts (counted)
    #[serde(default)]
    pub value: f64,
    pub start: DateTime<Utc>,
    /// Defaults to `start`
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl MetricSample {
    pub fn at(value: f64, start: DateTime<Utc>) -> Self {
        Self {
            value,
            start,
            end: None,
        }
    }

    pub fn interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            value: 0.0,
            start,
            end: Some(end),
        }
    }

    fn end(&self) -> DateTime<Utc> {
        self.end.unwrap_or(self.start)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FixtureSample {
    metric: MetricKind,
    #[serde(flatten)]
    sample: MetricSample,
}

/// Seed data for `InMemoryHealthProvider`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthFixture {
    #[serde(default)]
    pub sex: Option<BiologicalSex>,
    #[serde(default)]
    pub date_of_birth: Option<DateOfBirth>,
    #[serde(default)]
    samples: Vec<FixtureSample>,
    /// Simulate the user declining access
    #[serde(default)]
    pub deny_authorization: bool,
}

impl HealthFixture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

struct Inner {
    samples: RwLock<HashMap<MetricKind, Vec<MetricSample>>>,
    channels: Mutex<HashMap<MetricKind, watch::Sender<Option<f64>>>>,
    authorized: RwLock<HashSet<MetricKind>>,
    characteristics_authorized: RwLock<bool>,
    grants_access: bool,
    sex: RwLock<Option<BiologicalSex>>,
    date_of_birth: RwLock<Option<DateOfBirth>>,
}

/// Thread-safe provider backed by process memory
#[derive(Clone)]
pub struct InMemoryHealthProvider {
    inner: Arc<Inner>,
}

impl Default for InMemoryHealthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHealthProvider {
    /// Provider that grants every authorization request
    pub fn new() -> Self {
        Self::with_access(true)
    }

    /// Provider that answers authorization requests with `grants_access`
    pub fn with_access(grants_access: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                samples: RwLock::new(HashMap::new()),
                channels: Mutex::new(HashMap::new()),
                authorized: RwLock::new(HashSet::new()),
                characteristics_authorized: RwLock::new(false),
                grants_access,
                sex: RwLock::new(None),
                date_of_birth: RwLock::new(None),
            }),
        }
    }

    pub fn from_fixture(fixture: HealthFixture) -> Self {
        let provider = Self::with_access(!fixture.deny_authorization);
        if let Some(sex) = fixture.sex {
            provider.set_biological_sex(sex);
        }
        if let Some(dob) = fixture.date_of_birth {
            provider.set_date_of_birth(dob);
        }
        let count = fixture.samples.len();
        for entry in fixture.samples {
            provider.record(entry.metric, entry.sample);
        }
        info!(samples = count, "seeded in-memory health provider");
        provider
    }

    pub fn load_fixture<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_fixture(HealthFixture::load(path)?))
    }

    pub fn set_biological_sex(&self, sex: BiologicalSex) {
        *self.inner.sex.write() = Some(sex);
    }

    pub fn set_date_of_birth(&self, dob: DateOfBirth) {
        *self.inner.date_of_birth.write() = Some(dob);
    }

    /// Store a sample and notify observers of the metric's new latest value
    ///
    /// The channel lock is held across the store and the send so concurrent
    /// writers publish in the order their samples landed.
    pub fn record(&self, metric: MetricKind, sample: MetricSample) {
        let channels = self.inner.channels.lock();
        let latest = {
            let mut samples = self.inner.samples.write();
            let entries = samples.entry(metric).or_default();
            entries.push(sample);
            latest_value(metric, entries)
        };
        debug!(%metric, ?latest, "recorded sample");

        if let Some(sender) = channels.get(&metric) {
            sender.send_replace(latest);
        }
    }

    fn current(&self, metric: MetricKind) -> Option<f64> {
        if !metric.is_supported() {
            return None;
        }
        match self.inner.samples.read().get(&metric) {
            Some(entries) => latest_value(metric, entries),
            None if metric == MetricKind::WorkoutsCount => Some(0.0),
            None => None,
        }
    }

    fn ensure_authorized(&self, metric: MetricKind) -> Result<()> {
        if self.inner.authorized.read().contains(&metric) {
            Ok(())
        } else {
            Err(HealthError::NotAuthorized(metric))
        }
    }

    fn ensure_characteristics(&self) -> Result<()> {
        if *self.inner.characteristics_authorized.read() {
            Ok(())
        } else {
            Err(HealthError::CharacteristicsNotAuthorized)
        }
    }
}

/// Latest reading according to the metric's sampling rules
fn latest_value(metric: MetricKind, entries: &[MetricSample]) -> Option<f64> {
    match metric {
        MetricKind::WorkoutsCount => Some(entries.len() as f64),
        MetricKind::SleepHours => entries
            .iter()
            .max_by_key(|s| s.end())
            .map(|s| (s.end() - s.start).num_seconds() as f64 / 3600.0),
        _ => entries.iter().max_by_key(|s| s.start).map(|s| s.value),
    }
}

#[async_trait]
impl HealthProvider for InMemoryHealthProvider {
    async fn request_authorization(&self, metrics: &[MetricKind]) -> Result<bool> {
        if !self.inner.grants_access {
            info!("health data access declined");
            return Ok(false);
        }
        self.inner.authorized.write().extend(metrics.iter().copied());
        *self.inner.characteristics_authorized.write() = true;
        Ok(true)
    }

    async fn biological_sex(&self) -> Result<BiologicalSex> {
        self.ensure_characteristics()?;
        Ok(self.inner.sex.read().unwrap_or(BiologicalSex::NotSet))
    }

    async fn date_of_birth(&self) -> Result<DateOfBirth> {
        self.ensure_characteristics()?;
        (*self.inner.date_of_birth.read()).ok_or(HealthError::NoData("date of birth"))
    }

    async fn fetch_latest(&self, metric: MetricKind) -> Result<Option<f64>> {
        if !metric.is_supported() {
            return Ok(None);
        }
        self.ensure_authorized(metric)?;
        Ok(self.current(metric))
    }

    fn observe(&self, metric: MetricKind) -> Result<watch::Receiver<Option<f64>>> {
        self.ensure_authorized(metric)?;
        let mut channels = self.inner.channels.lock();
        let sender = channels
            .entry(metric)
            .or_insert_with(|| watch::channel(self.current(metric)).0);
        Ok(sender.subscribe())
    }
}
