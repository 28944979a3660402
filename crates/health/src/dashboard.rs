//! Live health dashboard
//!
//! Connecting asks the provider for access, pulls the one-shot values
//! (sex, age, sleep, workouts) and then keeps one observer task per observed
//! metric writing into shared state. Anything unavailable renders as `N/A`.

use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vitalrisk_core::{age_category, BiologicalSex, HealthSnapshot};

use crate::metric::{MetricKind, Section};
use crate::provider::HealthProvider;

/// Sex as shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SexReading {
    #[default]
    Unknown,
    Known(BiologicalSex),
    Error,
}

impl fmt::Display for SexReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SexReading::Unknown => f.write_str("N/A"),
            SexReading::Known(sex) => f.write_str(sex.label()),
            SexReading::Error => f.write_str("Error"),
        }
    }
}

/// Point-in-time copy of everything the dashboard knows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub age: Option<i32>,
    pub sex: SexReading,
    values: BTreeMap<MetricKind, f64>,
}

impl DashboardState {
    pub fn value(&self, metric: MetricKind) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn set(&mut self, metric: MetricKind, value: Option<f64>) {
        match value {
            Some(v) => {
                self.values.insert(metric, v);
            }
            None => {
                self.values.remove(&metric);
            }
        }
    }

    /// Formatted reading or `N/A`
    pub fn display(&self, metric: MetricKind) -> String {
        metric.display(self.value(metric))
    }

    /// Sections in display order, basic metrics first
    pub fn render(&self) -> Vec<DashboardSection> {
        let mut sections = vec![DashboardSection {
            title: "Basic Metrics",
            rows: vec![
                DashboardRow {
                    label: "Age",
                    value: self
                        .age
                        .map(|age| age.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                },
                DashboardRow {
                    label: "Sex",
                    value: self.sex.to_string(),
                },
            ],
        }];

        for section in Section::ALL {
            let rows = MetricKind::ALL
                .iter()
                .filter(|metric| metric.section() == section && metric.is_supported())
                .map(|metric| DashboardRow {
                    label: metric.label(),
                    value: self.display(*metric),
                })
                .collect();
            sections.push(DashboardSection {
                title: section.title(),
                rows,
            });
        }

        sections
    }

    /// Fill the live-sourced model inputs the survey left empty
    ///
    /// BMI comes from the body measurement and sex from the characteristic.
    /// Age in years is converted to the five-year group code the `Age` slot
    /// expects. Answers already in `survey` win and are taken as-is.
    pub fn feature_snapshot(&self, survey: &HealthSnapshot) -> HealthSnapshot {
        let live_sex = match self.sex {
            SexReading::Known(sex) => Some(sex),
            SexReading::Unknown | SexReading::Error => None,
        };

        HealthSnapshot {
            bmi: survey.bmi.or(self.value(MetricKind::Bmi)),
            age: survey.age.or(self.age.map(age_category)),
            sex: survey.sex.or(live_sex),
            ..survey.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSection {
    pub title: &'static str,
    pub rows: Vec<DashboardRow>,
}

impl fmt::Display for DashboardSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for row in &self.rows {
            writeln!(f, "  {:<28}{}", row.label, row.value)?;
        }
        Ok(())
    }
}

/// Dashboard bound to a provider
pub struct HealthDashboard {
    state: Arc<RwLock<DashboardState>>,
    revision: Arc<watch::Sender<u64>>,
    observers: Vec<JoinHandle<()>>,
    authorized: bool,
}

impl HealthDashboard {
    /// Authorize, load one-shot values and start observers
    ///
    /// Provider failures are logged and leave the affected values at `N/A`.
    /// Must be called from within a tokio runtime.
    pub async fn connect(provider: Arc<dyn HealthProvider>, today: NaiveDate) -> Self {
        let state = Arc::new(RwLock::new(DashboardState::default()));
        let (revision, _) = watch::channel(0u64);
        let mut dashboard = Self {
            state,
            revision: Arc::new(revision),
            observers: Vec::new(),
            authorized: false,
        };

        match provider.request_authorization(&MetricKind::readable()).await {
            Ok(true) => dashboard.authorized = true,
            Ok(false) => {
                warn!("health data authorization denied");
                return dashboard;
            }
            Err(e) => {
                warn!(error = %e, "authorization error");
                return dashboard;
            }
        }

        dashboard.load_basics(provider.as_ref(), today).await;
        dashboard.load_one_shot(provider.as_ref()).await;
        dashboard.start_observers(provider.as_ref());
        info!(observers = dashboard.observers.len(), "health dashboard connected");
        dashboard
    }

    async fn load_basics(&self, provider: &dyn HealthProvider, today: NaiveDate) {
        let sex = match provider.biological_sex().await {
            Ok(sex) => SexReading::Known(sex),
            Err(e) => {
                warn!(error = %e, "error retrieving biological sex");
                SexReading::Error
            }
        };

        let age = match provider.date_of_birth().await {
            Ok(dob) => {
                let age = dob.age_on(today);
                if age.is_none() {
                    warn!("date of birth did not include a year");
                }
                age
            }
            Err(e) => {
                warn!(error = %e, "error fetching date of birth");
                None
            }
        };

        let mut state = self.state.write();
        state.sex = sex;
        state.age = age;
    }

    async fn load_one_shot(&self, provider: &dyn HealthProvider) {
        for metric in [MetricKind::SleepHours, MetricKind::WorkoutsCount] {
            let value = match provider.fetch_latest(metric).await {
                Ok(value) => value,
                Err(e) => {
                    warn!(%metric, error = %e, "fetch failed");
                    None
                }
            };
            self.state.write().set(metric, value);
        }
    }

    fn start_observers(&mut self, provider: &dyn HealthProvider) {
        for metric in MetricKind::OBSERVED {
            let mut rx = match provider.observe(metric) {
                Ok(rx) => rx,
                Err(e) => {
                    warn!(%metric, error = %e, "could not start observer");
                    continue;
                }
            };

            // seed synchronously so the first render after connect is complete
            let initial = *rx.borrow_and_update();
            self.state.write().set(metric, initial);

            let state = Arc::clone(&self.state);
            let revision = Arc::clone(&self.revision);
            self.observers.push(tokio::spawn(async move {
                while rx.changed().await.is_ok() {
                    let value = *rx.borrow_and_update();
                    debug!(%metric, ?value, "observer update");
                    state.write().set(metric, value);
                    revision.send_modify(|r| *r += 1);
                }
            }));
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub fn state(&self) -> DashboardState {
        self.state.read().clone()
    }

    pub fn render(&self) -> Vec<DashboardSection> {
        self.state.read().render()
    }

    /// Ticks once per observer update applied to the state
    pub fn updates(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Stop all observer tasks
    pub fn shutdown(self) {
        for handle in &self.observers {
            handle.abort();
        }
    }
}

impl Drop for HealthDashboard {
    fn drop(&mut self) {
        for handle in &self.observers {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_renders_na() {
        let sections = DashboardState::default().render();
        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["Basic Metrics", "Activity", "Body Measurements", "Hearing", "Heart", "Sleep"]
        );
        assert!(sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .all(|row| row.value == "N/A"));
    }

    #[test]
    fn test_render_values() {
        let mut state = DashboardState {
            age: Some(37),
            sex: SexReading::Known(BiologicalSex::Female),
            ..DashboardState::default()
        };
        state.set(MetricKind::Steps, Some(10_234.0));
        state.set(MetricKind::SleepHours, Some(6.8));

        let sections = state.render();
        assert_eq!(sections[0].rows[0].value, "37");
        assert_eq!(sections[0].rows[1].value, "Female");

        let activity = &sections[1];
        let steps = activity.rows.iter().find(|r| r.label == "Steps").unwrap();
        assert_eq!(steps.value, "10234");
        assert_eq!(sections[5].rows[0].value, "6.8 hrs");
    }

    #[test]
    fn test_unsupported_metrics_not_rendered() {
        let sections = DashboardState::default().render();
        assert!(!sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .any(|row| row.label == "Cardio Recovery"));
    }

    #[test]
    fn test_sex_reading_text() {
        assert_eq!(SexReading::Unknown.to_string(), "N/A");
        assert_eq!(SexReading::Error.to_string(), "Error");
        assert_eq!(SexReading::Known(BiologicalSex::NotSet).to_string(), "Not Set");
    }

    #[test]
    fn test_set_none_clears_value() {
        let mut state = DashboardState::default();
        state.set(MetricKind::Weight, Some(80.0));
        state.set(MetricKind::Weight, None);
        assert_eq!(state.value(MetricKind::Weight), None);
    }

    #[test]
    fn test_feature_snapshot_fills_gaps_only() {
        let mut state = DashboardState {
            age: Some(52),
            sex: SexReading::Known(BiologicalSex::Male),
            ..DashboardState::default()
        };
        state.set(MetricKind::Bmi, Some(29.4));

        let from_live = state.feature_snapshot(&HealthSnapshot::default());
        assert_eq!(from_live.bmi, Some(29.4));
        // 50-54 is group 7
        assert_eq!(from_live.age, Some(7.0));
        assert_eq!(from_live.sex, Some(BiologicalSex::Male));

        let survey = HealthSnapshot {
            bmi: Some(31.0),
            sex: Some(BiologicalSex::Female),
            high_bp: Some(1.0),
            ..HealthSnapshot::default()
        };
        let merged = state.feature_snapshot(&survey);
        assert_eq!(merged.bmi, Some(31.0));
        assert_eq!(merged.age, Some(7.0));

        let coded = HealthSnapshot {
            age: Some(11.0),
            ..HealthSnapshot::default()
        };
        assert_eq!(state.feature_snapshot(&coded).age, Some(11.0));
        assert_eq!(merged.sex, Some(BiologicalSex::Female));
        assert_eq!(merged.high_bp, Some(1.0));
    }

    #[test]
    fn test_sex_error_is_not_used_as_input() {
        let state = DashboardState {
            sex: SexReading::Error,
            ..DashboardState::default()
        };
        assert_eq!(state.feature_snapshot(&HealthSnapshot::default()).sex, None);
    }
}
