//! Health-data access for vitalrisk
//!
//! - `metric`: Readable metrics, their sections and display formatting
//! - `provider`: The `HealthProvider` capability
//! - `memory`: In-memory provider seeded from fixtures
//! - `dashboard`: Live dashboard state fed by provider observers

pub mod dashboard;
pub mod errors;
pub mod memory;
pub mod metric;
pub mod provider;

pub use dashboard::{DashboardRow, DashboardSection, DashboardState, HealthDashboard, SexReading};
pub use errors::{HealthError, Result};
pub use memory::{HealthFixture, InMemoryHealthProvider, MetricSample};
pub use metric::{MetricKind, Section, Unit};
pub use provider::{DateOfBirth, HealthProvider};
