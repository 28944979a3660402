//! Catalog of health metrics the dashboard knows about
//!
//! Each metric carries its unit, dashboard section, label and the formatting
//! rule used when it is shown. Metrics without a provider-side source stay in
//! the catalog but always read as absent, and the dashboard leaves them out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement unit a provider reports a metric in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Kilocalorie,
    Minute,
    Count,
    Meter,
    DegreeCelsius,
    Kilogram,
    /// Fraction in `0.0..=1.0`, displayed as a percentage
    Percent,
    DecibelA,
    BeatsPerMinute,
    Millisecond,
    /// mL/kg*min
    Vo2Max,
    Hour,
    KilocaloriePerHourKilogram,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Kilocalorie => "kcal",
            Unit::Minute => "min",
            Unit::Count => "",
            Unit::Meter => "m",
            Unit::DegreeCelsius => "°C",
            Unit::Kilogram => "kg",
            Unit::Percent => "%",
            Unit::DecibelA => "dBA",
            Unit::BeatsPerMinute => "BPM",
            Unit::Millisecond => "ms",
            Unit::Vo2Max => "mL/kg*min",
            Unit::Hour => "hrs",
            Unit::KilocaloriePerHourKilogram => "kcal/hr·kg",
        }
    }
}

/// Dashboard grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Activity,
    BodyMeasurements,
    Hearing,
    Heart,
    Sleep,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Activity,
        Section::BodyMeasurements,
        Section::Hearing,
        Section::Heart,
        Section::Sleep,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Activity => "Activity",
            Section::BodyMeasurements => "Body Measurements",
            Section::Hearing => "Hearing",
            Section::Heart => "Heart",
            Section::Sleep => "Sleep",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    // Activity
    BasalEnergy,
    ActiveEnergy,
    ExerciseMinutes,
    Steps,
    WalkingRunningDistance,
    FlightsClimbed,
    WorkoutsCount,
    PhysicalEffort,
    TimeInDaylight,
    // Body measurements
    BodyTemperature,
    Weight,
    Height,
    Bmi,
    BodyFatPercentage,
    LeanBodyMass,
    // Hearing
    EnvironmentalSound,
    HeadphoneAudio,
    // Heart
    HeartRate,
    RestingHeartRate,
    HeartRateVariability,
    CardioFitness,
    WalkingHeartRateAverage,
    CardioRecovery,
    HighHeartRateNotifications,
    // Sleep
    SleepHours,
}

impl MetricKind {
    pub const ALL: [MetricKind; 25] = [
        MetricKind::BasalEnergy,
        MetricKind::ActiveEnergy,
        MetricKind::ExerciseMinutes,
        MetricKind::Steps,
        MetricKind::WalkingRunningDistance,
        MetricKind::FlightsClimbed,
        MetricKind::WorkoutsCount,
        MetricKind::PhysicalEffort,
        MetricKind::TimeInDaylight,
        MetricKind::BodyTemperature,
        MetricKind::Weight,
        MetricKind::Height,
        MetricKind::Bmi,
        MetricKind::BodyFatPercentage,
        MetricKind::LeanBodyMass,
        MetricKind::EnvironmentalSound,
        MetricKind::HeadphoneAudio,
        MetricKind::HeartRate,
        MetricKind::RestingHeartRate,
        MetricKind::HeartRateVariability,
        MetricKind::CardioFitness,
        MetricKind::WalkingHeartRateAverage,
        MetricKind::CardioRecovery,
        MetricKind::HighHeartRateNotifications,
        MetricKind::SleepHours,
    ];

    /// Quantity metrics kept live through observers
    pub const OBSERVED: [MetricKind; 18] = [
        MetricKind::BasalEnergy,
        MetricKind::ActiveEnergy,
        MetricKind::ExerciseMinutes,
        MetricKind::Steps,
        MetricKind::WalkingRunningDistance,
        MetricKind::FlightsClimbed,
        MetricKind::BodyTemperature,
        MetricKind::Weight,
        MetricKind::Height,
        MetricKind::Bmi,
        MetricKind::BodyFatPercentage,
        MetricKind::LeanBodyMass,
        MetricKind::EnvironmentalSound,
        MetricKind::HeadphoneAudio,
        MetricKind::HeartRate,
        MetricKind::RestingHeartRate,
        MetricKind::HeartRateVariability,
        MetricKind::CardioFitness,
    ];

    /// Metrics that have a provider-side source
    pub fn readable() -> Vec<MetricKind> {
        Self::ALL.into_iter().filter(|m| m.is_supported()).collect()
    }

    /// Stable snake_case identifier, as used in fixtures
    pub fn identifier(self) -> &'static str {
        match self {
            MetricKind::BasalEnergy => "basal_energy",
            MetricKind::ActiveEnergy => "active_energy",
            MetricKind::ExerciseMinutes => "exercise_minutes",
            MetricKind::Steps => "steps",
            MetricKind::WalkingRunningDistance => "walking_running_distance",
            MetricKind::FlightsClimbed => "flights_climbed",
            MetricKind::WorkoutsCount => "workouts_count",
            MetricKind::PhysicalEffort => "physical_effort",
            MetricKind::TimeInDaylight => "time_in_daylight",
            MetricKind::BodyTemperature => "body_temperature",
            MetricKind::Weight => "weight",
            MetricKind::Height => "height",
            MetricKind::Bmi => "bmi",
            MetricKind::BodyFatPercentage => "body_fat_percentage",
            MetricKind::LeanBodyMass => "lean_body_mass",
            MetricKind::EnvironmentalSound => "environmental_sound",
            MetricKind::HeadphoneAudio => "headphone_audio",
            MetricKind::HeartRate => "heart_rate",
            MetricKind::RestingHeartRate => "resting_heart_rate",
            MetricKind::HeartRateVariability => "heart_rate_variability",
            MetricKind::CardioFitness => "cardio_fitness",
            MetricKind::WalkingHeartRateAverage => "walking_heart_rate_average",
            MetricKind::CardioRecovery => "cardio_recovery",
            MetricKind::HighHeartRateNotifications => "high_heart_rate_notifications",
            MetricKind::SleepHours => "sleep_hours",
        }
    }

    /// Dashboard row label
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::BasalEnergy => "Resting Energy",
            MetricKind::ActiveEnergy => "Active Energy",
            MetricKind::ExerciseMinutes => "Exercise Minutes",
            MetricKind::Steps => "Steps",
            MetricKind::WalkingRunningDistance => "Walking + Running Distance",
            MetricKind::FlightsClimbed => "Flights Climbed",
            MetricKind::WorkoutsCount => "Workouts",
            MetricKind::PhysicalEffort => "Physical Effort",
            MetricKind::TimeInDaylight => "Time in Daylight",
            MetricKind::BodyTemperature => "Body Temperature",
            MetricKind::Weight => "Weight",
            MetricKind::Height => "Height",
            MetricKind::Bmi => "BMI",
            MetricKind::BodyFatPercentage => "Body Fat %",
            MetricKind::LeanBodyMass => "Lean Body Mass",
            MetricKind::EnvironmentalSound => "Env. Sound Levels",
            MetricKind::HeadphoneAudio => "Headphone Audio",
            MetricKind::HeartRate => "Current HR",
            MetricKind::RestingHeartRate => "Resting HR",
            MetricKind::HeartRateVariability => "HR Variability",
            MetricKind::CardioFitness => "Cardio Fitness",
            MetricKind::WalkingHeartRateAverage => "Walking HR Average",
            MetricKind::CardioRecovery => "Cardio Recovery",
            MetricKind::HighHeartRateNotifications => "High HR Notifications",
            MetricKind::SleepHours => "Sleep Hours",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            MetricKind::BasalEnergy | MetricKind::ActiveEnergy => Unit::Kilocalorie,
            MetricKind::ExerciseMinutes | MetricKind::TimeInDaylight => Unit::Minute,
            MetricKind::Steps
            | MetricKind::FlightsClimbed
            | MetricKind::WorkoutsCount
            | MetricKind::Bmi
            | MetricKind::HighHeartRateNotifications => Unit::Count,
            MetricKind::WalkingRunningDistance | MetricKind::Height => Unit::Meter,
            MetricKind::PhysicalEffort => Unit::KilocaloriePerHourKilogram,
            MetricKind::BodyTemperature => Unit::DegreeCelsius,
            MetricKind::Weight | MetricKind::LeanBodyMass => Unit::Kilogram,
            MetricKind::BodyFatPercentage => Unit::Percent,
            MetricKind::EnvironmentalSound | MetricKind::HeadphoneAudio => Unit::DecibelA,
            MetricKind::HeartRate
            | MetricKind::RestingHeartRate
            | MetricKind::WalkingHeartRateAverage
            | MetricKind::CardioRecovery => Unit::BeatsPerMinute,
            MetricKind::HeartRateVariability => Unit::Millisecond,
            MetricKind::CardioFitness => Unit::Vo2Max,
            MetricKind::SleepHours => Unit::Hour,
        }
    }

    pub fn section(self) -> Section {
        match self {
            MetricKind::BasalEnergy
            | MetricKind::ActiveEnergy
            | MetricKind::ExerciseMinutes
            | MetricKind::Steps
            | MetricKind::WalkingRunningDistance
            | MetricKind::FlightsClimbed
            | MetricKind::WorkoutsCount
            | MetricKind::PhysicalEffort
            | MetricKind::TimeInDaylight => Section::Activity,
            MetricKind::BodyTemperature
            | MetricKind::Weight
            | MetricKind::Height
            | MetricKind::Bmi
            | MetricKind::BodyFatPercentage
            | MetricKind::LeanBodyMass => Section::BodyMeasurements,
            MetricKind::EnvironmentalSound | MetricKind::HeadphoneAudio => Section::Hearing,
            MetricKind::HeartRate
            | MetricKind::RestingHeartRate
            | MetricKind::HeartRateVariability
            | MetricKind::CardioFitness
            | MetricKind::WalkingHeartRateAverage
            | MetricKind::CardioRecovery
            | MetricKind::HighHeartRateNotifications => Section::Heart,
            MetricKind::SleepHours => Section::Sleep,
        }
    }

    /// False for metrics no provider can supply; they always read as absent
    pub fn is_supported(self) -> bool {
        !matches!(
            self,
            MetricKind::PhysicalEffort
                | MetricKind::TimeInDaylight
                | MetricKind::WalkingHeartRateAverage
                | MetricKind::CardioRecovery
                | MetricKind::HighHeartRateNotifications
        )
    }

    pub fn is_observed(self) -> bool {
        Self::OBSERVED.contains(&self)
    }

    /// Render a reading for display
    ///
    /// Counts and heart rates are truncated to whole numbers, body fat is
    /// stored as a fraction and shown as a percentage.
    pub fn format_value(self, value: f64) -> String {
        let symbol = self.unit().symbol();
        match self {
            MetricKind::Steps
            | MetricKind::FlightsClimbed
            | MetricKind::WorkoutsCount
            | MetricKind::HighHeartRateNotifications => format!("{}", value.trunc() as i64),
            MetricKind::HeartRate
            | MetricKind::RestingHeartRate
            | MetricKind::WalkingHeartRateAverage
            | MetricKind::CardioRecovery => format!("{} {}", value.trunc() as i64, symbol),
            MetricKind::Bmi => format!("{:.1}", value),
            MetricKind::BodyFatPercentage => format!("{:.1}{}", value * 100.0, symbol),
            MetricKind::Height => format!("{:.2} {}", value, symbol),
            MetricKind::BodyTemperature
            | MetricKind::Weight
            | MetricKind::LeanBodyMass
            | MetricKind::CardioFitness
            | MetricKind::SleepHours
            | MetricKind::PhysicalEffort => format!("{:.1} {}", value, symbol),
            MetricKind::BasalEnergy
            | MetricKind::ActiveEnergy
            | MetricKind::ExerciseMinutes
            | MetricKind::WalkingRunningDistance
            | MetricKind::EnvironmentalSound
            | MetricKind::HeadphoneAudio
            | MetricKind::HeartRateVariability
            | MetricKind::TimeInDaylight => format!("{:.0} {}", value, symbol),
        }
    }

    /// `format_value` or `N/A` when there is no reading
    pub fn display(self, value: Option<f64>) -> String {
        value
            .map(|v| self.format_value(v))
            .unwrap_or_else(|| "N/A".to_string())
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
