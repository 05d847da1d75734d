#![forbid(unsafe_code)]

//! Mock backend producing employee rosters as JSON.
//!
//! Two modes:
//!
//! - [`MockBackend::sample`]: three fixed employees, each booked 10:00-19:00
//!   with a 14:00-15:00 break.
//! - [`MockBackend::random`]: a seeded roster of between 300 and 1000
//!   employees (configurable), each with one booked period at least two hours
//!   long on a 15 minute grid and a break starting one hour in.
//!
//! The backend does not sleep. It reports the latency a real service would
//! have via [`MockBackend::latency`] and leaves waiting to the caller.
//!
//! # Invariants
//!
//! 1. Every generated period passes [`Period::validate`]; the break is cut at
//!    the period end when the period is shorter than four hours.
//! 2. Ids are unique across employees and periods within one backend.
//! 3. The same seed yields the same roster.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::day::{HOUR_MS, MINUTE_MS};
use crate::employee::Employee;
use crate::period::{Id, Period, PeriodType};

/// Default simulated round-trip.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(200);
/// Default roster size range.
pub const DEFAULT_EMPLOYEES: RangeInclusive<usize> = 300..=1000;

const MIN_SHIFT_MS: i64 = 2 * HOUR_MS;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chen", "Dana", "Elif", "Farid", "Greta", "Hiro", "Ines", "Jonas", "Kira",
    "Liam", "Mara", "Nils", "Olga", "Pavel", "Quinn", "Rosa", "Sven", "Tara", "Umar", "Vera",
    "Wes", "Yara", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Andersen", "Brooks", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Hoffman", "Ivanova",
    "Jensen", "Kowalski", "Lopez", "Moreau", "Novak", "Okafor", "Petrov", "Quist", "Rossi",
    "Schmidt", "Tanaka", "Ueda", "Varga", "Weber", "Young", "Zhang",
];

/// Errors from the mock backend.
#[derive(Debug)]
pub enum MockError {
    /// Roster size range is empty.
    EmptyRange { min: usize, max: usize },
    /// Serialization failed.
    Json(serde_json::Error),
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRange { min, max } => {
                write!(f, "mock roster range {min}..={max} is empty")
            }
            Self::Json(e) => write!(f, "mock roster serialization failed: {e}"),
        }
    }
}

impl std::error::Error for MockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyRange { .. } => None,
            Self::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for MockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Sample,
    Random,
}

/// Roster source standing in for a scheduling service.
#[derive(Debug, Clone)]
pub struct MockBackend {
    mode: Mode,
    rng: SmallRng,
    employees: RangeInclusive<usize>,
    latency: Duration,
    next_id: u64,
}

impl MockBackend {
    /// The fixed three-employee sample.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            mode: Mode::Sample,
            rng: SmallRng::seed_from_u64(0),
            employees: 3..=3,
            latency: DEFAULT_LATENCY,
            next_id: 0,
        }
    }

    /// Random roster generator. `None` seeds from the OS.
    #[must_use]
    pub fn random(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            mode: Mode::Random,
            rng,
            employees: DEFAULT_EMPLOYEES,
            latency: DEFAULT_LATENCY,
            next_id: 0,
        }
    }

    /// Set the roster size range for random mode.
    pub fn with_employee_range(mut self, min: usize, max: usize) -> Result<Self, MockError> {
        if min > max {
            return Err(MockError::EmptyRange { min, max });
        }
        self.employees = min..=max;
        Ok(self)
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Simulated response latency.
    #[inline]
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    /// Roster for the day starting at `day_start` (epoch ms).
    pub fn roster(&mut self, day_start: i64) -> Vec<Employee> {
        let employees = match self.mode {
            Mode::Sample => sample_roster(day_start),
            Mode::Random => {
                let count = self.rng.random_range(self.employees.clone());
                (0..count).map(|_| self.random_employee(day_start)).collect()
            }
        };
        debug!(
            employees = employees.len(),
            day_start,
            latency_ms = self.latency.as_millis() as u64,
            "mock roster generated"
        );
        employees
    }

    /// Roster serialized as a JSON array.
    pub fn roster_json(&mut self, day_start: i64) -> Result<String, MockError> {
        Ok(serde_json::to_string(&self.roster(day_start))?)
    }

    fn next_id(&mut self) -> Id {
        let id = self.next_id;
        self.next_id += 1;
        Id::Num(id)
    }

    fn random_employee(&mut self, day_start: i64) -> Employee {
        let id = self.next_id();
        let first = FIRST_NAMES[self.rng.random_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[self.rng.random_range(0..LAST_NAMES.len())];
        let period = self.random_period(day_start);
        Employee::new(id, format!("{first} {last}")).with_period(period)
    }

    fn random_period(&mut self, day_start: i64) -> Period {
        let quarter = 15 * MINUTE_MS;
        let from_hour: i64 = self.rng.random_range(0..=12);
        let from = from_hour * HOUR_MS + self.rng.random_range(0..=3_i64) * quarter;

        // Ends fall on the quarter-hour grid up to 23:45.
        let last_slot = (23 * HOUR_MS + 3 * quarter) / quarter;
        let first_slot = (from + MIN_SHIFT_MS) / quarter;
        let to = self.rng.random_range(first_slot..=last_slot) * quarter;

        let break_from = from + HOUR_MS;
        let break_to = (from + 4 * HOUR_MS).min(to);
        Period::new(
            self.next_id(),
            PeriodType::Booked,
            day_start + from,
            day_start + to,
        )
        .with_break(day_start + break_from, day_start + break_to)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::sample()
    }
}

/// Tim Cook, Mark Zuckerberg and Jeff Bezos, each booked 10:00-19:00 with a
/// 14:00-15:00 break. Period ids are 1, 3 and 5.
#[must_use]
pub fn sample_roster(day_start: i64) -> Vec<Employee> {
    let shift = |id: u64| {
        Period::new(
            id,
            PeriodType::Booked,
            day_start + 10 * HOUR_MS,
            day_start + 19 * HOUR_MS,
        )
        .with_break(day_start + 14 * HOUR_MS, day_start + 15 * HOUR_MS)
    };
    vec![
        Employee::new(1_u64, "Tim Cook").with_period(shift(1)),
        Employee::new(2_u64, "Mark Zuckerberg").with_period(shift(3)),
        Employee::new(3_u64, "Jeff Bezos").with_period(shift(5)),
    ]
}
