#![forbid(unsafe_code)]

//! Employee aggregate: a named owner of an ordered list of periods.

use serde::{Deserialize, Serialize};

use crate::day::{HOUR_MS, MINUTE_MS};
use crate::period::{Id, Period, PeriodType};

/// One timeline row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub periods: Vec<Period>,
}

impl Employee {
    #[must_use]
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            periods: Vec::new(),
        }
    }

    /// Append a period.
    #[must_use]
    pub fn with_period(mut self, period: Period) -> Self {
        self.periods.push(period);
        self
    }

    /// Look up a period by id.
    #[must_use]
    pub fn period(&self, id: &Id) -> Option<&Period> {
        self.periods.iter().find(|p| &p.id == id)
    }

    pub(crate) fn period_mut(&mut self, id: &Id) -> Option<&mut Period> {
        self.periods.iter_mut().find(|p| &p.id == id)
    }

    /// First booked period, the employee's working shift.
    #[must_use]
    pub fn working_period(&self) -> Option<&Period> {
        self.periods.iter().find(|p| p.kind == PeriodType::Booked)
    }

    /// Total booked time in milliseconds.
    #[must_use]
    pub fn booked_duration_ms(&self) -> i64 {
        self.periods
            .iter()
            .filter(|p| p.kind == PeriodType::Booked)
            .map(Period::duration_ms)
            .sum()
    }

    /// Booked time as `"{h} hours {mm} minutes"`.
    #[must_use]
    pub fn total_hours_label(&self) -> String {
        let total = self.booked_duration_ms().max(0);
        let hours = total / HOUR_MS;
        let minutes = (total - hours * HOUR_MS) as f64 / MINUTE_MS as f64;
        format!("{hours} hours {:02} minutes", minutes.round() as i64)
    }
}
