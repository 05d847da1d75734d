#![forbid(unsafe_code)]

//! Period: one contiguous interval on an employee's timeline.
//!
//! Timestamps are absolute epoch milliseconds. A period may contain a
//! nested break.
//!
//! # Invariants
//!
//! 1. `from <= to`.
//! 2. With a break: `from <= break.from <= break.to <= to`.
//!
//! [`Period::validate`] checks both; the store refuses updates that would
//! break them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a period or employee. Data sources use either numbers or
/// strings, and identity must survive a JSON round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(u64),
    Text(String),
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self::Num(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Kind of period shown on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodType {
    Available,
    Unavailable,
    Booked,
    Unpublished,
    BookedOnOtherSchedule,
}

impl PeriodType {
    /// All variants, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Available,
        Self::Unavailable,
        Self::Booked,
        Self::Unpublished,
        Self::BookedOnOtherSchedule,
    ];

    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Booked => "booked",
            Self::Unpublished => "unpublished",
            Self::BookedOnOtherSchedule => "booked-on-other-schedule",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Break nested inside a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPeriod {
    pub from: i64,
    pub to: i64,
}

impl BreakPeriod {
    #[must_use]
    pub const fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// Break translated by `diff` milliseconds.
    #[must_use]
    pub const fn shifted(self, diff: i64) -> Self {
        Self {
            from: self.from + diff,
            to: self.to + diff,
        }
    }
}

/// A period on an employee's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: Id,
    #[serde(rename = "type")]
    pub kind: PeriodType,
    pub editable: bool,
    pub from: i64,
    pub to: i64,
    #[serde(rename = "break", default, skip_serializing_if = "Option::is_none")]
    pub break_period: Option<BreakPeriod>,
}

impl Period {
    /// Editable period without a break.
    #[must_use]
    pub fn new(id: impl Into<Id>, kind: PeriodType, from: i64, to: i64) -> Self {
        Self {
            id: id.into(),
            kind,
            editable: true,
            from,
            to,
            break_period: None,
        }
    }

    /// Attach a break.
    #[must_use]
    pub fn with_break(mut self, from: i64, to: i64) -> Self {
        self.break_period = Some(BreakPeriod::new(from, to));
        self
    }

    /// Set the editable flag.
    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Length in milliseconds.
    #[inline]
    #[must_use]
    pub const fn duration_ms(&self) -> i64 {
        self.to - self.from
    }

    /// Check the ordering invariants.
    pub fn validate(&self) -> Result<(), PeriodError> {
        if self.from > self.to {
            return Err(PeriodError::Inverted {
                from: self.from,
                to: self.to,
            });
        }
        if let Some(brk) = self.break_period {
            if brk.from > brk.to {
                return Err(PeriodError::InvertedBreak {
                    from: brk.from,
                    to: brk.to,
                });
            }
            if brk.from < self.from || brk.to > self.to {
                return Err(PeriodError::BreakOutside {
                    from: self.from,
                    to: self.to,
                    break_from: brk.from,
                    break_to: brk.to,
                });
            }
        }
        Ok(())
    }
}

/// Ordering invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodError {
    /// `from > to`.
    Inverted { from: i64, to: i64 },
    /// `break.from > break.to`.
    InvertedBreak { from: i64, to: i64 },
    /// Break not contained in the period.
    BreakOutside {
        from: i64,
        to: i64,
        break_from: i64,
        break_to: i64,
    },
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverted { from, to } => write!(f, "period starts at {from} after it ends at {to}"),
            Self::InvertedBreak { from, to } => {
                write!(f, "break starts at {from} after it ends at {to}")
            }
            Self::BreakOutside {
                from,
                to,
                break_from,
                break_to,
            } => write!(
                f,
                "break {break_from}..{break_to} lies outside period {from}..{to}"
            ),
        }
    }
}

impl std::error::Error for PeriodError {}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;

    #[test]
    fn json_uses_wire_names() {
        let period = Period::new(7_u64, PeriodType::BookedOnOtherSchedule, 0, 2 * HOUR)
            .with_break(HOUR / 2, HOUR);
        let json = serde_json::to_value(&period).unwrap();
        assert_eq!(json["type"], "booked-on-other-schedule");
        assert_eq!(json["break"]["from"], HOUR / 2);
        assert_eq!(json["id"], 7);

        let back: Period = serde_json::from_value(json).unwrap();
        assert_eq!(back, period);
    }

    #[test]
    fn string_ids_survive() {
        let json = r#"{"id":"p-1","type":"booked","editable":false,"from":1,"to":2}"#;
        let period: Period = serde_json::from_str(json).unwrap();
        assert_eq!(period.id, Id::from("p-1"));
        assert!(!period.editable);
        assert!(period.break_period.is_none());
    }

    #[test]
    fn validate_ordering() {
        assert!(Period::new(1_u64, PeriodType::Booked, 0, HOUR).validate().is_ok());
        assert!(Period::new(1_u64, PeriodType::Booked, HOUR, HOUR).validate().is_ok());
        assert_eq!(
            Period::new(1_u64, PeriodType::Booked, HOUR, 0).validate(),
            Err(PeriodError::Inverted { from: HOUR, to: 0 })
        );
        assert!(matches!(
            Period::new(1_u64, PeriodType::Booked, 0, HOUR)
                .with_break(HOUR / 2, 2 * HOUR)
                .validate(),
            Err(PeriodError::BreakOutside { .. })
        ));
        assert!(matches!(
            Period::new(1_u64, PeriodType::Booked, 0, HOUR)
                .with_break(HOUR / 2, HOUR / 4)
                .validate(),
            Err(PeriodError::InvertedBreak { .. })
        ));
    }

    #[test]
    fn break_shift() {
        assert_eq!(BreakPeriod::new(10, 20).shifted(-5), BreakPeriod::new(5, 15));
    }
}
