#![forbid(unsafe_code)]

//! Single source of truth for the timeline roster, with change notification.
//!
//! # Design
//!
//! [`TimelineStore`] is a cheap, cloneable handle to shared state
//! (`Rc<RefCell<..>>`). Every clone sees the same employees and the same
//! subscribers. Mutations go through [`TimelineStore::update_period`] (the
//! period update protocol) or [`TimelineStore::replace_employees`]; after a
//! successful mutation that changed something, subscribers are called in
//! registration order with a [`StoreChange`].
//!
//! # Invariants
//!
//! 1. `version` increments by exactly 1 per value-changing mutation.
//! 2. An update that leaves the record unchanged is a no-op: no version bump
//!    and no notification. Re-committing the same value is therefore free of
//!    side effects.
//! 3. A period update is applied atomically: subscribers never observe a
//!    record with only some of the requested fields written.
//! 4. Stored periods always satisfy [`Period::validate`]; updates that would
//!    violate it are rejected and leave the store untouched.
//!
//! # Failure Modes
//!
//! - **Re-entrant mutation**: subscribers may read the store and may even
//!   call `update_period`; no borrow is held while callbacks run.
//! - **Subscriber leak**: dropped [`Subscription`] guards leave dead weak
//!   entries behind, pruned on the next notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::employee::Employee;
use crate::period::{BreakPeriod, Id, Period, PeriodError};

type CallbackRc = Rc<dyn Fn(&StoreChange)>;
type CallbackWeak = Weak<dyn Fn(&StoreChange)>;

// ---------------------------------------------------------------------------
// Protocol types
// ---------------------------------------------------------------------------

/// Partial update for one period. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodUpdate {
    /// Restrict the lookup to one employee. `None` searches every row.
    pub employee_id: Option<Id>,
    pub period_id: Id,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub break_period: Option<BreakPeriod>,
}

impl PeriodUpdate {
    /// Empty update for `period_id`.
    #[must_use]
    pub fn new(period_id: impl Into<Id>) -> Self {
        Self {
            employee_id: None,
            period_id: period_id.into(),
            from: None,
            to: None,
            break_period: None,
        }
    }

    #[must_use]
    pub fn employee(mut self, employee_id: impl Into<Id>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    #[must_use]
    pub fn from(mut self, from: i64) -> Self {
        self.from = Some(from);
        self
    }

    #[must_use]
    pub fn to(mut self, to: i64) -> Self {
        self.to = Some(to);
        self
    }

    #[must_use]
    pub fn break_period(mut self, break_period: BreakPeriod) -> Self {
        self.break_period = Some(break_period);
        self
    }

    fn apply_to(&self, period: &Period) -> Period {
        let mut next = period.clone();
        if let Some(from) = self.from {
            next.from = from;
        }
        if let Some(to) = self.to {
            next.to = to;
        }
        if let Some(brk) = self.break_period {
            next.break_period = Some(brk);
        }
        next
    }
}

/// Notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// One period was rewritten; carries the new record.
    PeriodUpdated { employee_id: Id, period: Period },
    /// The whole roster was replaced.
    Reloaded { employees: usize },
}

/// Errors from store mutations.
#[derive(Debug)]
pub enum StoreError {
    /// No period with that id (in the requested employee, if any).
    UnknownPeriod { period_id: Id },
    /// The merged record would break the period invariants.
    InvalidPeriod { period_id: Id, source: PeriodError },
    /// Roster JSON could not be parsed.
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPeriod { period_id } => write!(f, "unknown period {period_id}"),
            Self::InvalidPeriod { period_id, source } => {
                write!(f, "rejected update of period {period_id}: {source}")
            }
            Self::Json(e) => write!(f, "roster JSON error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownPeriod { .. } => None,
            Self::InvalidPeriod { source, .. } => Some(source),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

// ---------------------------------------------------------------------------
// TimelineStore
// ---------------------------------------------------------------------------

struct StoreInner {
    employees: Vec<Employee>,
    version: u64,
    subscribers: Vec<CallbackWeak>,
}

/// Shared, version-tracked roster with change notification.
///
/// Cloning a `TimelineStore` creates a new handle to the **same** state.
pub struct TimelineStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl Clone for TimelineStore {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for TimelineStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TimelineStore")
            .field("employees", &inner.employees.len())
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TimelineStore {
    /// Store holding `employees`, version 0, no subscribers.
    #[must_use]
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                employees,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Store loaded from a JSON array of employees.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(Self::new(parse_roster(json)?))
    }

    /// Clone of the whole roster.
    #[must_use]
    pub fn employees(&self) -> Vec<Employee> {
        self.inner.borrow().employees.clone()
    }

    /// Access the roster by reference.
    pub fn with_employees<R>(&self, f: impl FnOnce(&[Employee]) -> R) -> R {
        f(&self.inner.borrow().employees)
    }

    /// Number of employees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().employees.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone of one employee.
    #[must_use]
    pub fn employee(&self, id: &Id) -> Option<Employee> {
        self.inner
            .borrow()
            .employees
            .iter()
            .find(|e| &e.id == id)
            .cloned()
    }

    /// Clone of one period, searched across all employees.
    #[must_use]
    pub fn period(&self, id: &Id) -> Option<Period> {
        self.inner
            .borrow()
            .employees
            .iter()
            .find_map(|e| e.period(id))
            .cloned()
    }

    /// Current version. Increments by 1 per effective mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Serialize the roster as a JSON array.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.inner.borrow().employees)?)
    }

    /// Merge `update` into the stored period.
    ///
    /// Returns the resulting record. Unchanged records are returned without
    /// notifying anyone.
    pub fn update_period(&self, update: PeriodUpdate) -> Result<Period, StoreError> {
        let (employee_id, next) = {
            let mut inner = self.inner.borrow_mut();
            let employee = inner
                .employees
                .iter_mut()
                .filter(|e| update.employee_id.as_ref().is_none_or(|id| &e.id == id))
                .find(|e| e.period(&update.period_id).is_some())
                .ok_or_else(|| StoreError::UnknownPeriod {
                    period_id: update.period_id.clone(),
                })?;
            let employee_id = employee.id.clone();
            let period = employee
                .period_mut(&update.period_id)
                .ok_or_else(|| StoreError::UnknownPeriod {
                    period_id: update.period_id.clone(),
                })?;

            let next = update.apply_to(period);
            if next == *period {
                return Ok(next);
            }
            next.validate().map_err(|source| StoreError::InvalidPeriod {
                period_id: update.period_id.clone(),
                source,
            })?;
            *period = next.clone();
            inner.version += 1;
            debug!(
                period = %update.period_id,
                from = next.from,
                to = next.to,
                version = inner.version,
                "period updated"
            );
            (employee_id, next)
        };

        self.notify(&StoreChange::PeriodUpdated {
            employee_id,
            period: next.clone(),
        });
        Ok(next)
    }

    /// Replace the whole roster (day switch, reload).
    pub fn replace_employees(&self, employees: Vec<Employee>) {
        let change = {
            let mut inner = self.inner.borrow_mut();
            inner.employees = employees;
            inner.version += 1;
            StoreChange::Reloaded {
                employees: inner.employees.len(),
            }
        };
        self.notify(&change);
    }

    /// Subscribe to changes. Dropping the returned guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&StoreChange) + 'static) -> Subscription {
        let strong: CallbackRc = Rc::new(callback);
        self.inner.borrow_mut().subscribers.push(Rc::downgrade(&strong));
        Subscription { _guard: strong }
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self, change: &StoreChange) {
        let callbacks: Vec<CallbackRc> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &callbacks {
            cb(change);
        }
    }
}

/// Parse a JSON array of employees, validating every period.
pub fn parse_roster(json: &str) -> Result<Vec<Employee>, StoreError> {
    let employees: Vec<Employee> = serde_json::from_str(json)?;
    for period in employees.iter().flat_map(|e| e.periods.iter()) {
        period.validate().map_err(|source| StoreError::InvalidPeriod {
            period_id: period.id.clone(),
            source,
        })?;
    }
    Ok(employees)
}

/// RAII guard for a store subscriber.
pub struct Subscription {
    _guard: CallbackRc,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::HOUR_MS;
    use crate::period::PeriodType;
    use std::cell::Cell;

    fn roster() -> Vec<Employee> {
        vec![
            Employee::new(1_u64, "Ada").with_period(
                Period::new(10_u64, PeriodType::Booked, 10 * HOUR_MS, 19 * HOUR_MS)
                    .with_break(14 * HOUR_MS, 15 * HOUR_MS),
            ),
            Employee::new(2_u64, "Grace").with_period(Period::new(
                20_u64,
                PeriodType::Available,
                8 * HOUR_MS,
                12 * HOUR_MS,
            )),
        ]
    }

    #[test]
    fn update_merges_and_preserves_untouched_fields() {
        let store = TimelineStore::new(roster());
        let updated = store
            .update_period(PeriodUpdate::new(10_u64).to(18 * HOUR_MS))
            .unwrap();
        assert_eq!(updated.from, 10 * HOUR_MS);
        assert_eq!(updated.to, 18 * HOUR_MS);
        assert_eq!(updated.kind, PeriodType::Booked);
        assert_eq!(
            updated.break_period,
            Some(BreakPeriod::new(14 * HOUR_MS, 15 * HOUR_MS))
        );
        assert_eq!(store.version(), 1);
        assert_eq!(store.period(&Id::Num(10)), Some(updated));
    }

    #[test]
    fn unchanged_update_is_silent() {
        let store = TimelineStore::new(roster());
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let _sub = store.subscribe(move |_| c.set(c.get() + 1));

        store
            .update_period(PeriodUpdate::new(10_u64).from(10 * HOUR_MS))
            .unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn invalid_update_is_rejected() {
        let store = TimelineStore::new(roster());
        let err = store
            .update_period(PeriodUpdate::new(10_u64).to(9 * HOUR_MS))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPeriod { .. }));
        assert_eq!(store.period(&Id::Num(10)).unwrap().to, 19 * HOUR_MS);
        assert_eq!(store.version(), 0);

        let err = store
            .update_period(PeriodUpdate::new(10_u64).to(14 * HOUR_MS + 30 * 60_000))
            .unwrap_err();
        assert!(err.to_string().contains("break"));
    }

    #[test]
    fn unknown_period_and_wrong_employee() {
        let store = TimelineStore::new(roster());
        assert!(matches!(
            store.update_period(PeriodUpdate::new(99_u64).from(0)),
            Err(StoreError::UnknownPeriod { .. })
        ));
        assert!(matches!(
            store.update_period(PeriodUpdate::new(10_u64).employee(2_u64).from(0)),
            Err(StoreError::UnknownPeriod { .. })
        ));
        assert!(
            store
                .update_period(PeriodUpdate::new(20_u64).employee(2_u64).from(9 * HOUR_MS))
                .is_ok()
        );
    }

    #[test]
    fn subscribers_see_whole_record() {
        let store = TimelineStore::new(roster());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = store.subscribe(move |change| s.borrow_mut().push(change.clone()));

        store
            .update_period(
                PeriodUpdate::new(10_u64)
                    .from(11 * HOUR_MS)
                    .to(20 * HOUR_MS)
                    .break_period(BreakPeriod::new(15 * HOUR_MS, 16 * HOUR_MS)),
            )
            .unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let StoreChange::PeriodUpdated {
            employee_id,
            period,
        } = &seen[0]
        else {
            panic!("expected PeriodUpdated");
        };
        assert_eq!(employee_id, &Id::Num(1));
        assert_eq!((period.from, period.to), (11 * HOUR_MS, 20 * HOUR_MS));
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let store = TimelineStore::new(roster());
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let sub = store.subscribe(move |_| c.set(c.get() + 1));
        store.replace_employees(roster());
        drop(sub);
        store.replace_employees(roster());
        assert_eq!(calls.get(), 1);
        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn subscriber_may_read_store() {
        let store = TimelineStore::new(roster());
        let reader = store.clone();
        let observed = Rc::new(Cell::new(0_i64));
        let o = Rc::clone(&observed);
        let _sub = store.subscribe(move |_| {
            o.set(reader.period(&Id::Num(20)).map(|p| p.to).unwrap_or(-1));
        });
        store
            .update_period(PeriodUpdate::new(20_u64).to(13 * HOUR_MS))
            .unwrap();
        assert_eq!(observed.get(), 13 * HOUR_MS);
    }

    #[test]
    fn json_round_trip_and_validation() {
        let store = TimelineStore::new(roster());
        let json = store.to_json().unwrap();
        let loaded = TimelineStore::from_json(&json).unwrap();
        assert_eq!(loaded.employees(), store.employees());

        let bad = r#"[{"id":1,"name":"X","periods":[{"id":1,"type":"booked","editable":true,"from":5,"to":1}]}]"#;
        assert!(matches!(
            TimelineStore::from_json(bad),
            Err(StoreError::InvalidPeriod { .. })
        ));
        assert!(matches!(
            TimelineStore::from_json("not json"),
            Err(StoreError::Json(_))
        ));
    }
}
