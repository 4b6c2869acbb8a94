//! # Slot Policies
//!
//! Business rules deciding which date-times may be booked for a viewing.
//! Both policies only accept slots in the calendar week one week from now,
//! on a 20-minute grid and with enough notice for the current tenant.
//! [`ViewingHoursPolicy`] additionally restricts slots to 10:00-19:59.

use std::ops::RangeInclusive;

use chrono::{Datelike, Duration, Local, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Source of the current local date-time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Predicate over a requested viewing slot
pub trait SlotPolicy: Send + Sync {
    /// `Err` carries a human-readable reason the slot is refused.
    fn check(&self, slot: NaiveDateTime, now: NaiveDateTime) -> Result<(), String>;
}

/// Monday 10:00 through Sunday 19:40 of the week containing `now + 1 week`.
pub fn upcoming_week_range(now: NaiveDateTime) -> RangeInclusive<NaiveDateTime> {
    let next = now + Duration::weeks(1);
    let monday = next.date() - Duration::days(i64::from(next.weekday().num_days_from_monday()));
    let midnight = monday.and_time(NaiveTime::MIN);

    let start = midnight + Duration::hours(10);
    let end = midnight + Duration::days(6) + Duration::hours(19) + Duration::minutes(40);
    start..=end
}

/// Slots in the upcoming week, on the 20-minute grid, with minimum notice.
#[derive(Debug, Clone, Copy)]
pub struct UpcomingWeekPolicy {
    pub min_notice: Duration,
}

impl Default for UpcomingWeekPolicy {
    fn default() -> Self {
        Self {
            min_notice: Duration::hours(24),
        }
    }
}

impl SlotPolicy for UpcomingWeekPolicy {
    fn check(&self, slot: NaiveDateTime, now: NaiveDateTime) -> Result<(), String> {
        let week = upcoming_week_range(now);
        if !week.contains(&slot) {
            return Err(format!(
                "{} is outside the upcoming week {} - {}",
                slot,
                week.start(),
                week.end()
            ));
        }
        if !matches!(slot.minute(), 0 | 20 | 40) || slot.second() != 0 || slot.nanosecond() != 0 {
            return Err(format!("{} is not on the 20 minute grid", slot));
        }
        let earliest = now.checked_add_signed(self.min_notice).ok_or_else(|| {
            format!(
                "notice of {} hours cannot be satisfied from {}",
                self.min_notice.num_hours(),
                now
            )
        })?;
        if earliest >= slot {
            return Err(format!(
                "{} leaves the current tenant less than {} hours notice",
                slot,
                self.min_notice.num_hours()
            ));
        }
        Ok(())
    }
}

/// [`UpcomingWeekPolicy`] limited to viewing hours 10 through 19.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewingHoursPolicy {
    pub week: UpcomingWeekPolicy,
}

impl SlotPolicy for ViewingHoursPolicy {
    fn check(&self, slot: NaiveDateTime, now: NaiveDateTime) -> Result<(), String> {
        self.week.check(slot, now)?;
        if !(10..=19).contains(&slot.hour()) {
            return Err(format!("{} is outside viewing hours", slot));
        }
        Ok(())
    }
}

/// Configurable choice of slot policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SlotPolicyKind {
    #[default]
    ViewingHours,
    UpcomingWeek,
}

impl SlotPolicyKind {
    pub fn build(self, min_notice: Duration) -> Box<dyn SlotPolicy> {
        let week = UpcomingWeekPolicy { min_notice };
        match self {
            SlotPolicyKind::ViewingHours => Box::new(ViewingHoursPolicy { week }),
            SlotPolicyKind::UpcomingWeek => Box::new(week),
        }
    }
}
