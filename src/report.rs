//! Report types returned by the validation engine.
//!
//! All types serialize to the JSON shape consumed by the presentation
//! layer. Optional violation fields are omitted when absent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            staff_id: None,
            room: None,
            week: None,
            day: None,
            time_slot: None,
            message: message.into(),
        }
    }

    pub fn with_staff(mut self, staff_id: impl Into<String>) -> Self {
        self.staff_id = Some(staff_id.into());
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn with_week(mut self, week: impl Into<String>) -> Self {
        self.week = Some(week.into());
        self
    }

    pub fn with_day(mut self, day: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self
    }

    pub fn with_slot(mut self, time_slot: impl Into<String>) -> Self {
        self.time_slot = Some(time_slot.into());
        self
    }
}

/// Violation counts per constraint and in total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_violations: usize,
    pub violations_by_constraint: BTreeMap<String, usize>,
}

impl ReportSummary {
    pub fn from_buckets(buckets: &BTreeMap<String, Vec<Violation>>) -> Self {
        let violations_by_constraint: BTreeMap<String, usize> = buckets
            .iter()
            .map(|(id, bucket)| (id.clone(), bucket.len()))
            .collect();
        Self {
            total_violations: violations_by_constraint.values().sum(),
            violations_by_constraint,
        }
    }
}

/// Calculated versus expected hours for one staff member in one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffWeekHours {
    pub calculated_hours: f64,
    /// None when the staff member has no entry in the target table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_hours: Option<f64>,
}

/// One hours mismatch beyond the reporting tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursDiscrepancy {
    pub staff_id: String,
    pub week: String,
    pub calculated_hours: f64,
    pub expected_hours: f64,
    /// Signed: calculated minus expected.
    pub difference: f64,
}

/// Per-staff, per-week hour accounting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoursReport {
    pub staff_weeks: BTreeMap<String, BTreeMap<String, StaffWeekHours>>,
    pub hours_discrepancies: Vec<HoursDiscrepancy>,
}

/// Combined output of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// constraint-id → violations in discovery order.
    pub violations: BTreeMap<String, Vec<Violation>>,
    pub summary: ReportSummary,
    #[serde(flatten)]
    pub hours: HoursReport,
}
