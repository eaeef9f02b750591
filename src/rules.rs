//! Rulebook configuration: canonical tables and thresholds.
//!
//! The checkers never read module-level mutable state; every threshold and
//! canonical table lives in an immutable [`RuleConfig`] injected at call
//! time, so tests can substitute alternate rule tables.

use crate::models::time::{parse_range, TimeRange};
use once_cell::sync::Lazy;

/// Operating day keys, in schedule order.
pub const WEEKDAYS: [&str; 5] = ["monday", "tuesday", "wednesday", "thursday", "friday"];

/// Week keys of one full rotation cycle.
pub const WEEK_KEYS: [&str; 4] = ["week1", "week2", "week3", "week4"];

/// The week-level pseudo-field naming who leaves early on Friday,
/// after key normalization (lowercased, whitespace stripped).
pub const FRIDAY_EARLY_LEAVE_KEY: &str = "fridayearlyleave";

/// Canonical time-slot labels of an operating day.
pub const CANONICAL_SLOTS: [&str; 9] = [
    "07:30-08:00",
    "08:00-08:30",
    "08:30-09:00",
    "09:00-11:30",
    "11:30-13:00",
    "13:00-14:00",
    "14:00-16:00",
    "16:00-16:30",
    "16:30-17:00",
];

/// Whether a staffing rule counts staff per room or across all rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffingScope {
    PerRoom,
    Total,
}

/// Required staff count for one time slot.
#[derive(Debug, Clone, PartialEq)]
pub enum StaffingRule {
    /// Exactly this many staff.
    Exact(usize),
    /// At least this many staff.
    Minimum(usize),
    /// At least `minimum` staff, except `exception_room` which only
    /// needs `exception_minimum`.
    MinimumWithException {
        minimum: usize,
        exception_room: String,
        exception_minimum: usize,
    },
    /// At most this many staff.
    Maximum(usize),
}

/// Staffing requirement for one canonical slot.
#[derive(Debug, Clone)]
pub struct SlotStaffing {
    pub slot: TimeRange,
    pub rule: StaffingRule,
    pub scope: StaffingScope,
}

/// Hard-coded coverage requirement for one named staff member.
#[derive(Debug, Clone)]
pub struct FixedStaffRule {
    pub staff_id: String,
    pub room: String,
    pub window: TimeRange,
    /// Day keys (normalized) on which the window is required.
    pub days: Vec<String>,
    /// Staff member must have no Friday shifts at all.
    pub friday_off: bool,
}

/// Immutable rulebook evaluated by the hard-constraint checkers.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// Operating window; every recorded interval must lie inside it.
    pub operating: TimeRange,
    /// Week keys a valid room cycle must carry, exactly.
    pub week_keys: Vec<String>,
    /// Valid day keys.
    pub weekdays: Vec<String>,
    /// Per-slot staffing requirements, keyed by parsed slot range.
    pub staffing: Vec<SlotStaffing>,
    /// Fixed coverage requirements for named staff.
    pub fixed_staff: Vec<FixedStaffRule>,
    /// Tolerance (hours) for the hours report discrepancy list.
    pub hours_tolerance: f64,
    /// Tolerance (hours) for the weekly-hours hard constraint.
    pub weekly_rule_tolerance: f64,
}

impl RuleConfig {
    /// Look up the staffing requirement matching a parsed slot range.
    /// Slots without a tabulated rule are skipped by the checker.
    pub fn staffing_for(&self, slot: &TimeRange) -> Option<&SlotStaffing> {
        self.staffing.iter().find(|s| s.slot == *slot)
    }
}

fn slot(label: &str) -> TimeRange {
    // Table labels are compile-time constants; a typo fails at first use.
    match parse_range(label) {
        Some(range) => range,
        None => panic!("invalid slot table constant '{label}'"),
    }
}

static DEFAULT_RULES: Lazy<RuleConfig> = Lazy::new(|| {
    let light_room = "Løkurin".to_string();
    RuleConfig {
        operating: slot("07:30-17:00"),
        week_keys: WEEK_KEYS.iter().map(|k| k.to_string()).collect(),
        weekdays: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
        staffing: vec![
            // Opening: three staff share one common area.
            SlotStaffing {
                slot: slot("07:30-08:00"),
                rule: StaffingRule::Exact(3),
                scope: StaffingScope::Total,
            },
            SlotStaffing {
                slot: slot("08:00-08:30"),
                rule: StaffingRule::Minimum(1),
                scope: StaffingScope::PerRoom,
            },
            SlotStaffing {
                slot: slot("08:30-09:00"),
                rule: StaffingRule::MinimumWithException {
                    minimum: 2,
                    exception_room: light_room.clone(),
                    exception_minimum: 1,
                },
                scope: StaffingScope::PerRoom,
            },
            // Løkurin's second staff member may arrive as late as 09:30.
            SlotStaffing {
                slot: slot("09:00-11:30"),
                rule: StaffingRule::MinimumWithException {
                    minimum: 2,
                    exception_room: light_room,
                    exception_minimum: 1,
                },
                scope: StaffingScope::PerRoom,
            },
            SlotStaffing {
                slot: slot("11:30-13:00"),
                rule: StaffingRule::Minimum(2),
                scope: StaffingScope::PerRoom,
            },
            SlotStaffing {
                slot: slot("13:00-14:00"),
                rule: StaffingRule::Minimum(2),
                scope: StaffingScope::PerRoom,
            },
            SlotStaffing {
                slot: slot("14:00-16:00"),
                rule: StaffingRule::Minimum(2),
                scope: StaffingScope::PerRoom,
            },
            SlotStaffing {
                slot: slot("16:00-16:30"),
                rule: StaffingRule::Exact(1),
                scope: StaffingScope::PerRoom,
            },
            // Final closing: everyone combines into one room with one staff.
            SlotStaffing {
                slot: slot("16:30-17:00"),
                rule: StaffingRule::Maximum(1),
                scope: StaffingScope::Total,
            },
        ],
        fixed_staff: vec![
            FixedStaffRule {
                staff_id: "J".to_string(),
                room: "Mýran".to_string(),
                window: slot("09:00-15:00"),
                days: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
                friday_off: false,
            },
            FixedStaffRule {
                staff_id: "N".to_string(),
                room: "Løkurin".to_string(),
                window: slot("08:00-16:00"),
                days: WEEKDAYS[..4].iter().map(|d| d.to_string()).collect(),
                friday_off: true,
            },
        ],
        hours_tolerance: 0.05,
        weekly_rule_tolerance: 0.1,
    }
});

/// Shared default rulebook.
pub fn default_rules() -> &'static RuleConfig {
    &DEFAULT_RULES
}

impl Default for RuleConfig {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}
