//! Hard-constraint checkers.
//!
//! Six independent rule families evaluated over the same read-only
//! [`StaffWeekAssignment`]. Each family appends to its own bucket; families
//! never short-circuit each other and violations are never deduplicated,
//! so one cell can contribute to several buckets. Within a bucket,
//! discovery order is preserved.

use crate::models::assignment::{SlotEntry, StaffWeekAssignment};
use crate::models::time::{format_minutes, TimeRange};
use crate::report::Violation;
use crate::rules::{RuleConfig, StaffingRule, StaffingScope};
use crate::services::hours::{
    lookup_target, round2, staff_universe, weekly_minutes, weeks_for, TargetHoursTable,
};
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of one rule family; doubles as the report bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConstraintId {
    OperatingHours,
    ScheduleCycle,
    WeeklyHours,
    FridayEarlyLeave,
    FixedStaffSchedules,
    StaffingLevels,
}

impl ConstraintId {
    pub const ALL: [ConstraintId; 6] = [
        ConstraintId::OperatingHours,
        ConstraintId::ScheduleCycle,
        ConstraintId::WeeklyHours,
        ConstraintId::FridayEarlyLeave,
        ConstraintId::FixedStaffSchedules,
        ConstraintId::StaffingLevels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintId::OperatingHours => "operating_hours",
            ConstraintId::ScheduleCycle => "schedule_cycle",
            ConstraintId::WeeklyHours => "weekly_hours",
            ConstraintId::FridayEarlyLeave => "friday_early_leave",
            ConstraintId::FixedStaffSchedules => "fixed_staff_schedules",
            ConstraintId::StaffingLevels => "staffing_levels",
        }
    }
}

/// Shared read-only state handed to every checker.
pub struct CheckContext<'a> {
    pub assignment: &'a StaffWeekAssignment,
    pub targets: &'a TargetHoursTable,
    pub rules: &'a RuleConfig,
}

/// One rule family: reads the context, returns its bucket.
pub type CheckFn = fn(&CheckContext) -> Vec<Violation>;

/// The checker registry, in report order. The families are independent
/// pure functions; the assembler runs them sequentially but nothing in
/// their contracts requires it.
pub fn registry() -> Vec<(ConstraintId, CheckFn)> {
    vec![
        (ConstraintId::OperatingHours, check_operating_hours),
        (ConstraintId::ScheduleCycle, check_schedule_cycle),
        (ConstraintId::WeeklyHours, check_weekly_hours),
        (ConstraintId::FridayEarlyLeave, check_friday_early_leave),
        (ConstraintId::FixedStaffSchedules, check_fixed_staff),
        (ConstraintId::StaffingLevels, check_staffing_levels),
    ]
}

fn non_empty_staff(entry: &SlotEntry) -> impl Iterator<Item = &String> {
    entry.staff.iter().filter(|s| !s.is_empty())
}

/// Constraint 1: every interval inside the operating window, every day key
/// one of the five weekdays.
fn check_operating_hours(ctx: &CheckContext) -> Vec<Violation> {
    let mut violations = Vec::new();
    // (room, week, day, staff) — staff is None for days with no named staff.
    let mut flagged_days: BTreeSet<(String, String, String, Option<String>)> = BTreeSet::new();
    let window = ctx.rules.operating;

    for entry in &ctx.assignment.slots {
        if !ctx.rules.weekdays.iter().any(|d| d == &entry.day) {
            let mut named: Vec<Option<String>> =
                non_empty_staff(entry).cloned().map(Some).collect();
            if named.is_empty() {
                named.push(None);
            }
            for staff in named {
                let key = (
                    entry.room.clone(),
                    entry.week.clone(),
                    entry.day.clone(),
                    staff.clone(),
                );
                if !flagged_days.insert(key) {
                    continue;
                }
                let mut violation = Violation::new(format!(
                    "'{}' is not an operating day (monday-friday)",
                    entry.day
                ))
                .with_room(&entry.room)
                .with_week(&entry.week)
                .with_day(&entry.day);
                if let Some(staff) = staff {
                    violation = violation.with_staff(staff);
                }
                violations.push(violation);
            }
        }

        if !entry.range.within(&window) {
            for staff in non_empty_staff(entry) {
                violations.push(
                    Violation::new(format!(
                        "shift {} is outside operating hours {}",
                        entry.range, window
                    ))
                    .with_staff(staff)
                    .with_room(&entry.room)
                    .with_week(&entry.week)
                    .with_day(&entry.day)
                    .with_slot(&entry.label),
                );
            }
        }
    }

    violations
}

/// Constraint 2: each room's week-key set equals the canonical 4-week
/// cycle. Missing and extra keys are reported separately.
fn check_schedule_cycle(ctx: &CheckContext) -> Vec<Violation> {
    let mut violations = Vec::new();
    let expected: BTreeSet<&str> = ctx.rules.week_keys.iter().map(String::as_str).collect();

    for (room, week_keys) in &ctx.assignment.room_weeks {
        let present: BTreeSet<&str> = week_keys.iter().map(String::as_str).collect();

        let missing: Vec<&str> = expected.difference(&present).copied().collect();
        if !missing.is_empty() {
            violations.push(
                Violation::new(format!("missing weeks: {}", missing.join(", ")))
                    .with_room(room),
            );
        }

        let extra: Vec<&str> = present.difference(&expected).copied().collect();
        if !extra.is_empty() {
            violations.push(
                Violation::new(format!("extra weeks: {}", extra.join(", "))).with_room(room),
            );
        }
    }

    violations
}

/// Constraint 3: merged weekly hours must match the target within 0.1h.
/// Shares the interval-merging arithmetic with the hours report.
fn check_weekly_hours(ctx: &CheckContext) -> Vec<Violation> {
    let mut violations = Vec::new();

    for staff in staff_universe(ctx.assignment, ctx.targets) {
        let Some(target) = lookup_target(ctx.targets, &staff) else {
            // No target entry: judged by the hours report instead.
            continue;
        };

        for week in weeks_for(ctx.assignment, ctx.rules, &staff) {
            let actual = round2(weekly_minutes(ctx.assignment, &staff, &week) as f64 / 60.0);
            let difference = round2(actual - target);
            if difference.abs() > ctx.rules.weekly_rule_tolerance {
                violations.push(
                    Violation::new(format!(
                        "worked {actual:.2}h, target {target:.2}h (difference {difference:+.2}h)"
                    ))
                    .with_staff(&staff)
                    .with_week(&week),
                );
            }
        }
    }

    violations
}

/// Constraint 4: exactly one fridayEarlyLeave tag per staff member over
/// the cycle. Only the tags are inspected; whether the tagged Friday
/// actually ends at 12:00 is not cross-checked.
fn check_friday_early_leave(ctx: &CheckContext) -> Vec<Violation> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, staff) in &ctx.assignment.early_leave {
        *counts.entry(staff.as_str()).or_insert(0) += 1;
    }

    let mut staff_ids: BTreeSet<&str> =
        ctx.assignment.per_staff.keys().map(String::as_str).collect();
    staff_ids.extend(counts.keys());

    let mut violations = Vec::new();
    for staff in staff_ids {
        let count = counts.get(staff).copied().unwrap_or(0);
        if count != 1 {
            violations.push(
                Violation::new(format!(
                    "{count} fridayEarlyLeave assignments over the 4-week cycle, expected exactly 1"
                ))
                .with_staff(staff),
            );
        }
    }

    violations
}

/// Constraint 5: hard-coded coverage for named staff members.
fn check_fixed_staff(ctx: &CheckContext) -> Vec<Violation> {
    let mut violations = Vec::new();

    for rule in &ctx.rules.fixed_staff {
        for week in &ctx.rules.week_keys {
            for day in &rule.days {
                let shifts = ctx.assignment.shifts_for(&rule.staff_id, week, day);

                let Some(shifts) = shifts else {
                    violations.push(
                        Violation::new(format!(
                            "not scheduled on {day} (required {} in {})",
                            rule.window, rule.room
                        ))
                        .with_staff(&rule.staff_id)
                        .with_week(week)
                        .with_day(day),
                    );
                    continue;
                };

                if shifts.is_empty() {
                    violations.push(
                        Violation::new(format!("has no shifts on {day}"))
                            .with_staff(&rule.staff_id)
                            .with_week(week)
                            .with_day(day),
                    );
                    continue;
                }

                let earliest = shifts.iter().map(|s| s.range.start).min().unwrap_or(0);
                let latest = shifts.iter().map(|s| s.range.end).max().unwrap_or(0);
                if earliest > rule.window.start || latest < rule.window.end {
                    violations.push(
                        Violation::new(format!(
                            "covers {}-{} but must cover {}",
                            format_minutes(earliest),
                            format_minutes(latest),
                            rule.window
                        ))
                        .with_staff(&rule.staff_id)
                        .with_week(week)
                        .with_day(day),
                    );
                }

                if !shifts.iter().any(|s| s.room == rule.room) {
                    violations.push(
                        Violation::new(format!("not assigned to required room {}", rule.room))
                            .with_staff(&rule.staff_id)
                            .with_week(week)
                            .with_day(day),
                    );
                }
            }

            if rule.friday_off {
                let friday = ctx.assignment.shifts_for(&rule.staff_id, week, "friday");
                if friday.map(|s| !s.is_empty()).unwrap_or(false) {
                    violations.push(
                        Violation::new("must be off on Friday but is scheduled")
                            .with_staff(&rule.staff_id)
                            .with_week(week)
                            .with_day("friday"),
                    );
                }
            }
        }
    }

    violations
}

/// Constraint 6: per-slot staffing levels from the declarative table.
/// Slots without a tabulated rule are skipped.
fn check_staffing_levels(ctx: &CheckContext) -> Vec<Violation> {
    let mut violations = Vec::new();
    // (week, day, slot range) → (label, total count), discovery order.
    let mut totals: Vec<((String, String, TimeRange), (String, usize))> = Vec::new();

    for entry in &ctx.assignment.slots {
        let Some(staffing) = ctx.rules.staffing_for(&entry.range) else {
            continue;
        };
        let count = non_empty_staff(entry).count();

        match staffing.scope {
            StaffingScope::PerRoom => {
                if let Some(message) = staffing_message(&staffing.rule, &entry.room, count) {
                    violations.push(
                        Violation::new(message)
                            .with_room(&entry.room)
                            .with_week(&entry.week)
                            .with_day(&entry.day)
                            .with_slot(&entry.label),
                    );
                }
            }
            StaffingScope::Total => {
                let key = (entry.week.clone(), entry.day.clone(), entry.range);
                match totals.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, (_, running))) => *running += count,
                    None => totals.push((key, (entry.label.clone(), count))),
                }
            }
        }
    }

    for ((week, day, range), (label, count)) in totals {
        let Some(staffing) = ctx.rules.staffing_for(&range) else {
            continue;
        };
        if let Some(message) = staffing_message(&staffing.rule, "", count) {
            violations.push(
                Violation::new(format!("{message} (across all rooms)"))
                    .with_week(week)
                    .with_day(day)
                    .with_slot(label),
            );
        }
    }

    violations
}

fn staffing_message(rule: &StaffingRule, room: &str, count: usize) -> Option<String> {
    match rule {
        StaffingRule::Exact(required) if count != *required => {
            Some(format!("staff_count={count}, required exactly {required}"))
        }
        StaffingRule::Minimum(minimum) if count < *minimum => {
            Some(format!("staff_count={count}, minimum={minimum}"))
        }
        StaffingRule::MinimumWithException {
            minimum,
            exception_room,
            exception_minimum,
        } => {
            let required = if room == exception_room {
                *exception_minimum
            } else {
                *minimum
            };
            (count < required).then(|| format!("staff_count={count}, minimum={required}"))
        }
        StaffingRule::Maximum(maximum) if count > *maximum => {
            Some(format!("staff_count={count}, maximum={maximum}"))
        }
        _ => None,
    }
}
