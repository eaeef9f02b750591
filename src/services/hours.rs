//! Per-staff, per-week hour accounting.
//!
//! Weekly minutes are the sum over days of the merged per-day intervals,
//! so a staff member double-booked across rooms in the same time window is
//! counted once. The weekly-hours hard constraint reuses this computation
//! with its own tolerance, which keeps the two checks arithmetically
//! consistent.

use crate::models::assignment::StaffWeekAssignment;
use crate::models::time::merge_minutes;
use crate::report::{HoursDiscrepancy, HoursReport, StaffWeekHours};
use crate::rules::RuleConfig;
use std::collections::{BTreeMap, BTreeSet};

/// staff-id → expected weekly hours, supplied by the staff registry.
pub type TargetHoursTable = BTreeMap<String, f64>;

/// Round to two decimals, the report's hour granularity.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Target lookup with whitespace-tolerant keys. Schedule staff ids are
/// trimmed at parse time; registry keys may not be.
pub fn lookup_target(targets: &TargetHoursTable, staff: &str) -> Option<f64> {
    targets.get(staff).copied().or_else(|| {
        targets
            .iter()
            .find_map(|(key, value)| (key.trim() == staff).then_some(*value))
    })
}

/// Merged minutes worked by one staff member in one week, across all days
/// and rooms.
pub fn weekly_minutes(assignment: &StaffWeekAssignment, staff: &str, week: &str) -> u32 {
    assignment
        .per_staff
        .get(staff)
        .and_then(|weeks| weeks.get(week))
        .map(|days| {
            days.values()
                .map(|shifts| {
                    let ranges: Vec<_> = shifts.iter().map(|s| s.range).collect();
                    merge_minutes(&ranges)
                })
                .sum()
        })
        .unwrap_or(0)
}

/// Weeks to account for one staff member: the canonical cycle plus any
/// week keys actually observed for them. Shared with the weekly-hours
/// constraint so the two checks cover the same weeks.
pub(crate) fn weeks_for(
    assignment: &StaffWeekAssignment,
    rules: &RuleConfig,
    staff: &str,
) -> BTreeSet<String> {
    let mut weeks: BTreeSet<String> = rules.week_keys.iter().cloned().collect();
    if let Some(observed) = assignment.per_staff.get(staff) {
        weeks.extend(observed.keys().cloned());
    }
    weeks
}

/// Every staff member the hours report covers: scheduled staff plus
/// everyone in the target table.
pub fn staff_universe(
    assignment: &StaffWeekAssignment,
    targets: &TargetHoursTable,
) -> BTreeSet<String> {
    let mut staff: BTreeSet<String> = assignment.per_staff.keys().cloned().collect();
    staff.extend(targets.keys().map(|k| k.trim().to_string()));
    staff.retain(|s| !s.is_empty());
    staff
}

/// Compute the hours report: calculated versus expected hours per
/// staff/week, plus the discrepancy list beyond `rules.hours_tolerance`.
///
/// Staff without a target entry are still reported (expected = None) but
/// never produce discrepancies; without a target there is nothing to judge
/// against.
pub fn compute_hours_report(
    assignment: &StaffWeekAssignment,
    targets: &TargetHoursTable,
    rules: &RuleConfig,
) -> HoursReport {
    let mut report = HoursReport::default();

    for staff in staff_universe(assignment, targets) {
        let expected = lookup_target(targets, &staff);
        let mut week_entries = BTreeMap::new();

        for week in weeks_for(assignment, rules, &staff) {
            let calculated = round2(weekly_minutes(assignment, &staff, &week) as f64 / 60.0);
            week_entries.insert(
                week.clone(),
                StaffWeekHours {
                    calculated_hours: calculated,
                    expected_hours: expected,
                },
            );

            if let Some(expected_hours) = expected {
                let difference = round2(calculated - expected_hours);
                if difference.abs() > rules.hours_tolerance {
                    report.hours_discrepancies.push(HoursDiscrepancy {
                        staff_id: staff.clone(),
                        week,
                        calculated_hours: calculated,
                        expected_hours,
                        difference,
                    });
                }
            }
        }

        report.staff_weeks.insert(staff, week_entries);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::parse_schedule_json_str;
    use crate::rules::default_rules;

    fn assignment_from(json: &str) -> StaffWeekAssignment {
        StaffWeekAssignment::build(&parse_schedule_json_str(json).unwrap())
    }

    fn one_room_week(day_slots: &str) -> String {
        format!(
            r#"{{
                "schedules": [
                    {{ "room": "Mýran", "weeks": {{ "week1": {{ {day_slots} }} }} }}
                ]
            }}"#
        )
    }

    #[test]
    fn test_weekly_minutes_merges_overlaps() {
        let assignment = assignment_from(&one_room_week(
            r#""monday": { "09:00-11:30": ["J"], "11:00-13:00": ["J"] }"#,
        ));
        // 09:00-13:00 merged, not 2.5h + 2h.
        assert_eq!(weekly_minutes(&assignment, "J", "week1"), 240);
    }

    #[test]
    fn test_cross_room_overlap_counted_once() {
        let assignment = assignment_from(
            r#"{
                "schedules": [
                    { "room": "Mýran", "weeks": { "week1": { "monday": { "09:00-11:30": ["J"] } } } },
                    { "room": "Tjørnin", "weeks": { "week1": { "monday": { "09:00-11:30": ["J"] } } } }
                ]
            }"#,
        );
        assert_eq!(weekly_minutes(&assignment, "J", "week1"), 150);
    }

    #[test]
    fn test_report_within_tolerance_has_no_discrepancy() {
        let week = r#"{ "monday": { "09:00-15:00": ["J"] } }"#;
        let json = format!(
            r#"{{
                "schedules": [
                    {{
                        "room": "Mýran",
                        "weeks": {{
                            "week1": {week}, "week2": {week},
                            "week3": {week}, "week4": {week}
                        }}
                    }}
                ]
            }}"#
        );
        let assignment = assignment_from(&json);
        let targets = TargetHoursTable::from([("J".to_string(), 6.0)]);

        let report = compute_hours_report(&assignment, &targets, default_rules());
        assert!(report.hours_discrepancies.is_empty());
        let week1 = &report.staff_weeks["J"]["week1"];
        assert_eq!(week1.calculated_hours, 6.0);
        assert_eq!(week1.expected_hours, Some(6.0));
    }

    #[test]
    fn test_unscheduled_canonical_weeks_are_discrepancies() {
        // Scheduled in week1 only: the other canonical weeks are 0h
        // against the target and must each show up.
        let assignment = assignment_from(&one_room_week(
            r#""monday": { "09:00-15:00": ["J"] }"#,
        ));
        let targets = TargetHoursTable::from([("J".to_string(), 6.0)]);

        let report = compute_hours_report(&assignment, &targets, default_rules());
        let weeks: Vec<&str> = report
            .hours_discrepancies
            .iter()
            .map(|d| d.week.as_str())
            .collect();
        assert_eq!(weeks, vec!["week2", "week3", "week4"]);
        assert!(report
            .hours_discrepancies
            .iter()
            .all(|d| d.calculated_hours == 0.0 && d.difference == -6.0));
    }

    #[test]
    fn test_report_flags_discrepancy_with_signed_difference() {
        let assignment = assignment_from(&one_room_week(
            r#""monday": { "09:00-15:00": ["J"] }"#,
        ));
        let targets = TargetHoursTable::from([("J".to_string(), 8.0)]);

        let report = compute_hours_report(&assignment, &targets, default_rules());
        // week1 short by 2h; weeks 2-4 short by 8h each.
        assert_eq!(report.hours_discrepancies.len(), 4);
        let week1 = report
            .hours_discrepancies
            .iter()
            .find(|d| d.week == "week1")
            .unwrap();
        assert_eq!(week1.difference, -2.0);
    }

    #[test]
    fn test_staff_without_target_reported_without_discrepancy() {
        let assignment = assignment_from(&one_room_week(
            r#""monday": { "09:00-15:00": ["Q"] }"#,
        ));
        let targets = TargetHoursTable::new();

        let report = compute_hours_report(&assignment, &targets, default_rules());
        assert!(report.hours_discrepancies.is_empty());
        assert_eq!(report.staff_weeks["Q"]["week1"].expected_hours, None);
    }

    #[test]
    fn test_target_only_staff_still_reported() {
        let assignment = assignment_from(&one_room_week(
            r#""monday": { "09:00-15:00": ["J"] }"#,
        ));
        let targets = TargetHoursTable::from([("Absent".to_string(), 30.0)]);

        let report = compute_hours_report(&assignment, &targets, default_rules());
        assert_eq!(report.staff_weeks["Absent"]["week1"].calculated_hours, 0.0);
        assert_eq!(report.hours_discrepancies.len(), 4);
    }

    #[test]
    fn test_target_lookup_trims_keys() {
        let targets = TargetHoursTable::from([(" J ".to_string(), 30.0)]);
        assert_eq!(lookup_target(&targets, "J"), Some(30.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(29.999), 30.0);
        assert_eq!(round2(7.125), 7.13);
        assert_eq!(round2(0.0), 0.0);
    }
}
