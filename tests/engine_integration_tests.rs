//! End-to-end validation runs over realistic schedule documents.

use vaktplan::{validate_json_str, ScheduleReport, TargetHoursTable};

fn run(json: &str, targets: &TargetHoursTable) -> ScheduleReport {
    validate_json_str(json, targets).expect("document should validate")
}

fn bucket<'a>(report: &'a ScheduleReport, id: &str) -> &'a [vaktplan::Violation] {
    report.violations.get(id).map(Vec::as_slice).unwrap_or(&[])
}

/// A full, rule-clean week body for one standard room, staffed by two
/// generic staff members all day.
fn clean_week(a: &str, b: &str) -> String {
    format!(
        r#"{{
            "monday": {{
                "08:30-09:00": ["{a}", "{b}"],
                "09:00-11:30": ["{a}", "{b}"],
                "11:30-13:00": ["{a}", "{b}"]
            }}
        }}"#
    )
}

fn four_week_room(room: &str, a: &str, b: &str) -> String {
    let week = clean_week(a, b);
    format!(
        r#"{{
            "room": "{room}",
            "weeks": {{
                "week1": {week},
                "week2": {week},
                "week3": {week},
                "week4": {week}
            }}
        }}"#
    )
}

#[test]
fn validation_is_deterministic() {
    let json = format!(r#"{{ "schedules": [ {} ] }}"#, four_week_room("Tjørnin", "A", "B"));
    let targets = TargetHoursTable::from([("A".to_string(), 30.0)]);

    let first = serde_json::to_string(&run(&json, &targets)).unwrap();
    let second = serde_json::to_string(&run(&json, &targets)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn hours_tolerance_band_is_respected() {
    // One 4.5h monday per week; target 4.53h is within 0.05h, 4.6h is not.
    let json = format!(r#"{{ "schedules": [ {} ] }}"#, four_week_room("Tjørnin", "A", "B"));

    let inside = TargetHoursTable::from([("A".to_string(), 4.53)]);
    assert!(run(&json, &inside).hours.hours_discrepancies.is_empty());

    let outside = TargetHoursTable::from([("A".to_string(), 4.6)]);
    let report = run(&json, &outside);
    assert_eq!(report.hours.hours_discrepancies.len(), 4);
    assert_eq!(report.hours.hours_discrepancies[0].difference, -0.1);
}

#[test]
fn early_leave_every_week_is_flagged_once() {
    // Scenario: X tagged in all four weeks, so the count is 4.
    let json = r#"{
        "schedules": [
            {
                "room": "Mýran",
                "weeks": {
                    "week1": { "fridayEarlyLeave": "X" },
                    "week2": { "fridayEarlyLeave": "X" },
                    "week3": { "fridayEarlyLeave": "X" },
                    "week4": { "fridayEarlyLeave": "X" }
                }
            }
        ]
    }"#;
    let report = run(json, &TargetHoursTable::new());

    let early = bucket(&report, "friday_early_leave");
    let x: Vec<_> = early
        .iter()
        .filter(|v| v.staff_id.as_deref() == Some("X"))
        .collect();
    assert_eq!(x.len(), 1);
    assert!(x[0].message.contains('4'));
    assert!(x[0].message.contains("expected exactly 1"));
}

#[test]
fn understaffed_morning_slot_is_flagged() {
    // Scenario: Tjørnin 08:30-09:00 with two staff passes, with one fails.
    let staffed = r#"{
        "schedules": [
            { "room": "Tjørnin", "weeks": { "week1": { "monday": { "08:30-09:00": ["A", "B"] } } } }
        ]
    }"#;
    let report = run(staffed, &TargetHoursTable::new());
    assert!(bucket(&report, "staffing_levels").is_empty());

    let short = r#"{
        "schedules": [
            { "room": "Tjørnin", "weeks": { "week1": { "monday": { "08:30-09:00": ["A"] } } } }
        ]
    }"#;
    let report = run(short, &TargetHoursTable::new());
    let staffing = bucket(&report, "staffing_levels");
    assert_eq!(staffing.len(), 1);
    assert_eq!(staffing[0].message, "staff_count=1, minimum=2");
    assert_eq!(staffing[0].time_slot.as_deref(), Some("08:30-09:00"));
}

#[test]
fn fixed_staff_j_full_coverage_is_clean() {
    // Scenario: J works Mýran 09:00-15:00 every weekday, target 30h.
    let day = r#"{ "09:00-15:00": ["J"] }"#;
    let week = format!(
        r#"{{
            "monday": {day}, "tuesday": {day}, "wednesday": {day},
            "thursday": {day}, "friday": {day}
        }}"#
    );
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
    let targets = TargetHoursTable::from([("J".to_string(), 30.0)]);
    let report = run(&json, &targets);

    assert!(bucket(&report, "weekly_hours").is_empty());
    assert!(report.hours.hours_discrepancies.is_empty());
    assert!(bucket(&report, "fixed_staff_schedules")
        .iter()
        .all(|v| v.staff_id.as_deref() != Some("J")));
    for week in ["week1", "week2", "week3", "week4"] {
        assert_eq!(report.hours.staff_weeks["J"][week].calculated_hours, 30.0);
    }
}

#[test]
fn fixed_staff_n_scheduled_friday_is_one_violation() {
    // Scenario: N must be off on Fridays but has a week2 Friday shift.
    let json = r#"{
        "schedules": [
            {
                "room": "Løkurin",
                "weeks": {
                    "week2": { "friday": { "09:00-11:30": ["N"] } }
                }
            }
        ]
    }"#;
    let report = run(json, &TargetHoursTable::new());

    let friday: Vec<_> = bucket(&report, "fixed_staff_schedules")
        .iter()
        .filter(|v| v.message == "must be off on Friday but is scheduled")
        .collect();
    assert_eq!(friday.len(), 1);
    assert_eq!(friday[0].staff_id.as_deref(), Some("N"));
    assert_eq!(friday[0].week.as_deref(), Some("week2"));
}

#[test]
fn broken_cycle_reports_missing_and_extra_weeks() {
    let json = r#"{
        "schedules": [
            {
                "room": "Túgvan",
                "weeks": {
                    "week1": {}, "week2": {}, "week4": {}, "week5": {}
                }
            }
        ]
    }"#;
    let report = run(json, &TargetHoursTable::new());

    let cycle = bucket(&report, "schedule_cycle");
    assert_eq!(cycle.len(), 2);
    assert!(cycle.iter().any(|v| v.message == "missing weeks: week3"));
    assert!(cycle.iter().any(|v| v.message == "extra weeks: week5"));
}

#[test]
fn out_of_hours_shift_names_each_staff_member() {
    let json = r#"{
        "schedules": [
            {
                "room": "Spírar",
                "weeks": {
                    "week1": { "monday": { "17:00-18:00": ["A", "B"] } }
                }
            }
        ]
    }"#;
    let report = run(json, &TargetHoursTable::new());

    let hours = bucket(&report, "operating_hours");
    assert_eq!(hours.len(), 2);
    let staff: Vec<_> = hours.iter().filter_map(|v| v.staff_id.as_deref()).collect();
    assert_eq!(staff, vec!["A", "B"]);
}

#[test]
fn summary_counts_agree_with_buckets() {
    let json = r#"{
        "schedules": [
            {
                "room": "Tjørnin",
                "weeks": {
                    "week1": {
                        "monday": { "06:00-07:00": ["A"], "08:30-09:00": ["A"] }
                    }
                }
            }
        ]
    }"#;
    let report = run(json, &TargetHoursTable::new());

    let counted: usize = report.violations.values().map(Vec::len).sum();
    assert_eq!(report.summary.total_violations, counted);
    for (id, bucket) in &report.violations {
        assert_eq!(report.summary.violations_by_constraint[id], bucket.len());
    }
}

#[test]
fn malformed_cells_degrade_gracefully() {
    // A bad slot label and a non-array staff list are skipped; the rest of
    // the document is still checked.
    let json = r#"{
        "schedules": [
            {
                "room": "Tjørnin",
                "weeks": {
                    "week1": {
                        "monday": {
                            "morning": ["A"],
                            "08:30-09:00": "not-a-list",
                            "09:00-11:30": ["A", "B"]
                        }
                    }
                }
            }
        ]
    }"#;
    let report = run(json, &TargetHoursTable::new());

    assert!(bucket(&report, "staffing_levels").is_empty());
    assert!(report.hours.staff_weeks.contains_key("A"));
    assert_eq!(report.hours.staff_weeks["A"]["week1"].calculated_hours, 2.5);
}

#[test]
fn top_level_shape_error_is_fatal() {
    let result = validate_json_str(r#"{ "rooms": [] }"#, &TargetHoursTable::new());
    assert!(result.is_err());
}
