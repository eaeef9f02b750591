//! Flattened per-staff assignment structure.
//!
//! Built once per validation run from a [`ScheduleDocument`] and discarded
//! with the report; the engine keeps no state between calls. Malformed
//! nested shapes (non-object day bodies, unparsable slot labels, non-array
//! staff lists) are logged and skipped so one bad field only degrades the
//! checks that depend on it.

use crate::models::schedule::ScheduleDocument;
use crate::models::time::{parse_range, TimeRange};
use crate::rules::{FRIDAY_EARLY_LEAVE_KEY, WEEKDAYS};
use std::collections::BTreeMap;

/// One recorded shift: a time range in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffShift {
    pub room: String,
    pub range: TimeRange,
}

/// One time-slot cell of the document, kept in discovery order for the
/// staffing-level checker. `staff` preserves raw (trimmed) entries,
/// including empty strings, which are never counted as staffing.
#[derive(Debug, Clone)]
pub struct SlotEntry {
    pub room: String,
    pub week: String,
    pub day: String,
    pub label: String,
    pub range: TimeRange,
    pub staff: Vec<String>,
}

/// day key → shifts for that day.
pub type DayShifts = BTreeMap<String, Vec<StaffShift>>;
/// week key → days.
pub type WeekShifts = BTreeMap<String, DayShifts>;

/// Queryable flat view of a schedule document, owned by one validation run.
#[derive(Debug, Clone, Default)]
pub struct StaffWeekAssignment {
    /// staff → week → day → shifts (friday-early-leave tags excluded).
    pub per_staff: BTreeMap<String, WeekShifts>,
    /// Every parsed slot cell in discovery order: document room order,
    /// sorted week keys, canonical weekday order then unknown days.
    pub slots: Vec<SlotEntry>,
    /// `(week, staff)` pairs from the `fridayEarlyLeave` pseudo-field.
    pub early_leave: Vec<(String, String)>,
    /// Raw (normalized) week-key list per room, for the cycle check.
    pub room_weeks: Vec<(String, Vec<String>)>,
}

/// Lowercase a key and strip all whitespace, so `"Week 1"` and `"week1"`
/// address the same bucket.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

impl StaffWeekAssignment {
    /// Flatten a schedule document. Pure transform, never fails; anything
    /// that does not conform is logged and skipped.
    pub fn build(document: &ScheduleDocument) -> Self {
        let mut assignment = Self::default();

        for room_schedule in &document.schedules {
            let room = room_schedule.room.trim().to_string();
            let mut week_keys = Vec::new();

            for (raw_week, week_body) in &room_schedule.weeks {
                let week = normalize_key(raw_week);
                week_keys.push(week.clone());

                let Some(day_map) = week_body.as_object() else {
                    log::warn!("room '{room}' {week}: week body is not an object, skipping");
                    continue;
                };

                for (day, day_body) in ordered_days(day_map) {
                    if day == FRIDAY_EARLY_LEAVE_KEY {
                        match day_body.as_str() {
                            Some(staff) if !staff.trim().is_empty() => {
                                assignment
                                    .early_leave
                                    .push((week.clone(), staff.trim().to_string()));
                            }
                            _ => log::warn!(
                                "room '{room}' {week}: fridayEarlyLeave is not a staff id, skipping"
                            ),
                        }
                        continue;
                    }

                    let Some(slot_map) = day_body.as_object() else {
                        log::warn!("room '{room}' {week} {day}: day body is not an object, skipping");
                        continue;
                    };

                    for (label, staff_value) in slot_map {
                        let Some(range) = parse_range(label) else {
                            log::warn!(
                                "room '{room}' {week} {day}: unparsable time slot '{label}', skipping"
                            );
                            continue;
                        };
                        let Some(raw_staff) = staff_value.as_array() else {
                            log::warn!(
                                "room '{room}' {week} {day} {label}: staff list is not an array, skipping"
                            );
                            continue;
                        };

                        let staff: Vec<String> = raw_staff
                            .iter()
                            .filter_map(|v| v.as_str())
                            .map(|s| s.trim().to_string())
                            .collect();

                        for staff_id in staff.iter().filter(|s| !s.is_empty()) {
                            assignment
                                .per_staff
                                .entry(staff_id.clone())
                                .or_default()
                                .entry(week.clone())
                                .or_default()
                                .entry(day.clone())
                                .or_default()
                                .push(StaffShift {
                                    room: room.clone(),
                                    range,
                                });
                        }

                        assignment.slots.push(SlotEntry {
                            room: room.clone(),
                            week: week.clone(),
                            day: day.clone(),
                            label: label.clone(),
                            range,
                            staff,
                        });
                    }
                }
            }

            assignment.room_weeks.push((room, week_keys));
        }

        assignment
    }

    /// Shifts of one staff member on one day, if any.
    pub fn shifts_for(&self, staff: &str, week: &str, day: &str) -> Option<&Vec<StaffShift>> {
        self.per_staff.get(staff)?.get(week)?.get(day)
    }
}

/// Order a week body's entries: canonical weekday order first, then any
/// remaining keys (including the early-leave pseudo-field) sorted, so
/// violation discovery order is deterministic.
fn ordered_days(
    day_map: &serde_json::Map<String, serde_json::Value>,
) -> Vec<(String, &serde_json::Value)> {
    let normalized: BTreeMap<String, &serde_json::Value> = day_map
        .iter()
        .map(|(k, v)| (normalize_key(k), v))
        .collect();

    let mut ordered = Vec::with_capacity(normalized.len());
    for weekday in WEEKDAYS {
        if let Some(value) = normalized.get(weekday) {
            ordered.push((weekday.to_string(), *value));
        }
    }
    for (day, value) in &normalized {
        if !WEEKDAYS.contains(&day.as_str()) {
            ordered.push((day.clone(), *value));
        }
    }
    ordered
}
