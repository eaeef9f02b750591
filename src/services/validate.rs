//! Validation entry points: parse, check, report.

use crate::error::EngineResult;
use crate::models::assignment::StaffWeekAssignment;
use crate::models::schedule::{parse_schedule_json_str, ScheduleDocument};
use crate::report::{ReportSummary, ScheduleReport, Violation};
use crate::rules::{default_rules, RuleConfig};
use crate::services::constraints::{registry, CheckContext};
use crate::services::hours::{compute_hours_report, TargetHoursTable};
use std::collections::BTreeMap;

/// Validate a parsed schedule document against a rulebook.
///
/// Pure function of its inputs: the same document, targets, and rules
/// always produce the same report, down to violation order.
pub fn validate(
    document: &ScheduleDocument,
    targets: &TargetHoursTable,
    rules: &RuleConfig,
) -> ScheduleReport {
    let assignment = StaffWeekAssignment::build(document);
    let ctx = CheckContext {
        assignment: &assignment,
        targets,
        rules,
    };

    let mut violations: BTreeMap<String, Vec<Violation>> = BTreeMap::new();
    for (id, check) in registry() {
        let bucket = check(&ctx);
        log::debug!("{}: {} violation(s)", id.as_str(), bucket.len());
        violations.insert(id.as_str().to_string(), bucket);
    }

    let summary = ReportSummary::from_buckets(&violations);
    let hours = compute_hours_report(&assignment, targets, rules);

    ScheduleReport {
        violations,
        summary,
        hours,
    }
}

/// Parse a schedule JSON string and validate it under the default rules.
pub fn validate_json_str(
    json: &str,
    targets: &TargetHoursTable,
) -> EngineResult<ScheduleReport> {
    let document = parse_schedule_json_str(json)?;
    Ok(validate(&document, targets, default_rules()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::constraints::ConstraintId;

    #[test]
    fn test_report_carries_every_bucket() {
        let report = validate_json_str(r#"{ "schedules": [] }"#, &TargetHoursTable::new())
            .expect("empty document should validate");

        for id in ConstraintId::ALL {
            assert!(report.violations.contains_key(id.as_str()), "{}", id.as_str());
        }
        // An empty document still misses every fixed-staff requirement:
        // J on 4 weeks x 5 days, N on 4 weeks x 4 days.
        assert_eq!(report.violations["fixed_staff_schedules"].len(), 36);
        assert_eq!(report.summary.total_violations, 36);
    }

    #[test]
    fn test_summary_totals_match_buckets() {
        let json = r#"{
            "schedules": [
                { "room": "Tjørnin", "weeks": { "week1": { "monday": { "08:30-09:00": ["A"] } } } }
            ]
        }"#;
        let report = validate_json_str(json, &TargetHoursTable::new()).unwrap();

        let counted: usize = report.violations.values().map(Vec::len).sum();
        assert_eq!(report.summary.total_violations, counted);
        assert!(report.summary.total_violations > 0);
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        let result = validate_json_str(r#"{ "schedules": 7 }"#, &TargetHoursTable::new());
        assert!(result.is_err());
    }
}
