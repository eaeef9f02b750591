use anyhow::{bail, Context, Result};
use vaktplan::{validate, default_rules, parse_schedule_json, TargetHoursTable};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        bail!("usage: vaktplan-check <schedule.json> [targets.json]");
    }

    let schedule_path = &args[1];
    let document = parse_schedule_json(schedule_path)
        .with_context(|| format!("failed to load schedule from {schedule_path}"))?;

    let targets: TargetHoursTable = match args.get(2) {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read target hours from {path}"))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse target hours from {path}"))?
        }
        None => TargetHoursTable::new(),
    };

    let report = validate(&document, &targets, default_rules());
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.summary.total_violations > 0 {
        log::info!(
            "{} violation(s) across {} constraint(s)",
            report.summary.total_violations,
            report
                .summary
                .violations_by_constraint
                .values()
                .filter(|n| **n > 0)
                .count()
        );
    }

    Ok(())
}
