//! Vaktplan: a staff-schedule validation engine for a kindergarten
//! running a fixed 4-week rotation.
//!
//! The engine takes a nested schedule document (rooms → weeks → days →
//! time slots → staff) plus a table of target weekly hours, evaluates six
//! hard-constraint families over it, and returns a structured report of
//! violations and per-staff hour accounting. It is stateless: each call
//! to [`validate`] is a pure function of its inputs.
//!
//! ```no_run
//! use vaktplan::{validate_json_str, TargetHoursTable};
//!
//! let targets = TargetHoursTable::from([("J".to_string(), 30.0)]);
//! let report = validate_json_str(r#"{ "schedules": [] }"#, &targets)?;
//! println!("{} violation(s)", report.summary.total_violations);
//! # Ok::<(), vaktplan::EngineError>(())
//! ```

pub mod error;
pub mod models;
pub mod report;
pub mod rules;
pub mod services;

pub use error::{EngineError, EngineResult};
pub use models::schedule::{parse_schedule_json, parse_schedule_json_str, ScheduleDocument};
pub use report::{ScheduleReport, Violation};
pub use rules::{default_rules, RuleConfig};
pub use services::hours::TargetHoursTable;
pub use services::validate::{validate, validate_json_str};
