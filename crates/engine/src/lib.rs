//! `glrecon-engine` — GL reconciliation compliance engine.
//!
//! Pure engine crate: receives normalized records, returns evaluated
//! verdicts. No CLI or IO dependencies.

pub mod checks;
pub mod coerce;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod model;
pub mod summary;

pub use criteria::Criteria;
pub use engine::{evaluate, evaluate_record, run};
pub use error::EvalError;
pub use model::{EvalReport, EvaluationResult, ReconciliationRecord, Severity, Status};
