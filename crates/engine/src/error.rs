use std::fmt;

/// Errors raised while parsing or validating evaluation inputs.
///
/// `evaluate` itself is total and returns no `Result`; this error type is
/// used only for criteria parsing and validation.
#[derive(Debug)]
pub enum EvalError {
    /// Criteria JSON parse / deserialization error.
    CriteriaParse(String),
    /// Criteria validation error (out-of-range threshold, etc.).
    CriteriaValidation(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CriteriaParse(msg) => write!(f, "criteria parse error: {msg}"),
            Self::CriteriaValidation(msg) => write!(f, "criteria validation error: {msg}"),
        }
    }
}

impl std::error::Error for EvalError {}
