//! Typed errors for the rate computation core

use thiserror::Error;

/// Errors raised by rate and count computations.
///
/// Both variants indicate malformed or incomplete upstream data and are
/// fatal for the computation being attempted; callers propagate them
/// rather than recover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// A recipe time, yield, or computed rate was zero where a division
    /// or reciprocal was required.
    #[error("division by zero")]
    DivisionByZero,

    /// A lookup required by the computation was absent from the context.
    /// For the launch-rate derivation this means the catalog and
    /// recipe-to-building bindings were not fully populated first.
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },
}

impl CalcError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        CalcError::NotFound {
            kind,
            key: key.into(),
        }
    }
}
