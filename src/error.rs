use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// Inputs do not satisfy what the stage needs (id sets, cell counts, curves).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The metric is mathematically undefined for these inputs.
    #[error("numerical degeneracy: {0}")]
    NumericalDegeneracy(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type EvalResult<T> = std::result::Result<T, EvalError>;

pub(crate) fn precondition(msg: impl Into<String>) -> EvalError {
    EvalError::Precondition(msg.into())
}

pub(crate) fn degenerate(msg: impl Into<String>) -> EvalError {
    EvalError::NumericalDegeneracy(msg.into())
}

pub(crate) fn configuration(msg: impl Into<String>) -> EvalError {
    EvalError::Configuration(msg.into())
}
