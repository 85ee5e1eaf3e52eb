use thiserror::Error;

/// Errors reported to the user. Everything here aborts the current command
/// before any output is produced; I/O failures go through `anyhow` instead.
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unsupported function '{0}'. Supported: sin, cos, tan, sqr, exp, log, poly")]
    UnsupportedFunction(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        CalcError::InvalidInput(msg.into())
    }
}
