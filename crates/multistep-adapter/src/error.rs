use thiserror::Error;

use crate::registry::FunctionRef;

/// Error from registering an adapted step.
///
/// Only the module+function form can fail at registration time. Errors
/// raised by the wrapped functions themselves are never translated and reach
/// the composition unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdapterError {
    #[error("no function registered as '{function}'")]
    UnknownFunction { function: FunctionRef },

    #[error("'{function}' takes {expected} argument(s) but the step supplies {actual}")]
    ArityMismatch {
        function: FunctionRef,
        expected: usize,
        actual: usize,
    },

    #[error("invalid function reference '{0}' (expected 'module.function')")]
    InvalidFunctionRef(String),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
