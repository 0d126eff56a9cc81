use std::fmt;
use std::sync::Arc;

use multistep_multi::StepResult;

use crate::response::Response;

/// How an untagged return value becomes a [`StepResult`].
pub enum WrapPolicy<V> {
    /// Treat the value as a success.
    Success,
    /// Treat the value as a failure.
    Failure,
    /// Map the value with a custom function.
    Custom(Arc<dyn Fn(V) -> StepResult<V> + Send + Sync>),
}

impl<V> WrapPolicy<V> {
    /// Policy delegating to `f`.
    #[must_use]
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(V) -> StepResult<V> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Apply the policy to an untagged value.
    pub fn wrap(&self, value: V) -> StepResult<V> {
        match self {
            Self::Success => Ok(value),
            Self::Failure => Err(value),
            Self::Custom(f) => f(value),
        }
    }
}

impl<V> Default for WrapPolicy<V> {
    fn default() -> Self {
        Self::Success
    }
}

impl<V> Clone for WrapPolicy<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Success => Self::Success,
            Self::Failure => Self::Failure,
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

impl<V> fmt::Debug for WrapPolicy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("Success"),
            Self::Failure => f.write_str("Failure"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// `true` wraps as success, `false` as failure.
impl<V> From<bool> for WrapPolicy<V> {
    fn from(wrap_as_success: bool) -> Self {
        if wrap_as_success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Normalize a function's response: tagged responses pass through unchanged,
/// untagged ones go through `policy`.
pub fn normalize<V>(response: Response<V>, policy: &WrapPolicy<V>) -> StepResult<V> {
    match response {
        Response::Success(value) => Ok(value),
        Response::Failure(value) => Err(value),
        Response::Untagged(value) => policy.wrap(value),
    }
}
