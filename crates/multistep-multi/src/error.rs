use std::fmt::Debug;

use thiserror::Error;

use crate::composition::Changes;

/// Error from executing a [`Multi`](crate::Multi).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MultiError<K: Debug, V: Debug, E: Debug> {
    /// Two steps share a name. Nothing was executed.
    #[error("step {step:?} is registered more than once")]
    DuplicateStep {
        /// The first name seen twice.
        step: K,
    },

    /// A step returned a failure value.
    #[error("step {step:?} failed")]
    StepFailed {
        /// Name of the step that failed.
        step: K,
        /// The failure value it returned.
        value: V,
        /// Results of the steps that completed before it.
        changes: Changes<K, V>,
    },

    /// A step's resolver returned an error.
    #[error("step {step:?} raised an error")]
    StepErrored {
        /// Name of the step that raised.
        step: K,
        /// The error, unchanged.
        #[source]
        source: E,
    },
}

impl<K: Debug, V: Debug, E: Debug> MultiError<K, V, E> {
    /// Name of the step the run stopped at.
    #[must_use]
    pub fn step(&self) -> &K {
        match self {
            Self::DuplicateStep { step }
            | Self::StepFailed { step, .. }
            | Self::StepErrored { step, .. } => step,
        }
    }
}
