use indexmap::IndexMap;

/// Results of the steps completed so far, keyed by step name in completion order.
pub type Changes<K, V> = IndexMap<K, V>;

/// Outcome of a single step. `Ok` is a success value, `Err` a failure value.
pub type StepResult<V> = Result<V, V>;

/// Boxed resolver stored for a registered step.
///
/// The outer `Result` carries errors raised while computing the step; the
/// inner [`StepResult`] is the step's own success or failure.
pub type Resolver<K, V, E> = Box<dyn Fn(&Changes<K, V>) -> Result<StepResult<V>, E> + Send + Sync>;

/// A builder-style collection of named steps.
///
/// Implementors own sequencing, name uniqueness and failure handling.
/// Callers only append steps and hand the composition back.
pub trait Composition: Sized {
    /// Step names, also the keys of the changes map.
    type Key;

    /// Values produced by steps.
    type Value;

    /// Errors a resolver may raise instead of producing a result.
    type Error;

    /// Append a step named `name` whose result is computed by `resolver`.
    #[must_use]
    fn run<F>(self, name: Self::Key, resolver: F) -> Self
    where
        F: Fn(&Changes<Self::Key, Self::Value>) -> Result<StepResult<Self::Value>, Self::Error>
            + Send
            + Sync
            + 'static;
}
