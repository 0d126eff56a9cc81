use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;
use tracing::debug;

use crate::composition::{Changes, Composition, Resolver, StepResult};
use crate::error::MultiError;

struct NamedStep<K, V, E> {
    name: K,
    resolver: Resolver<K, V, E>,
}

/// An in-memory composition of named steps.
///
/// Steps execute sequentially in registration order. Each resolver sees the
/// results of the steps completed before it. The first failure value or
/// error stops the run; steps after it never execute.
pub struct Multi<K, V, E> {
    steps: Vec<NamedStep<K, V, E>>,
    duplicate: Option<K>,
}

impl<K, V, E> Default for Multi<K, V, E> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            duplicate: None,
        }
    }
}

impl<K, V, E> Multi<K, V, E> {
    /// Create an empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &K> {
        self.steps.iter().map(|step| &step.name)
    }
}

impl<K, V, E> Multi<K, V, E>
where
    K: PartialEq + Clone,
{
    fn push(&mut self, name: K, resolver: Resolver<K, V, E>) {
        if self.duplicate.is_none() && self.steps.iter().any(|step| step.name == name) {
            self.duplicate = Some(name.clone());
        }
        self.steps.push(NamedStep { name, resolver });
    }

    /// Append every step of `other` after the steps of `self`.
    #[must_use]
    pub fn append(mut self, other: Self) -> Self {
        if self.duplicate.is_none() {
            self.duplicate = other.duplicate;
        }
        for step in other.steps {
            self.push(step.name, step.resolver);
        }
        self
    }
}

impl<K, V, E> Multi<K, V, E>
where
    K: Eq + Hash + Clone + Debug,
    V: Debug,
    E: Debug,
{
    /// Execute every step, returning the changes map on success.
    ///
    /// # Errors
    ///
    /// Returns `MultiError::DuplicateStep` without running anything if two
    /// steps share a name, `MultiError::StepFailed` if a step returns a
    /// failure value and `MultiError::StepErrored` if a resolver errors.
    pub fn execute(&self) -> Result<Changes<K, V>, MultiError<K, V, E>> {
        if let Some(step) = &self.duplicate {
            return Err(MultiError::DuplicateStep { step: step.clone() });
        }

        let mut changes: Changes<K, V> = IndexMap::with_capacity(self.steps.len());

        for step in &self.steps {
            debug!(step = ?step.name, completed = changes.len(), "running step");

            match (step.resolver)(&changes) {
                Ok(Ok(value)) => {
                    debug!(step = ?step.name, "step completed");
                    changes.insert(step.name.clone(), value);
                }
                Ok(Err(value)) => {
                    debug!(step = ?step.name, value = ?value, "step failed, stopping run");
                    return Err(MultiError::StepFailed {
                        step: step.name.clone(),
                        value,
                        changes,
                    });
                }
                Err(source) => {
                    debug!(step = ?step.name, error = ?source, "step raised, stopping run");
                    return Err(MultiError::StepErrored {
                        step: step.name.clone(),
                        source,
                    });
                }
            }
        }

        debug!(steps = changes.len(), "run completed");
        Ok(changes)
    }
}

impl<K, V, E> Composition for Multi<K, V, E>
where
    K: PartialEq + Clone,
{
    type Key = K;
    type Value = V;
    type Error = E;

    fn run<F>(mut self, name: K, resolver: F) -> Self
    where
        F: Fn(&Changes<K, V>) -> Result<StepResult<V>, E> + Send + Sync + 'static,
    {
        self.push(name, Box::new(resolver));
        self
    }
}
