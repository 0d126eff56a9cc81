use std::fmt::Debug;
use std::hash::Hash;

use multistep_multi::Changes;
use tracing::trace;

/// Ordered argument keys of an adapted step.
///
/// Each key either names an earlier step, whose result becomes the argument,
/// or is a literal passed through as-is. Order decides argument order.
///
/// A single key converts into a one-element list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys<K>(Vec<K>);

impl<K> Keys<K> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[K] {
        &self.0
    }
}

impl<K> From<K> for Keys<K> {
    fn from(key: K) -> Self {
        Self(vec![key])
    }
}

impl<K> From<Vec<K>> for Keys<K> {
    fn from(keys: Vec<K>) -> Self {
        Self(keys)
    }
}

impl<K, const N: usize> From<[K; N]> for Keys<K> {
    fn from(keys: [K; N]) -> Self {
        Self(keys.into())
    }
}

/// Resolve `keys` against the results of completed steps.
///
/// A key present in `changes` yields a clone of the stored result. Any other
/// key is converted into a value and used literally, so a key that happens to
/// equal a step name always resolves to that step's result.
pub fn extract_args<K, V>(keys: &Keys<K>, changes: &Changes<K, V>) -> Vec<V>
where
    K: Eq + Hash + Clone + Debug + Into<V>,
    V: Clone,
{
    keys.iter()
        .map(|key| {
            if let Some(value) = changes.get(key) {
                trace!(key = ?key, "resolved argument from changes");
                value.clone()
            } else {
                trace!(key = ?key, "no change recorded, passing key as literal");
                key.clone().into()
            }
        })
        .collect()
}
