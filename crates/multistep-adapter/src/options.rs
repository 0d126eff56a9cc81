use crate::policy::WrapPolicy;

/// Configuration of a step registered by function reference.
#[derive(Debug, Clone)]
pub struct StepOptions<V> {
    /// Literal arguments appended after the resolved keys.
    pub trailing_args: Vec<V>,
    /// How untagged return values are normalized.
    pub wrap: WrapPolicy<V>,
}

impl<V> Default for StepOptions<V> {
    fn default() -> Self {
        Self {
            trailing_args: Vec::new(),
            wrap: WrapPolicy::Success,
        }
    }
}

impl<V> StepOptions<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_trailing_args(mut self, args: impl IntoIterator<Item = V>) -> Self {
        self.trailing_args = args.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_trailing_arg(mut self, arg: impl Into<V>) -> Self {
        self.trailing_args.push(arg.into());
        self
    }

    #[must_use]
    pub fn with_wrap(mut self, wrap: impl Into<WrapPolicy<V>>) -> Self {
        self.wrap = wrap.into();
        self
    }
}
