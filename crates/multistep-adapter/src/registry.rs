use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{AdapterError, Result};
use crate::response::{IntoResponse, Response};

/// Symbolic `module.function` reference to a registered function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionRef {
    module: String,
    function: String,
}

impl FunctionRef {
    #[must_use]
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
        }
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.function)
    }
}

/// Parses `module.function`, splitting at the last `.` so modules may be
/// dotted paths themselves.
impl FromStr for FunctionRef {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.rsplit_once('.') {
            Some((module, function)) if !module.is_empty() && !function.is_empty() => {
                Ok(Self::new(module, function))
            }
            _ => Err(AdapterError::InvalidFunctionRef(s.to_string())),
        }
    }
}

pub(crate) type Callable<V, E> =
    Arc<dyn Fn(Vec<V>) -> std::result::Result<Response<V>, E> + Send + Sync>;

struct Entry<V, E> {
    arity: usize,
    callable: Callable<V, E>,
}

/// Functions callable by [`FunctionRef`], each with a declared arity.
///
/// References are resolved when a step is registered, so a missing function
/// or an argument count mismatch surfaces before the composition runs.
pub struct Registry<V, E> {
    functions: IndexMap<FunctionRef, Entry<V, E>>,
}

impl<V, E> Default for Registry<V, E> {
    fn default() -> Self {
        Self {
            functions: IndexMap::new(),
        }
    }
}

impl<V, E> fmt::Debug for Registry<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.functions
                    .iter()
                    .map(|(function, entry)| (function.to_string(), entry.arity)),
            )
            .finish()
    }
}

impl<V, E> Registry<V, E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    #[must_use]
    pub fn contains(&self, function: &FunctionRef) -> bool {
        self.functions.contains_key(function)
    }

    /// Declared arity of a registered function.
    #[must_use]
    pub fn arity(&self, function: &FunctionRef) -> Option<usize> {
        self.functions.get(function).map(|entry| entry.arity)
    }

    /// Register an infallible function. Replaces any previous registration
    /// under the same reference.
    #[must_use]
    pub fn register<F, R>(
        self,
        module: impl Into<String>,
        function: impl Into<String>,
        arity: usize,
        f: F,
    ) -> Self
    where
        F: Fn(Vec<V>) -> R + Send + Sync + 'static,
        R: IntoResponse<V>,
        V: 'static,
        E: 'static,
    {
        self.try_register(module, function, arity, move |args| Ok(f(args)))
    }

    /// Register a function that may fail. Its error reaches the composition
    /// unchanged.
    #[must_use]
    pub fn try_register<F, R>(
        mut self,
        module: impl Into<String>,
        function: impl Into<String>,
        arity: usize,
        f: F,
    ) -> Self
    where
        F: Fn(Vec<V>) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: IntoResponse<V>,
        V: 'static,
        E: 'static,
    {
        let callable: Callable<V, E> = Arc::new(
            move |args: Vec<V>| -> std::result::Result<Response<V>, E> {
                f(args).map(IntoResponse::into_response)
            },
        );
        self.functions
            .insert(FunctionRef::new(module, function), Entry { arity, callable });
        self
    }

    /// Look up `function` for a step supplying `supplied` arguments.
    pub(crate) fn resolve(
        &self,
        function: &FunctionRef,
        supplied: usize,
    ) -> Result<Callable<V, E>> {
        let entry = self
            .functions
            .get(function)
            .ok_or_else(|| AdapterError::UnknownFunction {
                function: function.clone(),
            })?;

        if entry.arity != supplied {
            return Err(AdapterError::ArityMismatch {
                function: function.clone(),
                expected: entry.arity,
                actual: supplied,
            });
        }

        debug!(function = %function, arity = entry.arity, "resolved registered function");
        Ok(Arc::clone(&entry.callable))
    }
}
