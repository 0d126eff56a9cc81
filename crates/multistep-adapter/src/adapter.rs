use std::fmt::Debug;
use std::hash::Hash;

use multistep_multi::Composition;
use tracing::debug;

use crate::error::Result;
use crate::keys::{Keys, extract_args};
use crate::options::StepOptions;
use crate::policy::{WrapPolicy, normalize};
use crate::registry::{FunctionRef, Registry};
use crate::response::IntoResponse;

/// Register plain functions as steps of a [`Composition`].
///
/// Each registered step, when run, resolves its keys against the changes map
/// (see [`extract_args`]), calls the function with the resolved arguments and
/// normalizes the return value (see [`normalize`]).
///
/// Implemented for every composition whose keys can stand in for values.
pub trait StepAdapter: Composition {
    /// Register `f` as step `name`, wrapping untagged results as successes.
    #[must_use]
    fn adapt<F, R>(self, name: Self::Key, keys: impl Into<Keys<Self::Key>>, f: F) -> Self
    where
        F: Fn(Vec<Self::Value>) -> R + Send + Sync + 'static,
        R: IntoResponse<Self::Value>;

    /// Register `f` as step `name`, normalizing untagged results with `wrap`.
    #[must_use]
    fn adapt_with<F, R>(
        self,
        name: Self::Key,
        keys: impl Into<Keys<Self::Key>>,
        f: F,
        wrap: impl Into<WrapPolicy<Self::Value>>,
    ) -> Self
    where
        F: Fn(Vec<Self::Value>) -> R + Send + Sync + 'static,
        R: IntoResponse<Self::Value>;

    /// Register a fallible `f` as step `name`.
    ///
    /// An error from `f` is returned to the composition as-is.
    #[must_use]
    fn try_adapt<F, R>(
        self,
        name: Self::Key,
        keys: impl Into<Keys<Self::Key>>,
        f: F,
        wrap: impl Into<WrapPolicy<Self::Value>>,
    ) -> Self
    where
        F: Fn(Vec<Self::Value>) -> std::result::Result<R, Self::Error> + Send + Sync + 'static,
        R: IntoResponse<Self::Value>;

    /// Register the function `function` from `registry` as step `name`.
    ///
    /// The function receives the resolved keys followed by
    /// `options.trailing_args`.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::UnknownFunction` if `function` is not
    /// registered, and `AdapterError::ArityMismatch` if its arity differs
    /// from the number of keys plus trailing arguments.
    fn adapt_registered(
        self,
        name: Self::Key,
        keys: impl Into<Keys<Self::Key>>,
        registry: &Registry<Self::Value, Self::Error>,
        function: &FunctionRef,
        options: StepOptions<Self::Value>,
    ) -> Result<Self>;
}

impl<C> StepAdapter for C
where
    C: Composition,
    C::Key: Eq + Hash + Clone + Debug + Into<C::Value> + Send + Sync + 'static,
    C::Value: Clone + Send + Sync + 'static,
    C::Error: 'static,
{
    fn adapt<F, R>(self, name: C::Key, keys: impl Into<Keys<C::Key>>, f: F) -> Self
    where
        F: Fn(Vec<C::Value>) -> R + Send + Sync + 'static,
        R: IntoResponse<C::Value>,
    {
        self.adapt_with(name, keys, f, WrapPolicy::Success)
    }

    fn adapt_with<F, R>(
        self,
        name: C::Key,
        keys: impl Into<Keys<C::Key>>,
        f: F,
        wrap: impl Into<WrapPolicy<C::Value>>,
    ) -> Self
    where
        F: Fn(Vec<C::Value>) -> R + Send + Sync + 'static,
        R: IntoResponse<C::Value>,
    {
        self.try_adapt(name, keys, move |args| Ok(f(args)), wrap)
    }

    fn try_adapt<F, R>(
        self,
        name: C::Key,
        keys: impl Into<Keys<C::Key>>,
        f: F,
        wrap: impl Into<WrapPolicy<C::Value>>,
    ) -> Self
    where
        F: Fn(Vec<C::Value>) -> std::result::Result<R, C::Error> + Send + Sync + 'static,
        R: IntoResponse<C::Value>,
    {
        let keys = keys.into();
        let wrap = wrap.into();
        let step = name.clone();

        self.run(name, move |changes| {
            let args = extract_args(&keys, changes);
            let response = f(args)?.into_response();
            debug!(step = ?step, tagged = response.is_tagged(), "normalizing step response");
            Ok(normalize(response, &wrap))
        })
    }

    fn adapt_registered(
        self,
        name: C::Key,
        keys: impl Into<Keys<C::Key>>,
        registry: &Registry<C::Value, C::Error>,
        function: &FunctionRef,
        options: StepOptions<C::Value>,
    ) -> Result<Self> {
        let keys = keys.into();
        let StepOptions {
            trailing_args,
            wrap,
        } = options;
        let callable = registry.resolve(function, keys.len() + trailing_args.len())?;
        let step = name.clone();
        let function = function.clone();

        Ok(self.run(name, move |changes| {
            let mut args = extract_args(&keys, changes);
            args.extend(trailing_args.iter().cloned());
            let response = callable(args)?;
            debug!(
                step = ?step,
                function = %function,
                tagged = response.is_tagged(),
                "normalizing registered function response"
            );
            Ok(normalize(response, &wrap))
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use multistep_multi::{Changes, Resolver, StepResult};
    use serde_json::{Value, json};

    use super::*;
    use crate::error::AdapterError;
    use crate::response::{Response, failure};

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("{0}")]
    struct TestError(String);

    /// Composition that only stores steps, so resolvers can be driven with
    /// hand-built changes maps.
    #[derive(Default)]
    struct Recorder {
        steps: Vec<(&'static str, Resolver<&'static str, Value, TestError>)>,
    }

    impl Composition for Recorder {
        type Key = &'static str;
        type Value = Value;
        type Error = TestError;

        fn run<F>(mut self, name: &'static str, resolver: F) -> Self
        where
            F: Fn(&Changes<&'static str, Value>) -> std::result::Result<StepResult<Value>, TestError>
                + Send
                + Sync
                + 'static,
        {
            let resolver: Resolver<&'static str, Value, TestError> = Box::new(resolver);
            self.steps.push((name, resolver));
            self
        }
    }

    impl Recorder {
        fn resolve(
            &self,
            name: &str,
            changes: &[(&'static str, Value)],
        ) -> std::result::Result<StepResult<Value>, TestError> {
            let changes: Changes<&'static str, Value> = changes.iter().cloned().collect();
            let (_, resolver) = self
                .steps
                .iter()
                .find(|(step, _)| *step == name)
                .expect("step registered");
            resolver(&changes)
        }
    }

    fn list(args: Vec<Value>) -> Value {
        Value::Array(args)
    }

    fn double(args: Vec<Value>) -> Value {
        json!(args[0].as_i64().unwrap_or_default() * 2)
    }

    #[test]
    fn registration_appends_one_named_step() {
        let recorder = Recorder::default()
            .adapt("first", "a", list)
            .adapt("second", ["a", "b"], list);

        let names: Vec<_> = recorder.steps.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn arguments_follow_key_order() {
        let recorder = Recorder::default().adapt("pair", ["b", "a"], list);

        let result = recorder.resolve("pair", &[("a", json!(1)), ("b", json!(2))]);

        assert_eq!(result, Ok(Ok(json!([2, 1]))));
    }

    #[test]
    fn unresolved_key_is_passed_literally() {
        let recorder = Recorder::default().adapt("concat", ["a", "b"], list);

        let result = recorder.resolve("concat", &[("a", json!(3))]);

        assert_eq!(result, Ok(Ok(json!([3, "b"]))));
    }

    #[test]
    fn json_list_shaped_like_a_tag_stays_untagged() {
        let recorder = Recorder::default().adapt("pair", ["ok", "a"], list);

        assert_eq!(
            recorder.resolve("pair", &[("a", json!(1))]),
            Ok(Ok(json!(["ok", 1])))
        );
    }

    #[test]
    fn untagged_result_wraps_as_success_by_default() {
        let recorder = Recorder::default().adapt("double", "x", double);

        assert_eq!(
            recorder.resolve("double", &[("x", json!(10))]),
            Ok(Ok(json!(20)))
        );
    }

    #[test]
    fn wrap_policy_applies_to_untagged_results() {
        let recorder = Recorder::default()
            .adapt_with("as_failure", "x", double, false)
            .adapt_with(
                "custom",
                "x",
                double,
                WrapPolicy::custom(|v: Value| Err(json!({ "rejected": v }))),
            );

        let changes = [("x", json!(4))];
        assert_eq!(recorder.resolve("as_failure", &changes), Ok(Err(json!(8))));
        assert_eq!(
            recorder.resolve("custom", &changes),
            Ok(Err(json!({ "rejected": 8 })))
        );
    }

    #[test]
    fn tagged_failure_passes_through_regardless_of_policy() {
        let recorder = Recorder::default()
            .adapt("default", "x", |_| failure("bad input"))
            .adapt_with("custom", "x", |_| failure("bad input"), WrapPolicy::custom(Ok));

        for step in ["default", "custom"] {
            assert_eq!(
                recorder.resolve(step, &[]),
                Ok(Err(json!("bad input"))),
                "step {step}"
            );
        }
    }

    #[test]
    fn typed_step_results_are_tagged() {
        let recorder = Recorder::default().adapt_with(
            "checked",
            "n",
            |args: Vec<Value>| -> StepResult<Value> {
                match args[0].as_i64() {
                    Some(n) if n >= 0 => Ok(json!(n)),
                    _ => Err(json!("negative")),
                }
            },
            false,
        );

        assert_eq!(recorder.resolve("checked", &[("n", json!(1))]), Ok(Ok(json!(1))));
        assert_eq!(
            recorder.resolve("checked", &[("n", json!(-1))]),
            Ok(Err(json!("negative")))
        );
    }

    #[test]
    fn callable_error_propagates_unchanged() {
        let recorder = Recorder::default().try_adapt(
            "insert",
            "row",
            |_args: Vec<Value>| -> std::result::Result<Response<Value>, TestError> {
                Err(TestError("constraint violated".to_string()))
            },
            true,
        );

        assert_eq!(
            recorder.resolve("insert", &[("row", json!({}))]),
            Err(TestError("constraint violated".to_string()))
        );
    }

    #[test]
    fn resolver_is_reusable_across_invocations() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let recorder = Recorder::default().adapt("log", "x", move |args: Vec<Value>| {
            seen.lock().expect("lock").push(args[0].clone());
            json!(null)
        });

        let _ = recorder.resolve("log", &[("x", json!(1))]);
        let _ = recorder.resolve("log", &[]);

        assert_eq!(*calls.lock().expect("lock"), [json!(1), json!("x")]);
    }

    #[test]
    fn registered_function_receives_trailing_args() -> anyhow::Result<()> {
        let registry = Registry::new().register("Mailer", "send", 2, list);

        let recorder = Recorder::default().adapt_registered(
            "welcome_email",
            "email",
            &registry,
            &"Mailer.send".parse()?,
            StepOptions::new().with_trailing_arg("welcome"),
        )?;

        assert_eq!(
            recorder.resolve("welcome_email", &[("email", json!("a@b.com"))]),
            Ok(Ok(json!(["a@b.com", "welcome"])))
        );
        Ok(())
    }

    #[test]
    fn registered_function_errors_surface_at_registration() {
        let registry: Registry<Value, TestError> =
            Registry::new().register("Mailer", "send", 2, list);

        let unknown = Recorder::default().adapt_registered(
            "email",
            "email",
            &registry,
            &FunctionRef::new("Mailer", "deliver"),
            StepOptions::new(),
        );
        assert!(matches!(unknown, Err(AdapterError::UnknownFunction { .. })));

        let wrong_arity = Recorder::default().adapt_registered(
            "email",
            "email",
            &registry,
            &FunctionRef::new("Mailer", "send"),
            StepOptions::new(),
        );
        assert!(matches!(
            wrong_arity,
            Err(AdapterError::ArityMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }
}
