use multistep_multi::StepResult;
use serde_json::Value;

/// Return value of an adapted function, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response<V> {
    /// Already tagged as a success.
    Success(V),
    /// Already tagged as a failure.
    Failure(V),
    /// A plain value; the step's [`WrapPolicy`](crate::WrapPolicy) decides.
    Untagged(V),
}

impl<V> Response<V> {
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        !matches!(self, Self::Untagged(_))
    }
}

impl<V> From<StepResult<V>> for Response<V> {
    fn from(result: StepResult<V>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(value) => Self::Failure(value),
        }
    }
}

/// Classify a function's return value as tagged or untagged.
pub trait IntoResponse<V> {
    fn into_response(self) -> Response<V>;
}

impl<V> IntoResponse<V> for Response<V> {
    fn into_response(self) -> Response<V> {
        self
    }
}

impl<V> IntoResponse<V> for StepResult<V> {
    fn into_response(self) -> Response<V> {
        self.into()
    }
}

// Plain values are never inspected for a tag shape; tagging goes through
// `Response` or `StepResult` only.
macro_rules! untagged_response {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoResponse<$ty> for $ty {
                fn into_response(self) -> Response<$ty> {
                    Response::Untagged(self)
                }
            }
        )*
    };
}

untagged_response!(
    Value,
    (),
    bool,
    char,
    String,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);

/// Tag `value` as a success.
#[must_use]
pub fn success<V>(value: impl Into<V>) -> Response<V> {
    Response::Success(value.into())
}

/// Tag `value` as a failure.
#[must_use]
pub fn failure<V>(value: impl Into<V>) -> Response<V> {
    Response::Failure(value.into())
}
