//! Register plain functions as steps of a multi-step composition.
//!
//! A step registered through [`StepAdapter`] names the arguments it needs as
//! a list of [`Keys`]. When the composition runs the step, each key is looked
//! up in the results of the steps completed so far; keys with no result are
//! passed through as literal values. The function's return value is then
//! normalized into a success or failure [`StepResult`], tagged values
//! passing through unchanged and untagged ones wrapped according to a
//! [`WrapPolicy`].
//!
//! Functions can be given inline as closures, or registered by
//! `module.function` name in a [`Registry`] and referenced with a
//! [`FunctionRef`].

mod adapter;
mod error;
mod keys;
mod options;
mod policy;
mod registry;
mod response;

pub use adapter::StepAdapter;
pub use error::{AdapterError, Result};
pub use keys::{Keys, extract_args};
pub use multistep_multi::{Changes, Composition, StepResult};
pub use options::StepOptions;
pub use policy::{WrapPolicy, normalize};
pub use registry::{FunctionRef, Registry};
pub use response::{IntoResponse, Response, failure, success};
