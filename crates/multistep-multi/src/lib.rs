//! Named multi-step compositions.
//!
//! A composition is an ordered collection of named steps. Each step receives
//! the results of the steps completed before it (the changes map) and reports
//! either a success value, which is recorded under its name, or a failure
//! value, which ends the run.
//!
//! [`Composition`] is the seam other crates build on; [`Multi`] is a small
//! in-memory implementation that runs steps sequentially in registration
//! order.

mod composition;
mod error;
mod multi;

pub use composition::{Changes, Composition, Resolver, StepResult};
pub use error::MultiError;
pub use multi::Multi;
