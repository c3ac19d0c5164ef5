//! Interpretation of classifier output into emotional state and severity.
//!
//! The classifier reports a binary `prediction` plus a `confidence`. This
//! module turns that pair into the labels the rest of the client works with:
//!
//! - **prediction** 1 -> `Depression`, 0 -> `Normal`
//! - **confidence** > 0.8 -> `High`, > 0.6 -> `Moderate`, otherwise `Low`

mod interpreter;
mod types;

pub use interpreter::interpret;
pub use types::*;
