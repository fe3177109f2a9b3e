//! Clinic registration wizard.

mod assemble;
mod controller;
mod steps;
mod validation;

pub use assemble::assemble;
pub use controller::*;
pub use steps::*;
pub use validation::*;
