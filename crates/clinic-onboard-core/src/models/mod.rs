//! Domain models for the clinic onboarding core.

mod draft;
mod filters;
mod image;

pub use draft::*;
pub use filters::*;
pub use image::*;
