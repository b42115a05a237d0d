//! Building blocks shared by the simulation.
//!
//! - [`Rect`] - Axis-aligned bounding boxes and the overlap test used for collisions
//! - [`RandomSource`] - Injectable source of uniform draws
//! - [`SimSeed`] - Seed for a reproducible run

pub use self::{geometry::*, random::*};

mod geometry;
mod random;
