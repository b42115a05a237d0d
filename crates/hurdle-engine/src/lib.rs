//! Headless simulation of agents learning to jump over obstacles.
//!
//! Every agent runs in its own lane against a shared obstacle and decides on each tick
//! whether to jump, using a three-weight linear classifier over its distance to the
//! obstacle, the obstacle's speed and the remaining time. Agents score one point per tick
//! survived.
//!
//! This crate only simulates. Breeding new generations from the survivors' weights lives in
//! `hurdle-training`; frame clocks, speed schedules and rendering belong to the caller.
//!
//! # Determinism
//!
//! Nothing here reads a global generator. Operations that need randomness take a
//! [`RandomSource`], and a run started from a [`SimSeed`] is reproducible.

pub use self::{core::*, sim::*};

pub mod core;
pub mod sim;
