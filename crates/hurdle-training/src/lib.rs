//! Evolution of jumping agents across generations.
//!
//! This crate breeds the weights that `hurdle-engine` agents decide with. It runs a minimal
//! elitist evolution strategy: when a generation has died out, the fittest agents become
//! parents, and every child is the average of two parents with occasional random
//! perturbations.
//!
//! # How Training Works
//!
//! 1. **Population** - The first generation draws every weight uniformly from `[0, 1)`
//! 2. **Simulation** - Agents run until each has hit an obstacle; fitness is ticks survived
//! 3. **Selection** - The top agents by frozen fitness become parents
//! 4. **Reproduction** - Averaging crossover and mutation fill a fresh generation
//! 5. **Repeat** - The new generation starts over against a new obstacle
//!
//! # Architecture
//!
//! ```text
//! TrainingSession
//!     ↓ ticks
//! Population (hurdle-engine)
//!     ↓ exhausted
//! GenerationSummary (stats)
//!     ↓ then
//! Evolver (genetic) → crossover / mutate (weights)
//!     ↓ produces
//! next Population
//! ```
//!
//! # Modules
//!
//! - [`genetic`] - Elite selection, breeding and the [`Evolver`](genetic::Evolver)
//! - [`weights`] - Crossover and mutation operators
//! - [`session`] - [`TrainingSession`](session::TrainingSession), which polls for extinction
//!   and swaps in the next generation
//! - [`stats`] - Per-generation fitness statistics
//!
//! # Current Limitations
//!
//! - **Fixed policy shape**: Three weights, no hidden layer, no bias term
//! - **No elitism carry-over**: The best agents are parents only; none survive unchanged
//! - **No persistence**: Bred weights live only as long as the process

pub mod genetic;
pub mod session;
pub mod stats;
pub mod weights;
