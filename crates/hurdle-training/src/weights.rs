//! Crossover and mutation of weight vectors.
//!
//! These are the genetic operators used by [`Evolver`](crate::genetic::Evolver):
//!
//! - [`average`] - Component-wise arithmetic mean of two parents
//! - [`mutate`] - Independent, probabilistic uniform perturbation of each component
//! - [`crossover`] - Average, then mutate
//!
//! All randomness comes from the [`RandomSource`] passed in. For each component, in order,
//! [`mutate`] draws one value to decide whether to perturb it and, only when it does, a
//! second value for the perturbation itself.

use hurdle_engine::{RandomSource, Weights};

/// Component-wise mean of two weight vectors.
///
/// ```
/// use hurdle_engine::Weights;
/// use hurdle_training::weights;
///
/// let a = Weights::new([1.0, 0.0, 0.5]);
/// let b = Weights::new([0.0, 1.0, 0.5]);
/// assert_eq!(weights::average(&a, &b), Weights::new([0.5, 0.5, 0.5]));
/// ```
#[must_use]
pub fn average(a: &Weights, b: &Weights) -> Weights {
    let (a, b) = (a.values(), b.values());
    Weights::from_fn(|i| (a[i] + b[i]) / 2.0)
}

/// Perturbs each component with probability `rate` by a value drawn from
/// `[-amplitude, amplitude)`.
pub fn mutate<R>(weights: &Weights, rate: f64, amplitude: f64, rng: &mut R) -> Weights
where
    R: RandomSource + ?Sized,
{
    let values = weights.values();
    Weights::from_fn(|i| {
        if rng.chance(rate) {
            values[i] + (rng.next_unit() - 0.5) * (2.0 * amplitude)
        } else {
            values[i]
        }
    })
}

/// Builds a child from two parents: their [`average`], then [`mutate`]d.
pub fn crossover<R>(a: &Weights, b: &Weights, rate: f64, amplitude: f64, rng: &mut R) -> Weights
where
    R: RandomSource + ?Sized,
{
    mutate(&average(a, b), rate, amplitude, rng)
}
