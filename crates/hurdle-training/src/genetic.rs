//! Elitist evolution of agent weights.
//!
//! A generation ends when every agent in the population has died. Its fitness scores are
//! frozen at that point, and [`Evolver::evolve`] turns them into the next generation:
//!
//! 1. **Elite Selection** - Rank all agents by fitness (stable, so earlier agents win ties)
//!    and keep the top [`Evolver::elite_count`]
//! 2. **Parent Picking** - For each child, pick two elites uniformly at random with
//!    replacement (an elite may be paired with itself)
//! 3. **Crossover** - Average the two parents' weights component by component
//! 4. **Mutation** - Perturb each averaged component with probability
//!    [`Evolver::mutation_rate`] by a uniform value in `[-amplitude, amplitude)`
//!
//! The children become fresh agents at the spawn point in a population whose generation
//! index is one higher, with a new obstacle source. Elites are not copied over unchanged;
//! every member of the new generation is bred.
//!
//! # Example
//!
//! ```
//! use hurdle_engine::{Population, SimSeed};
//! use hurdle_training::genetic::Evolver;
//!
//! let mut rng = SimSeed::from_u64(1).rng();
//! let mut population = Population::random(&mut rng);
//! while !population.is_exhausted() {
//!     population.tick(1.0, 60.0, &mut rng);
//! }
//!
//! let evolver = Evolver::default();
//! let next = evolver.evolve(&population, &mut rng);
//! assert_eq!(next.generation(), 2);
//! assert_eq!(next.alive_count(), 5);
//! ```

use std::cmp::Reverse;

use hurdle_engine::{Agent, POPULATION_SIZE, Population, RandomSource, Weights};
use serde::Serialize;

use crate::weights;

pub const DEFAULT_ELITE_COUNT: usize = 2;
pub const DEFAULT_MUTATION_RATE: f64 = 0.2;
pub const DEFAULT_MUTATION_AMPLITUDE: f64 = 0.25;

/// Returns the `count` fittest agents, best first.
///
/// Dead agents take part with their frozen scores. Agents with equal fitness keep their
/// population order. Returns every agent if `count` exceeds the population size.
#[must_use]
pub fn select_elites(population: &Population, count: usize) -> Vec<&Agent> {
    let mut ranked = population.agents().iter().collect::<Vec<_>>();
    ranked.sort_by_key(|agent| Reverse(agent.fitness()));
    ranked.truncate(count);
    ranked
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvolverParamsError {
    #[display("elite count must be between 1 and {max}, got {elite_count}")]
    EliteCount { elite_count: usize, max: usize },
    #[display("mutation rate must lie in [0, 1], got {mutation_rate}")]
    MutationRate { mutation_rate: f64 },
    #[display("mutation amplitude must be finite and non-negative, got {amplitude}")]
    MutationAmplitude { amplitude: f64 },
}

/// Controls how one generation is bred from the previous one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evolver {
    /// Number of top agents used as parents
    pub elite_count: usize,
    /// Probability of perturbing each weight component of a child
    pub mutation_rate: f64,
    /// Largest absolute perturbation applied by a mutation
    pub mutation_amplitude: f64,
}

impl Default for Evolver {
    fn default() -> Self {
        Self {
            elite_count: DEFAULT_ELITE_COUNT,
            mutation_rate: DEFAULT_MUTATION_RATE,
            mutation_amplitude: DEFAULT_MUTATION_AMPLITUDE,
        }
    }
}

impl Evolver {
    /// Checks that the parameters describe a usable evolver.
    pub fn validate(&self) -> Result<(), EvolverParamsError> {
        if !(1..=POPULATION_SIZE).contains(&self.elite_count) {
            return Err(EvolverParamsError::EliteCount {
                elite_count: self.elite_count,
                max: POPULATION_SIZE,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvolverParamsError::MutationRate {
                mutation_rate: self.mutation_rate,
            });
        }
        if !(self.mutation_amplitude.is_finite() && self.mutation_amplitude >= 0.0) {
            return Err(EvolverParamsError::MutationAmplitude {
                amplitude: self.mutation_amplitude,
            });
        }
        Ok(())
    }

    /// Breeds one child from two parents picked at random from `parents`.
    ///
    /// Draws the first parent's index, the second parent's index, then the mutation draws
    /// for each component.
    ///
    /// # Panics
    ///
    /// Panics if `parents` is empty.
    pub fn breed_child<R>(&self, parents: &[Weights], rng: &mut R) -> Weights
    where
        R: RandomSource + ?Sized,
    {
        assert!(!parents.is_empty(), "cannot breed without parents");
        let a = &parents[rng.index(parents.len())];
        let b = &parents[rng.index(parents.len())];
        weights::crossover(a, b, self.mutation_rate, self.mutation_amplitude, rng)
    }

    /// Breeds `count` children from `parents`.
    ///
    /// # Panics
    ///
    /// Panics if `parents` is empty.
    pub fn breed<R>(&self, parents: &[Weights], count: usize, rng: &mut R) -> Vec<Weights>
    where
        R: RandomSource + ?Sized,
    {
        (0..count).map(|_| self.breed_child(parents, rng)).collect()
    }

    /// Breeds the generation that follows `population`.
    ///
    /// The result always holds [`POPULATION_SIZE`] fresh agents, however many of the old
    /// agents were still alive.
    ///
    /// # Panics
    ///
    /// Panics if `elite_count` is zero. Use [`Self::validate`] to check parameters up front.
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: RandomSource + ?Sized,
    {
        let parents = select_elites(population, self.elite_count)
            .into_iter()
            .map(|agent| *agent.weights())
            .collect::<Vec<_>>();
        let children = std::array::from_fn(|_| self.breed_child(&parents, rng));
        let next = Population::from_weights(population.generation() + 1, children);
        tracing::debug!(
            generation = next.generation(),
            best_fitness = population.best_fitness(),
            "bred next generation"
        );
        next
    }
}
