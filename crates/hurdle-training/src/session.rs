use hurdle_engine::{Population, RandomSource, SimRng, Weights};
use serde::Serialize;

use crate::{
    genetic::{Evolver, EvolverParamsError},
    stats::FitnessStats,
};

/// Final record of one generation, taken when its last agent died.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    /// Generation index, starting at 1.
    pub generation: u32,
    /// Ticks the generation lasted.
    pub ticks: u32,
    /// Every agent's fitness, in population order.
    pub scores: Vec<u32>,
    pub fitness: FitnessStats,
    /// Weights of the fittest agent (earliest on ties).
    pub champion: Weights,
}

impl GenerationSummary {
    /// Summarizes `population` as it stands.
    #[must_use]
    pub fn of(population: &Population) -> Self {
        let scores = population
            .agents()
            .iter()
            .map(|agent| agent.fitness())
            .collect::<Vec<_>>();
        let fitness =
            FitnessStats::new(scores.iter().copied()).expect("population is never empty");
        Self {
            generation: population.generation(),
            ticks: population.ticks(),
            scores,
            fitness,
            champion: *population.best_agent().weights(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// The current generation still has living agents.
    Running { alive: usize },
    /// The current generation died out during this step and was replaced.
    Evolved(GenerationSummary),
}

/// Drives a population across generations.
///
/// The session owns the current population, the evolver and the one random source every
/// draw of the run comes from. Each [`step`](Self::step) ticks the population; when the
/// tick leaves no agent alive, the session records a [`GenerationSummary`] and breeds the
/// next generation in the same step.
///
/// # Example
///
/// ```
/// use hurdle_engine::SimSeed;
/// use hurdle_training::{genetic::Evolver, session::TrainingSession};
///
/// let mut session = TrainingSession::new(Evolver::default(), SimSeed::from_u64(5).rng())?;
/// while session.generation() < 4 {
///     session.step(1.0, 60.0);
/// }
/// assert_eq!(session.history().len(), 3);
/// assert_eq!(session.history()[2].generation, 3);
/// # Ok::<(), hurdle_training::genetic::EvolverParamsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TrainingSession<R = SimRng> {
    population: Population,
    evolver: Evolver,
    rng: R,
    history: Vec<GenerationSummary>,
}

impl<R> TrainingSession<R>
where
    R: RandomSource,
{
    /// Starts a session from a first generation with random weights drawn from `rng`.
    pub fn new(evolver: Evolver, mut rng: R) -> Result<Self, EvolverParamsError> {
        let population = Population::random(&mut rng);
        Self::with_population(population, evolver, rng)
    }

    /// Starts a session from an existing population.
    pub fn with_population(
        population: Population,
        evolver: Evolver,
        rng: R,
    ) -> Result<Self, EvolverParamsError> {
        evolver.validate()?;
        Ok(Self {
            population,
            evolver,
            rng,
            history: Vec::new(),
        })
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn evolver(&self) -> &Evolver {
        &self.evolver
    }

    /// Index of the generation currently running.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.population.generation()
    }

    /// Summaries of every finished generation, oldest first.
    #[must_use]
    pub fn history(&self) -> &[GenerationSummary] {
        &self.history
    }

    /// Advances the current generation by one tick, replacing it if it died out.
    pub fn step(&mut self, speed_multiplier: f64, time_remaining: f64) -> StepOutcome {
        self.population
            .tick(speed_multiplier, time_remaining, &mut self.rng);
        if self.population.state().is_active() {
            return StepOutcome::Running {
                alive: self.population.alive_count(),
            };
        }

        let summary = GenerationSummary::of(&self.population);
        self.population = self.evolver.evolve(&self.population, &mut self.rng);
        self.history.push(summary.clone());
        StepOutcome::Evolved(summary)
    }
}

#[cfg(test)]
mod tests {
    use hurdle_engine::{ObstacleSource, POPULATION_SIZE, SimSeed};

    use super::*;

    fn run_generations(seed: u64, generations: u32) -> Vec<GenerationSummary> {
        let mut session = TrainingSession::new(Evolver::default(), SimSeed::from_u64(seed).rng())
            .expect("default evolver is valid");
        while session.generation() <= generations {
            session.step(1.0, 30.0);
        }
        session.history().to_vec()
    }

    #[test]
    fn test_same_seed_same_history() {
        assert_eq!(run_generations(21, 6), run_generations(21, 6));
    }

    #[test]
    fn test_generation_index_increments() {
        let history = run_generations(3, 5);
        let generations = history.iter().map(|s| s.generation).collect::<Vec<_>>();
        assert_eq!(generations, [1, 2, 3, 4, 5]);
        for summary in &history {
            assert_eq!(summary.scores.len(), POPULATION_SIZE);
            assert_eq!(summary.fitness.max, *summary.scores.iter().max().unwrap());
            assert!(summary.ticks >= summary.fitness.max);
        }
    }

    #[test]
    fn test_step_reports_running_then_evolved() {
        let weights = [Weights::ZERO; POPULATION_SIZE];
        let population = Population::from_weights(1, weights)
            .with_obstacles(ObstacleSource::starting_at(200.0));
        let rng = SimSeed::from_u64(1).rng();
        let mut session =
            TrainingSession::with_population(population, Evolver::default(), rng).unwrap();

        assert_eq!(session.step(1.0, 0.0), StepOutcome::Running { alive: 5 });
        let StepOutcome::Evolved(summary) = session.step(1.0, 0.0) else {
            panic!("zero-weight agents should die on the second tick");
        };
        assert_eq!(summary.generation, 1);
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.scores, [2; POPULATION_SIZE]);
        assert_eq!(summary.champion, Weights::ZERO);

        assert_eq!(session.generation(), 2);
        assert_eq!(session.population().alive_count(), POPULATION_SIZE);
        assert_eq!(session.population().obstacle().x, 900.0);
        assert_eq!(session.history(), [summary]);
    }

    #[test]
    fn test_summary_json_shape() {
        let weights = Weights::new([1.0, 0.0, 0.5]);
        let population = Population::from_weights(1, [weights; POPULATION_SIZE]);
        let json = serde_json::to_value(GenerationSummary::of(&population)).unwrap();
        assert_eq!(json["generation"], 1);
        assert_eq!(json["scores"], serde_json::json!([0, 0, 0, 0, 0]));
        assert_eq!(json["champion"], serde_json::json!([1.0, 0.0, 0.5]));
        assert_eq!(json["fitness"]["max"], 0);
    }

    #[test]
    fn test_invalid_evolver_is_rejected() {
        let evolver = Evolver {
            elite_count: POPULATION_SIZE + 1,
            ..Evolver::default()
        };
        assert!(TrainingSession::new(evolver, SimSeed::from_u64(1).rng()).is_err());
    }
}
