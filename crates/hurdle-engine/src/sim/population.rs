use crate::core::RandomSource;

use super::{
    agent::{Agent, AgentSnapshot, Observation, Weights},
    obstacle::{Obstacle, ObstacleSource, PLAYFIELD_WIDTH},
};

/// Number of agents in every generation.
pub const POPULATION_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PopulationState {
    /// At least one agent is alive.
    Active,
    /// Every agent is dead; the population should be replaced by its next generation.
    Exhausted,
}

/// One generation of agents running against a shared obstacle source.
///
/// The population is passive: [`tick`](Self::tick) advances it by one step, and the caller
/// polls [`state`](Self::state) to find out when every agent has died and a new generation
/// should be bred. The agent array has a fixed length, so the size never changes within a
/// generation.
///
/// # Example
///
/// ```
/// use hurdle_engine::{Population, PopulationState, SimSeed};
///
/// let mut rng = SimSeed::from_u64(42).rng();
/// let mut population = Population::random(&mut rng);
/// assert_eq!(population.generation(), 1);
///
/// while population.state() == PopulationState::Active {
///     population.tick(1.0, 60.0, &mut rng);
/// }
/// assert_eq!(population.alive_count(), 0);
/// assert!(population.best_fitness() > 0);
/// # assert!(population.ticks() < 100_000);
/// ```
#[derive(Debug, Clone)]
pub struct Population {
    generation: u32,
    agents: [Agent; POPULATION_SIZE],
    obstacles: ObstacleSource,
    ticks: u32,
}

impl Population {
    /// Creates the first generation, drawing every agent's weights from `[0, 1)`.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let agents = std::array::from_fn(|_| Agent::spawn(None, rng));
        Self::from_agents(1, agents)
    }

    /// Creates a population of fresh agents carrying `weights`, in order.
    #[must_use]
    pub fn from_weights(generation: u32, weights: [Weights; POPULATION_SIZE]) -> Self {
        Self::from_agents(generation, weights.map(Agent::new))
    }

    fn from_agents(generation: u32, agents: [Agent; POPULATION_SIZE]) -> Self {
        Self {
            generation,
            agents,
            obstacles: ObstacleSource::new(),
            ticks: 0,
        }
    }

    /// Replaces the obstacle source, e.g. to place the first obstacle elsewhere.
    #[must_use]
    pub fn with_obstacles(mut self, obstacles: ObstacleSource) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Generation index, starting at 1.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn obstacle(&self) -> &Obstacle {
        self.obstacles.obstacle()
    }

    #[must_use]
    pub fn obstacles(&self) -> &ObstacleSource {
        &self.obstacles
    }

    /// Number of ticks run so far, saturating at `u32::MAX`.
    #[must_use]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Advances the population by one step.
    ///
    /// 1. Moves the obstacle and recycles it if it left the playfield
    /// 2. Updates every agent with its distance to the obstacle, the obstacle's speed
    ///    under `speed_multiplier`, and `time_remaining`
    /// 3. Kills every living agent that overlaps the obstacle
    ///
    /// `rng` is only drawn from when the obstacle respawns. Returns the number of agents
    /// that died during this tick.
    pub fn tick<R>(&mut self, speed_multiplier: f64, time_remaining: f64, rng: &mut R) -> usize
    where
        R: RandomSource + ?Sized,
    {
        self.ticks = self.ticks.saturating_add(1);
        self.obstacles.advance(speed_multiplier);
        self.obstacles.recycle_if_offscreen(PLAYFIELD_WIDTH, rng);

        let obstacle = *self.obstacles.obstacle();
        let obstacle_speed = obstacle.effective_speed(speed_multiplier);
        for agent in &mut self.agents {
            agent.update(&Observation {
                distance: obstacle.x - agent.x(),
                obstacle_speed,
                time_remaining,
            });
        }

        let obstacle_rect = obstacle.rect();
        let mut deaths = 0;
        for agent in self.agents.iter_mut().filter(|a| a.is_alive()) {
            if agent.rect().overlaps(&obstacle_rect) && agent.kill() {
                deaths += 1;
            }
        }
        deaths
    }

    /// Kills the agent at `index` as if it had hit the obstacle.
    ///
    /// Returns `true` if the agent was alive.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`POPULATION_SIZE`].
    pub fn kill(&mut self, index: usize) -> bool {
        self.agents[index].kill()
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// Highest fitness in the population, dead agents included.
    #[must_use]
    pub fn best_fitness(&self) -> u32 {
        self.best_agent().fitness()
    }

    /// The agent with the highest fitness; the earliest one wins ties.
    #[must_use]
    pub fn best_agent(&self) -> &Agent {
        let (first, rest) = self
            .agents
            .split_first()
            .expect("population is never empty");
        rest.iter().fold(first, |best, agent| {
            if agent.fitness() > best.fitness() {
                agent
            } else {
                best
            }
        })
    }

    #[must_use]
    pub fn state(&self) -> PopulationState {
        if self.alive_count() == 0 {
            PopulationState::Exhausted
        } else {
            PopulationState::Active
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state().is_exhausted()
    }

    /// Read-only views of every agent, in population order.
    pub fn snapshots(&self) -> impl Iterator<Item = AgentSnapshot> + '_ {
        self.agents.iter().map(Agent::snapshot)
    }
}
