use std::{fmt, num::ParseFloatError, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::{RandomSource, Rect};

/// Left edge of every agent; agents never move horizontally.
pub const AGENT_X: f64 = 100.0;
pub const AGENT_WIDTH: f64 = 90.0;
pub const AGENT_HEIGHT: f64 = 90.0;
/// Top edge of a grounded agent.
pub const GROUND_Y: f64 = 270.0;
/// Added to the vertical velocity on every tick.
pub const GRAVITY: f64 = 0.8;
/// Vertical velocity set by a jump (negative is upward).
pub const JUMP_VELOCITY: f64 = -16.0;
/// A decision strictly above this value triggers a jump.
pub const JUMP_THRESHOLD: f64 = 0.5;
/// Number of decision inputs, and therefore of weights.
pub const WEIGHT_COUNT: usize = 3;

/// Logistic function `1 / (1 + e^-z)`.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// The heritable decision policy of an agent.
///
/// One coefficient per decision input, in the order distance, obstacle speed, time
/// remaining. Weights are plain values: evolution builds new ones and never edits an
/// agent's weights in place.
///
/// Weights parse from and print as comma-separated numbers:
///
/// ```
/// use hurdle_engine::Weights;
///
/// let weights: Weights = "1, 0.5, -2".parse().unwrap();
/// assert_eq!(weights, Weights::new([1.0, 0.5, -2.0]));
/// assert_eq!(weights.to_string(), "1,0.5,-2");
/// assert!("1,2".parse::<Weights>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights([f64; WEIGHT_COUNT]);

impl Weights {
    pub const ZERO: Self = Self([0.0; WEIGHT_COUNT]);

    #[must_use]
    pub const fn new(values: [f64; WEIGHT_COUNT]) -> Self {
        Self(values)
    }

    /// Builds weights by evaluating `f` for each component index, in order.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(usize) -> f64,
    {
        Self(std::array::from_fn(f))
    }

    /// Draws each component independently from `[0, 1)`, in component order.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        Self::from_fn(|_| rng.next_unit())
    }

    #[must_use]
    pub const fn values(&self) -> [f64; WEIGHT_COUNT] {
        self.0
    }

    /// Weighted sum of `inputs`.
    #[must_use]
    pub fn dot(&self, inputs: [f64; WEIGHT_COUNT]) -> f64 {
        std::iter::zip(self.0, inputs).map(|(w, x)| w * x).sum()
    }
}

impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match f.precision() {
                Some(precision) => write!(f, "{w:.precision$}")?,
                None => write!(f, "{w}")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseWeightsError {
    #[display("expected three comma-separated weights, got {found}")]
    Count { found: usize },
    #[display("invalid weight {text:?}")]
    Number {
        text: String,
        source: ParseFloatError,
    },
    #[display("weight {text:?} is not finite")]
    NonFinite { text: String },
}

impl FromStr for Weights {
    type Err = ParseWeightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(',').map(str::trim).collect::<Vec<_>>();
        if parts.len() != WEIGHT_COUNT {
            return Err(ParseWeightsError::Count { found: parts.len() });
        }
        let mut values = [0.0_f64; WEIGHT_COUNT];
        for (value, text) in std::iter::zip(&mut values, parts) {
            *value = text.parse().map_err(|source| ParseWeightsError::Number {
                text: text.to_owned(),
                source,
            })?;
            if !value.is_finite() {
                return Err(ParseWeightsError::NonFinite {
                    text: text.to_owned(),
                });
            }
        }
        Ok(Self(values))
    }
}

/// Inputs an agent bases its jump decision on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Obstacle x minus agent x.
    pub distance: f64,
    /// Distance the obstacle covers this tick.
    pub obstacle_speed: f64,
    /// Countdown supplied by the caller.
    pub time_remaining: f64,
}

impl Observation {
    #[must_use]
    pub const fn inputs(&self) -> [f64; WEIGHT_COUNT] {
        [self.distance, self.obstacle_speed, self.time_remaining]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum Life {
    Alive,
    Dead,
}

/// One simulated runner with its own physics state and decision policy.
///
/// An agent is either [`Life::Alive`] or [`Life::Dead`]. While alive, every
/// [`update`](Self::update) decides, moves and adds one to the fitness score. The only way
/// out of `Alive` is [`kill`](Self::kill); afterwards the agent is frozen and `update` does
/// nothing.
///
/// # Example
///
/// ```
/// use hurdle_engine::{Agent, Observation, Weights};
///
/// let mut agent = Agent::new(Weights::new([1.0, 1.0, 1.0]));
/// let observation = Observation {
///     distance: 200.0,
///     obstacle_speed: 6.0,
///     time_remaining: 60.0,
/// };
///
/// agent.update(&observation);
/// assert!(!agent.is_grounded());
/// assert_eq!(agent.fitness(), 1);
///
/// agent.kill();
/// agent.update(&observation);
/// assert_eq!(agent.fitness(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Agent {
    x: f64,
    y: f64,
    velocity_y: f64,
    grounded: bool,
    life: Life,
    weights: Weights,
    fitness: u32,
}

impl Agent {
    /// Creates a grounded, living agent at the spawn point carrying `weights`.
    #[must_use]
    pub const fn new(weights: Weights) -> Self {
        Self {
            x: AGENT_X,
            y: GROUND_Y,
            velocity_y: 0.0,
            grounded: true,
            life: Life::Alive,
            weights,
            fitness: 0,
        }
    }

    /// Creates an agent with the given weights, or with freshly drawn ones when `weights`
    /// is `None`.
    ///
    /// `rng` is only drawn from in the `None` case.
    pub fn spawn<R>(weights: Option<Weights>, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        Self::new(weights.unwrap_or_else(|| Weights::random(rng)))
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn velocity_y(&self) -> f64 {
        self.velocity_y
    }

    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    #[must_use]
    pub fn life(&self) -> Life {
        self.life
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life.is_alive()
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Number of ticks this agent has lived, including the tick it died on.
    #[must_use]
    pub fn fitness(&self) -> u32 {
        self.fitness
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, AGENT_WIDTH, AGENT_HEIGHT)
    }

    /// Evaluates the policy: `sigmoid(weights · inputs)`, a value in `(0, 1)`.
    #[must_use]
    pub fn decide(&self, observation: &Observation) -> f64 {
        sigmoid(self.weights.dot(observation.inputs()))
    }

    /// Advances a living agent by one tick.
    ///
    /// 1. Jumps if the decision exceeds [`JUMP_THRESHOLD`] and the agent is grounded
    /// 2. Applies gravity and lands on the ground line
    /// 3. Adds one to the fitness score
    ///
    /// Collisions are not checked here; the owning population does that after the update,
    /// so the tick an agent dies on still counts toward its fitness.
    pub fn update(&mut self, observation: &Observation) {
        match self.life {
            Life::Dead => {}
            Life::Alive => {
                if self.decide(observation) > JUMP_THRESHOLD {
                    self.jump();
                }
                self.apply_physics();
                self.fitness = self.fitness.saturating_add(1);
            }
        }
    }

    fn jump(&mut self) {
        if self.grounded {
            self.velocity_y = JUMP_VELOCITY;
            self.grounded = false;
        }
    }

    fn apply_physics(&mut self) {
        self.velocity_y += GRAVITY;
        self.y += self.velocity_y;
        if self.y >= GROUND_Y {
            self.y = GROUND_Y;
            self.velocity_y = 0.0;
            self.grounded = true;
        }
    }

    /// Moves the agent to [`Life::Dead`], freezing its position and fitness.
    ///
    /// Returns `true` if the agent was alive.
    pub fn kill(&mut self) -> bool {
        match self.life {
            Life::Dead => false,
            Life::Alive => {
                self.life = Life::Dead;
                tracing::trace!(fitness = self.fitness, "agent died");
                true
            }
        }
    }

    /// Read-only view for renderers.
    #[must_use]
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            x: self.x,
            y: self.y,
            width: AGENT_WIDTH,
            height: AGENT_HEIGHT,
            alive: self.is_alive(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub alive: bool,
}
