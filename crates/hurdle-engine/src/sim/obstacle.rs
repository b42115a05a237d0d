use serde::Serialize;

use crate::core::{RandomSource, Rect};

/// Width of the visible playfield; fresh obstacles enter at or past this x.
pub const PLAYFIELD_WIDTH: f64 = 900.0;
pub const OBSTACLE_WIDTH: f64 = 60.0;
pub const OBSTACLE_HEIGHT: f64 = 60.0;
/// Top edge of every obstacle (obstacles sit on the ground).
pub const OBSTACLE_Y: f64 = 270.0;
/// Horizontal distance an obstacle covers per tick at a speed multiplier of 1.
pub const OBSTACLE_SPEED: f64 = 6.0;
/// Upper bound (exclusive) of the random extra offset given to a respawned obstacle.
pub const RESPAWN_JITTER: f64 = 200.0;

/// A single obstacle scrolling from right to left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Obstacle {
    /// Creates an obstacle with default size and speed whose left edge is at `x`.
    #[must_use]
    pub const fn at(x: f64) -> Self {
        Self {
            x,
            y: OBSTACLE_Y,
            width: OBSTACLE_WIDTH,
            height: OBSTACLE_HEIGHT,
            speed: OBSTACLE_SPEED,
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Returns `true` once the obstacle has fully left the playfield on the left.
    #[must_use]
    pub fn is_offscreen(&self) -> bool {
        self.x + self.width < 0.0
    }

    /// Distance covered per tick under the given speed multiplier.
    #[must_use]
    pub fn effective_speed(&self, speed_multiplier: f64) -> f64 {
        self.speed * speed_multiplier
    }
}

/// Owner of the one active obstacle a population runs against.
///
/// The source keeps no history: once the obstacle scrolls off the left edge it is replaced
/// in place by a new one entering at a random offset past the right edge. That offset is
/// the only thing that varies from one obstacle to the next.
///
/// # Example
///
/// ```
/// use hurdle_engine::{ObstacleSource, PLAYFIELD_WIDTH, SimSeed};
///
/// let mut rng = SimSeed::from_u64(1).rng();
/// let mut source = ObstacleSource::starting_at(10.0);
///
/// source.advance(2.0);
/// assert_eq!(source.obstacle().x, -2.0);
///
/// source.advance(10.0);
/// assert!(source.recycle_if_offscreen(PLAYFIELD_WIDTH, &mut rng));
/// assert!(source.obstacle().x >= PLAYFIELD_WIDTH);
/// ```
#[derive(Debug, Clone)]
pub struct ObstacleSource {
    active: Obstacle,
    respawns: u32,
}

impl Default for ObstacleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleSource {
    /// Creates a source whose first obstacle sits at the right edge of the playfield.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(PLAYFIELD_WIDTH)
    }

    /// Like [`Self::new`], but with the first obstacle placed at `x`.
    #[must_use]
    pub const fn starting_at(x: f64) -> Self {
        Self {
            active: Obstacle::at(x),
            respawns: 0,
        }
    }

    /// Returns the active obstacle.
    #[must_use]
    pub fn obstacle(&self) -> &Obstacle {
        &self.active
    }

    /// Number of times the obstacle has been replaced.
    #[must_use]
    pub fn respawns(&self) -> u32 {
        self.respawns
    }

    /// Moves the obstacle left by `speed * speed_multiplier`.
    pub fn advance(&mut self, speed_multiplier: f64) {
        self.active.x -= self.active.effective_speed(speed_multiplier);
    }

    /// Replaces the obstacle if it has left the playfield.
    ///
    /// The replacement gets default size and speed and enters at
    /// `playfield_width + uniform(0, RESPAWN_JITTER)`. Draws one value from `rng` only
    /// when a replacement happens.
    ///
    /// Returns `true` if the obstacle was replaced.
    pub fn recycle_if_offscreen<R>(&mut self, playfield_width: f64, rng: &mut R) -> bool
    where
        R: RandomSource + ?Sized,
    {
        if !self.active.is_offscreen() {
            return false;
        }
        let x = playfield_width + rng.uniform(0.0, RESPAWN_JITTER);
        self.active = Obstacle::at(x);
        self.respawns += 1;
        tracing::debug!(x, respawns = self.respawns, "obstacle respawned");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ScriptedSource, SimSeed};

    #[test]
    fn test_advance_scales_with_multiplier() {
        let mut source = ObstacleSource::new();
        source.advance(1.0);
        assert_eq!(source.obstacle().x, 894.0);
        source.advance(1.5);
        assert_eq!(source.obstacle().x, 885.0);
    }

    #[test]
    fn test_no_recycle_while_partly_visible() {
        let mut rng = ScriptedSource::new([0.5]);
        let mut source = ObstacleSource::starting_at(-OBSTACLE_WIDTH);
        assert!(!source.recycle_if_offscreen(PLAYFIELD_WIDTH, &mut rng));
        assert_eq!(source.obstacle().x, -OBSTACLE_WIDTH);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_recycle_uses_one_draw() {
        let mut rng = ScriptedSource::new([0.5]);
        let mut source = ObstacleSource::starting_at(-61.0);
        assert!(source.recycle_if_offscreen(PLAYFIELD_WIDTH, &mut rng));
        assert_eq!(source.obstacle(), &Obstacle::at(1000.0));
        assert_eq!(source.respawns(), 1);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_recycle_resets_speed_and_size() {
        let mut rng = ScriptedSource::new([0.0]);
        let mut source = ObstacleSource::starting_at(-100.0);
        source.recycle_if_offscreen(500.0, &mut rng);
        let obstacle = source.obstacle();
        assert_eq!(obstacle.x, 500.0);
        assert_eq!(obstacle.speed, OBSTACLE_SPEED);
        assert_eq!(obstacle.width, OBSTACLE_WIDTH);
        assert_eq!(obstacle.height, OBSTACLE_HEIGHT);
        assert_eq!(obstacle.y, OBSTACLE_Y);
    }

    #[test]
    fn test_recycle_bound_holds_for_many_draws() {
        let mut rng = SimSeed::from_u64(3).rng();
        for _ in 0..500 {
            let mut source = ObstacleSource::starting_at(-80.0);
            assert!(source.recycle_if_offscreen(PLAYFIELD_WIDTH, &mut rng));
            let x = source.obstacle().x;
            assert!(PLAYFIELD_WIDTH <= x && x < PLAYFIELD_WIDTH + RESPAWN_JITTER);
        }
    }
}
