use chrono::{DateTime, Utc};
use hurdle_engine::{SimSeed, Weights};
use hurdle_training::{genetic::Evolver, session::GenerationSummary};
use serde::Serialize;

use crate::pace::PaceKind;

/// Why a training run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// Every requested generation ran to extinction.
    Completed,
    /// A generation was still alive after the tick limit.
    TickLimit { generation: u32, ticks: u32 },
}

/// Result of `hurdle train`.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Replaying with this seed and the same arguments reproduces the run.
    pub seed: SimSeed,
    pub trained_at: DateTime<Utc>,
    pub pace: PaceKind,
    pub evolver: Evolver,
    pub stop: StopReason,
    pub generations: Vec<GenerationSummary>,
    /// Champion of the generation with the highest score; the earliest one on ties.
    pub champion: Option<Weights>,
}

impl TrainingReport {
    pub fn best_generation(generations: &[GenerationSummary]) -> Option<&GenerationSummary> {
        generations.iter().fold(None, |best, summary| match best {
            Some(best) if best.fitness.max >= summary.fitness.max => Some(best),
            _ => Some(summary),
        })
    }
}

/// One agent's result in `hurdle simulate`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResult {
    pub weights: Weights,
    pub fitness: u32,
}

/// Result of `hurdle simulate`.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub seed: SimSeed,
    pub ticks: u32,
    pub agents: Vec<AgentResult>,
    /// Index of the fittest agent; the earliest one on ties.
    pub best: usize,
}

#[cfg(test)]
mod tests {
    use hurdle_training::stats::FitnessStats;

    use super::*;

    fn summary(generation: u32, scores: &[u32]) -> GenerationSummary {
        GenerationSummary {
            generation,
            ticks: scores.iter().copied().max().unwrap_or(0),
            scores: scores.to_vec(),
            fitness: FitnessStats::new(scores.iter().copied()).unwrap(),
            champion: Weights::ZERO,
        }
    }

    #[test]
    fn test_best_generation_prefers_earliest() {
        let generations = [
            summary(1, &[3, 5]),
            summary(2, &[9, 1]),
            summary(3, &[9, 9]),
        ];
        let best = TrainingReport::best_generation(&generations).unwrap();
        assert_eq!(best.generation, 2);
        assert!(TrainingReport::best_generation(&[]).is_none());
    }

    #[test]
    fn test_stop_reason_json() {
        let json = serde_json::to_value(StopReason::TickLimit {
            generation: 3,
            ticks: 100,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "reason": "tick_limit", "generation": 3, "ticks": 100 })
        );
        let json = serde_json::to_value(StopReason::Completed).unwrap();
        assert_eq!(json, serde_json::json!({ "reason": "completed" }));
    }
}
