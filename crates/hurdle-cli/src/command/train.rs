use std::path::PathBuf;

use chrono::Utc;
use hurdle_engine::SimSeed;
use hurdle_training::{
    genetic::{DEFAULT_ELITE_COUNT, DEFAULT_MUTATION_AMPLITUDE, DEFAULT_MUTATION_RATE, Evolver},
    session::{StepOutcome, TrainingSession},
};

use crate::{
    command::ensure_positive,
    model::report::{StopReason, TrainingReport},
    pace::{Countdown, Pace, PaceKind},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Seed for every random draw of the run, in hex (random if omitted)
    #[arg(long)]
    seed: Option<SimSeed>,
    /// Number of generations to run
    #[arg(long, default_value_t = 20)]
    generations: u32,
    /// Ticks after which a generation that is still alive ends the run
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u32,
    /// Simulated ticks per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Length of a round's countdown, in seconds
    #[arg(long, default_value_t = 60.0)]
    round_seconds: f64,
    /// Whether the obstacle speeds up with the distance run
    #[arg(long, default_value = "accelerating")]
    pace: PaceKind,
    /// Number of top agents used as parents
    #[arg(long, default_value_t = DEFAULT_ELITE_COUNT)]
    elite_count: usize,
    /// Probability of perturbing each weight of a child
    #[arg(long, default_value_t = DEFAULT_MUTATION_RATE)]
    mutation_rate: f64,
    /// Largest absolute perturbation of a mutation
    #[arg(long, default_value_t = DEFAULT_MUTATION_AMPLITUDE)]
    mutation_amplitude: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let report = train(arg)?;
    util::save_json(&report, arg.output.as_deref())?;

    eprintln!();
    eprintln!("Training finished");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Seed: {}", report.seed);
    eprintln!("  Generations: {}", report.generations.len());
    if let Some(champion) = &report.champion {
        eprintln!("  Champion: {champion:.3}");
    }

    Ok(())
}

/// Runs generations until `arg.generations` have finished or one outlives the tick limit.
fn train(arg: &TrainArg) -> anyhow::Result<TrainingReport> {
    let TrainArg {
        seed,
        generations,
        max_ticks,
        fps,
        round_seconds,
        pace,
        elite_count,
        mutation_rate,
        mutation_amplitude,
        output: _,
    } = arg;
    anyhow::ensure!(*generations > 0, "--generations must be positive");
    anyhow::ensure!(*max_ticks > 0, "--max-ticks must be positive");
    ensure_positive("fps", *fps)?;
    ensure_positive("round-seconds", *round_seconds)?;

    let seed = seed.unwrap_or_else(SimSeed::random);
    let evolver = Evolver {
        elite_count: *elite_count,
        mutation_rate: *mutation_rate,
        mutation_amplitude: *mutation_amplitude,
    };
    let mut session = TrainingSession::new(evolver, seed.rng())?;
    tracing::info!(%seed, generations, %pace, "training started");

    let dt = fps.recip();
    let mut speed = Pace::new(*pace);
    let mut countdown = Countdown::new(*round_seconds);
    let mut stop = StopReason::Completed;
    while session.generation() <= *generations {
        match session.step(speed.multiplier(), countdown.remaining()) {
            StepOutcome::Running { alive } => {
                speed.advance(dt);
                countdown.tick(dt);
                let ticks = session.population().ticks();
                if ticks >= *max_ticks {
                    tracing::warn!(
                        generation = session.generation(),
                        ticks,
                        alive,
                        "tick limit reached"
                    );
                    stop = StopReason::TickLimit {
                        generation: session.generation(),
                        ticks,
                    };
                    break;
                }
            }
            StepOutcome::Evolved(summary) => {
                tracing::info!(
                    generation = summary.generation,
                    ticks = summary.ticks,
                    best = summary.fitness.max,
                    mean = summary.fitness.mean,
                    champion = %summary.champion,
                    "generation finished"
                );
                speed.reset();
                countdown.reset();
            }
        }
    }

    let generations = session.history().to_vec();
    let champion = TrainingReport::best_generation(&generations).map(|best| best.champion);
    Ok(TrainingReport {
        seed,
        trained_at: Utc::now(),
        pace: *pace,
        evolver: session.evolver().clone(),
        stop,
        generations,
        champion,
    })
}
