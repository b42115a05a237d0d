use std::path::PathBuf;

use hurdle_engine::{
    ObstacleSource, PLAYFIELD_WIDTH, POPULATION_SIZE, Population, SimSeed, Weights,
};

use crate::{
    command::ensure_positive,
    model::report::{AgentResult, SimulationReport},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Weights of one agent as `distance,speed,time`; give exactly five
    #[arg(long = "agent", required = true, allow_hyphen_values = true)]
    agents: Vec<Weights>,
    /// Starting position of the first obstacle
    #[arg(long, default_value_t = PLAYFIELD_WIDTH)]
    obstacle_x: f64,
    /// Seed for obstacle respawns, in hex (random if omitted)
    #[arg(long)]
    seed: Option<SimSeed>,
    /// Speed multiplier for the whole run
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
    /// Countdown value fed to every decision
    #[arg(long, default_value_t = 60.0)]
    time_remaining: f64,
    /// Ticks after which the run is abandoned
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u32,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let report = simulate(arg)?;
    util::save_json(&report, arg.output.as_deref())
}

/// Runs the population described by `arg` until every agent has died.
fn simulate(arg: &SimulateArg) -> anyhow::Result<SimulationReport> {
    let SimulateArg {
        agents,
        obstacle_x,
        seed,
        speed,
        time_remaining,
        max_ticks,
        output: _,
    } = arg;
    let weights = <[Weights; POPULATION_SIZE]>::try_from(agents.as_slice()).map_err(|_| {
        anyhow::anyhow!(
            "expected exactly {POPULATION_SIZE} --agent values, got {}",
            agents.len()
        )
    })?;
    anyhow::ensure!(
        obstacle_x.is_finite(),
        "--obstacle-x must be finite, got {obstacle_x}"
    );
    ensure_positive("speed", *speed)?;
    anyhow::ensure!(
        time_remaining.is_finite() && *time_remaining >= 0.0,
        "--time-remaining must be a non-negative finite number, got {time_remaining}"
    );

    let seed = seed.unwrap_or_else(SimSeed::random);
    let mut rng = seed.rng();
    let mut population = Population::from_weights(1, weights)
        .with_obstacles(ObstacleSource::starting_at(*obstacle_x));
    while population.state().is_active() {
        anyhow::ensure!(
            population.ticks() < *max_ticks,
            "{} agents still alive after {max_ticks} ticks",
            population.alive_count()
        );
        population.tick(*speed, *time_remaining, &mut rng);
    }
    tracing::info!(ticks = population.ticks(), "population exhausted");

    let best = population
        .agents()
        .iter()
        .position(|agent| std::ptr::eq(agent, population.best_agent()))
        .unwrap_or(0);
    let report = SimulationReport {
        seed,
        ticks: population.ticks(),
        agents: population
            .agents()
            .iter()
            .map(|agent| AgentResult {
                weights: *agent.weights(),
                fitness: agent.fitness(),
            })
            .collect(),
        best,
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONES: Weights = Weights::new([1.0, 1.0, 1.0]);

    fn arg(agents: Vec<Weights>) -> SimulateArg {
        SimulateArg {
            agents,
            obstacle_x: 240.0,
            seed: Some(SimSeed::from_u64(3)),
            speed: 1.0,
            time_remaining: 100.0,
            max_ticks: 1000,
            output: None,
        }
    }

    #[test]
    fn test_reports_every_agent() {
        let agents = vec![Weights::ZERO, ONES, Weights::ZERO, ONES, Weights::ZERO];
        let report = simulate(&arg(agents)).unwrap();
        let scores = report.agents.iter().map(|a| a.fitness).collect::<Vec<_>>();
        assert_eq!(scores, [9, 32, 9, 32, 9]);
        assert_eq!(report.best, 1);
        assert_eq!(report.ticks, 32);
        assert_eq!(report.agents[1].weights, ONES);
        assert_eq!(report.seed, SimSeed::from_u64(3));
    }

    #[test]
    fn test_rejects_wrong_agent_count() {
        let err = simulate(&arg(vec![Weights::ZERO; 4])).unwrap_err();
        assert_eq!(err.to_string(), "expected exactly 5 --agent values, got 4");
        assert!(simulate(&arg(vec![Weights::ZERO; 6])).is_err());
    }

    #[test]
    fn test_aborts_at_tick_limit() {
        let mut arg = arg(vec![Weights::ZERO; POPULATION_SIZE]);
        arg.obstacle_x = 10_000.0;
        arg.max_ticks = 50;
        let err = simulate(&arg).unwrap_err();
        assert_eq!(err.to_string(), "5 agents still alive after 50 ticks");
    }

    #[test]
    fn test_rejects_invalid_numbers() {
        let mut bad = arg(vec![Weights::ZERO; POPULATION_SIZE]);
        bad.speed = 0.0;
        assert!(simulate(&bad).is_err());

        let mut bad = arg(vec![Weights::ZERO; POPULATION_SIZE]);
        bad.obstacle_x = f64::NAN;
        assert!(simulate(&bad).is_err());

        let mut bad = arg(vec![Weights::ZERO; POPULATION_SIZE]);
        bad.time_remaining = -1.0;
        assert!(simulate(&bad).is_err());
    }
}
