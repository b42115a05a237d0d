use hurdle_engine::{
    AGENT_WIDTH, AGENT_X, ObstacleSource, POPULATION_SIZE, Population, SimSeed, Weights,
};
use hurdle_training::{
    genetic::{Evolver, select_elites},
    session::{StepOutcome, TrainingSession},
};

const ONES: Weights = Weights::new([1.0, 1.0, 1.0]);

/// Two jumpers among three agents that never jump, with the first obstacle 50 units ahead.
fn mixed_population() -> Population {
    let weights = [Weights::ZERO, ONES, Weights::ZERO, ONES, Weights::ZERO];
    Population::from_weights(1, weights)
        .with_obstacles(ObstacleSource::starting_at(AGENT_X + AGENT_WIDTH + 50.0))
}

fn run_out(population: &mut Population, seed: u64) {
    let mut rng = SimSeed::from_u64(seed).rng();
    while population.state().is_active() {
        population.tick(1.0, 100.0, &mut rng);
    }
}

#[test]
fn jumpers_outlive_grounded_agents() {
    let mut population = mixed_population();
    run_out(&mut population, 1);

    let scores = population
        .agents()
        .iter()
        .map(|agent| agent.fitness())
        .collect::<Vec<_>>();
    assert_eq!(scores, [9, 32, 9, 32, 9]);
    assert_eq!(population.best_agent().weights(), &ONES);
    assert_eq!(population.best_fitness(), 32);
}

#[test]
fn outcome_does_not_depend_on_seed() {
    for seed in 0..20 {
        let mut population = mixed_population();
        run_out(&mut population, seed);
        assert!(std::ptr::eq(
            population.best_agent(),
            &population.agents()[1]
        ));
    }
}

#[test]
fn jumpers_become_the_parents() {
    let mut population = mixed_population();
    run_out(&mut population, 4);

    let elites = select_elites(&population, 2);
    assert!(std::ptr::eq(elites[0], &population.agents()[1]));
    assert!(std::ptr::eq(elites[1], &population.agents()[3]));

    let next = Evolver::default().evolve(&population, &mut SimSeed::from_u64(4).rng());
    assert_eq!(next.generation(), 2);
    assert_eq!(next.agents().len(), POPULATION_SIZE);
    for agent in next.agents() {
        assert!(agent.is_alive());
        assert_eq!(agent.fitness(), 0);
        assert!(
            agent
                .weights()
                .values()
                .iter()
                .all(|w| (0.75..1.25).contains(w))
        );
    }

    let exact = Evolver {
        mutation_rate: 0.0,
        ..Evolver::default()
    }
    .evolve(&population, &mut SimSeed::from_u64(4).rng());
    assert!(exact.agents().iter().all(|agent| agent.weights() == &ONES));
}

#[test]
fn session_replays_from_seed() {
    let run = |seed| {
        let mut session = TrainingSession::with_population(
            mixed_population(),
            Evolver::default(),
            SimSeed::from_u64(seed).rng(),
        )
        .expect("default evolver is valid");
        let mut evolved = Vec::new();
        while evolved.len() < 4 {
            if let StepOutcome::Evolved(summary) = session.step(1.0, 100.0) {
                evolved.push(summary);
            }
        }
        evolved
    };

    let first = run(77);
    assert_eq!(first, run(77));
    assert_eq!(first[0].scores, [9, 32, 9, 32, 9]);
    assert_eq!(first[0].champion, ONES);
    assert_eq!(first[3].generation, 4);
}
