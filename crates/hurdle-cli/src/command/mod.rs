use clap::{Parser, Subcommand};

use self::{simulate::SimulateArg, train::TrainArg};

mod simulate;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve jumping agents over several generations
    Train(#[clap(flatten)] TrainArg),
    /// Run one population with fixed weights and report every agent's fitness
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

/// Fails unless `value` is a positive finite number.
fn ensure_positive(name: &str, value: f64) -> anyhow::Result<()> {
    anyhow::ensure!(
        value.is_finite() && value > 0.0,
        "--{name} must be a positive finite number, got {value}"
    );
    Ok(())
}
