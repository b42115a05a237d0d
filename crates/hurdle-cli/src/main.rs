use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod command;
mod model;
mod pace;
mod util;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    command::run()
}
