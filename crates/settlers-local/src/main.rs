//! Settlers local game driver.
//!
//! Reads pointer events from stdin and writes game events to stdout as JSON
//! lines. Logs go to stderr.

use anyhow::Context;
use settlers_core::GameState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod settings;
mod terminal;

use terminal::{JsonSink, LineInput};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = settings::config_from_env().context("invalid game settings")?;
    info!(
        "Starting game for {} with {:?} dice and {:?} roads",
        config.player_names.join(", "),
        config.dice,
        config.road_rule
    );

    let mut game = GameState::new(config);
    let mut input = LineInput::new(std::io::stdin().lock());
    let mut sink = JsonSink::new(std::io::stdout().lock());

    settlers_core::run(&mut game, &mut input, &mut sink);

    if let Some(e) = sink.take_error() {
        return Err(e).context("failed to write game events");
    }

    info!("Game closed after {} turns", game.turn_number);
    Ok(())
}
