#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Blast Grid session headlessly.

mod headless;
mod script;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result as AnyResult};
use bomber_core::{GameConfig, MapLayout};
use bomber_session::Session;
use bomber_world::query;
use clap::Parser;
use log::info;

use crate::{
    headless::{HeadlessPhysics, LogDisplay},
    script::{parse_script, Step},
};

const DEFAULT_SCRIPT: &str = "bomb wait:4000 bomb wait:4000 bomb wait:4000 restart wait:500";

/// Runs a scripted Blast Grid session and prints the final arena.
#[derive(Debug, Parser)]
#[command(name = "blast-grid", version)]
struct Cli {
    /// TOML file holding game configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// ASCII layout to play instead of a generated map.
    #[arg(short, long)]
    layout: Option<PathBuf>,
    /// Overrides the map generation seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the number of grid columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Overrides the number of grid rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Simulated frame length in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Whitespace separated actions: bomb, restart, wait:<ms>, up|down|left|right:<ms>.
    #[arg(short, long, default_value = DEFAULT_SCRIPT)]
    script: String,
}

fn main() -> AnyResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}

fn run(cli: Cli) -> AnyResult<()> {
    ensure!(cli.frame_ms > 0, "frame length must be positive");
    let frame = Duration::from_millis(cli.frame_ms);
    let config = load_config(&cli)?;
    let steps = parse_script(&cli.script).context("failed to parse script")?;

    let physics = HeadlessPhysics::new(config.tile_length);
    let display = LogDisplay::default();
    let mut session = match &cli.layout {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read layout at {}", path.display()))?;
            let layout: MapLayout = contents
                .parse()
                .with_context(|| format!("failed to parse layout at {}", path.display()))?;
            Session::with_layout(config, layout, physics, display)?
        }
        None => Session::new(config, physics, display)?,
    };

    for step in &steps {
        play(&mut session, *step, frame)?;
    }

    let world = session.world();
    info!(
        "seed {:#x}, {:.1?} of simulated play",
        query::config(world).seed,
        query::clock(world)
    );
    let status = query::status(world);
    if let Some(layout) = query::tile_map(world).to_layout() {
        print!("{layout}");
    }
    println!(
        "score {} | lives {} | max bombs {} | {:?}",
        status.score, status.lives, status.max_bombs, status.phase
    );
    if let Some(shown) = session.display().last() {
        info!("last HUD push: {shown:?}");
    }
    Ok(())
}

fn play(
    session: &mut Session<HeadlessPhysics, LogDisplay>,
    step: Step,
    frame: Duration,
) -> AnyResult<()> {
    let input = step.input();
    let mut remaining = step.duration();
    if remaining.is_zero() {
        return session
            .update(Duration::ZERO, input)
            .with_context(|| format!("failed to run {step:?}"));
    }
    while !remaining.is_zero() {
        let dt = remaining.min(frame);
        session
            .update(dt, input)
            .with_context(|| format!("failed to run {step:?}"))?;
        remaining -= dt;
    }
    Ok(())
}

fn load_config(cli: &Cli) -> AnyResult<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            parse_config(&contents)
                .with_context(|| format!("failed to load config at {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(columns) = cli.columns {
        config.columns = columns;
    }
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    config.validate().context("invalid game configuration")?;
    Ok(config)
}

fn parse_config(contents: &str) -> AnyResult<GameConfig> {
    toml::from_str(contents).context("failed to parse config toml contents")
}
