use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use galaga::{
    standard_waves, CliRenderer, Galaga, GalagaConfig, Game, Input, MatchState, Renderer,
    SolidSprites, Starship,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Logical units a starship moves per key press.
const STARSHIP_STEP: f64 = 4.0;
/// The headless pilot fires this often, in ticks.
const HEADLESS_FIRE_EVERY: u64 = 8;

#[derive(Parser, Debug)]
#[command(name = "galaga-cli")]
#[command(about = "Galaga in the terminal, or headless for a fixed number of ticks")]
struct Cli {
    /// TOML file with [regulator] and [host] tables
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,
    /// Run without a terminal and print the outcome
    #[arg(long)]
    headless: bool,
    /// Ticks to simulate in headless mode
    #[arg(long, default_value_t = 2_000)]
    ticks: u64,
    /// Start paused in step mode with consistency checks enabled
    #[arg(long)]
    debug: bool,
    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

fn init_tracing(format: LogFormat, log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let writer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(log_file.is_none())
        .with_writer(writer);
    match format {
        LogFormat::Json => builder.json().with_current_span(true).init(),
        LogFormat::Compact => builder.compact().init(),
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

fn new_match(config: &GalagaConfig, seed: u64, debug: bool) -> Galaga<StdRng> {
    let mut galaga = Galaga::new(
        Game::new(Starship::centered()),
        config.regulator.clone(),
        standard_waves(),
        StdRng::seed_from_u64(seed),
    );
    galaga.set_debug(debug);
    galaga
}

fn run_headless(galaga: &mut Galaga<StdRng>, ticks: u64) {
    let mut sprites = SolidSprites::default();
    let mut heading = STARSHIP_STEP;
    for tick in 1..=ticks {
        galaga.attach_sprites(&mut sprites);
        if !galaga.move_each_starship(heading) {
            heading = -heading;
        }
        if tick % HEADLESS_FIRE_EVERY == 0 {
            galaga.fire_starship_shot();
        }
        galaga.tick();
        if !galaga.is_playing() {
            break;
        }
    }

    let state = match galaga.state() {
        MatchState::Playing => "still playing",
        MatchState::GameOver => "game over",
        MatchState::Victory => "victory",
    };
    println!(
        "{state} after {} ticks: level {}, score {}",
        galaga.ticks(),
        galaga.level(),
        galaga.score()
    );
}

fn run_interactive(config: &GalagaConfig, seed: u64, debug: bool) -> Result<()> {
    let tick_interval = Duration::from_millis(config.host.tick_interval_ms);
    let mut galaga = new_match(config, seed, debug);
    let mut renderer = CliRenderer::new();

    renderer.init().context("cannot set up the terminal")?;

    let mut last_tick = Instant::now();

    loop {
        if let Some(input) = renderer.poll_input()? {
            match input {
                Input::MoveLeft => {
                    galaga.move_each_starship(-STARSHIP_STEP);
                }
                Input::MoveRight => {
                    galaga.move_each_starship(STARSHIP_STEP);
                }
                Input::Fire => galaga.fire_starship_shot(),
                Input::ToggleDebug => {
                    let enabled = !galaga.is_debug();
                    galaga.set_debug(enabled);
                    tracing::info!(enabled, "debug mode toggled");
                }
                Input::Step if galaga.is_debug() => galaga.step(),
                Input::Restart => {
                    galaga = new_match(config, seed, galaga.is_debug());
                }
                Input::Quit => break,
                Input::Step => {}
            }
        }

        // Debug mode only advances on explicit steps
        if !galaga.is_debug() && last_tick.elapsed() >= tick_interval {
            galaga.tick();
            last_tick = Instant::now();
        }

        galaga.attach_sprites(&mut renderer);
        renderer.render(&galaga.game, &galaga.hud())?;
    }

    renderer.cleanup()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.log_file.as_ref())?;

    let mut config = match &cli.config {
        Some(path) => GalagaConfig::load(path)?,
        None => GalagaConfig::default(),
    };
    if cli.debug {
        config.regulator.debug_assertions = true;
    }
    let seed = cli
        .seed
        .or(config.host.seed)
        .unwrap_or_else(rand::random);
    tracing::info!(seed, headless = cli.headless, "starting match");

    if cli.headless {
        let mut galaga = new_match(&config, seed, cli.debug);
        run_headless(&mut galaga, cli.ticks);
        Ok(())
    } else {
        run_interactive(&config, seed, cli.debug)
    }
}
