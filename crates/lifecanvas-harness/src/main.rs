#![forbid(unsafe_code)]

//! Headless runner for the Game of Life control layer.
//!
//! Drives the controller against the reference universe on a software raster
//! with a deterministic clock, then prints the final grid and frame report.
//!
//! ```sh
//! cargo run -p lifecanvas-harness -- --frames 120 --strategy blit --seed 7
//! ```

mod cli;

use std::process::ExitCode;

use lifecanvas_core::headless::HeadlessHost;
use lifecanvas_core::logging::{self, LogFormat};
use lifecanvas_core::raster::RasterSurface;
use lifecanvas_core::{Controller, LifeConfig, LifeError, RenderSettings, SimulationEngine};
use lifecanvas_engine::{Universe, UniverseConfig};
use tracing::{error, info};

use cli::{Command, HELP_TEXT, Opts};

fn main() -> ExitCode {
    let opts = match Opts::parse(std::env::args().skip(1)) {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{HELP_TEXT}");
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("lifecanvas-harness {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("error: {msg}\n\n{HELP_TEXT}");
            return ExitCode::from(2);
        }
    };

    let format = if opts.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    if let Err(err) = logging::init("info", format) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Opts) -> Result<(), LifeError> {
    let universe = Universe::from_config(&UniverseConfig {
        width: opts.width,
        height: opts.height,
        seed: opts.seed,
        ..UniverseConfig::default()
    })?;
    let config = LifeConfig {
        strategy: opts.strategy,
        autoplay: true,
        ..LifeConfig::default()
    };

    let settings = RenderSettings::try_from(&config)?;
    let (width, height) = settings.checked_canvas_size(universe.grid_size())?;
    let host = HeadlessHost::with_surface(RasterSurface::new(width, height));

    let mut controller = Controller::new(universe, host, &config)?;
    controller.start()?;
    let ran = controller.run_frames(opts.frames, opts.interval)?;

    info!(
        frames = ran,
        generation = controller.generation(),
        renders = controller.render_count(),
        live = controller.engine().live_count(),
        strategy = %controller.strategy(),
        "run complete"
    );

    println!("{}", controller.engine());
    match controller.stats().report() {
        Some(report) => println!("{report}"),
        None => println!("no frames recorded"),
    }
    Ok(())
}
