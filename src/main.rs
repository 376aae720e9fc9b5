use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use scrubview::input::{Dispatch, UserCommand, HELP};
use scrubview::overlay::{self, OverlayLayout};
use scrubview::player::{PlayerScreen, ScreenDriver, ScreenState};
use scrubview::utils;
use scrubview::SimulatedEngine;

/// scrubview - a video screen with scrub bar and auto-hiding controls
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Media file to mount
    #[arg(value_name = "FILE", default_value = "samplevideo.mp4")]
    file: PathBuf,

    /// Length of the simulated media, in seconds
    #[arg(long, value_name = "SECS", default_value = "60")]
    duration: f64,

    /// Width of the scrub track, in points
    #[arg(long, value_name = "PX")]
    track_width: Option<f64>,

    /// Start playing once mounted
    #[arg(long)]
    autoplay: bool,

    /// Print every state change as a JSON line
    #[arg(long)]
    json: bool,

    /// Configuration file to layer over the defaults
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Width of the scrub bar on the terminal, in cells
const BAR_COLUMNS: usize = 40;

/// How often the loop advances the screen clock
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = utils::load_config(args.config.as_deref())?;

    // Initialize logging
    let log_level = if args.debug {
        "debug"
    } else {
        config.general.log_level.as_str()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting scrubview v{}", env!("CARGO_PKG_VERSION"));

    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("Duration must be a positive number of seconds");
    }

    let mut layout = OverlayLayout::from_config(&config.overlay);
    if let Some(width) = args.track_width {
        if width <= 0.0 {
            anyhow::bail!("Track width must be positive");
        }
        layout = layout.with_track_width(width, config.overlay.height_divisor);
    }

    let engine = SimulatedEngine::new(args.duration);
    let mut screen = PlayerScreen::open(&args.file, Box::new(engine.clone()), &config.screen);
    let engine = screen.engine_available().then_some(engine);

    let json = args.json;
    screen.subscribe(move |state| print_state(state, &layout, json));
    print_state(&screen.state(), &layout, json);

    let mut driver = ScreenDriver::new(screen, engine);
    if args.autoplay || config.general.auto_play {
        driver.screen_mut().on_play_pause_toggled();
    }

    // Stdin blocks, so read it on its own thread and feed the loop
    let (line_tx, mut line_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });

    let start = tokio::time::Instant::now();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = frames.tick() => driver.advance_to(start.elapsed()),

            line = line_rx.recv() => {
                let Some(line) = line else {
                    info!("Input closed");
                    break;
                };
                driver.advance_to(start.elapsed());

                match UserCommand::parse(&line) {
                    Ok(Some(command)) => {
                        match command.dispatch(driver.screen_mut(), layout.track_width) {
                            Dispatch::Continue => driver.sync(),
                            Dispatch::ShowState => {
                                println!("{}", serde_json::to_string_pretty(&driver.screen().state())?);
                            }
                            Dispatch::ShowHelp => println!("{}", HELP),
                            Dispatch::Quit => break,
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("{} (type 'help')", e),
                }
            }

            _ = &mut shutdown => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!("Shutting down");
    Ok(())
}

/// Render callback run after every state change
fn print_state(state: &ScreenState, layout: &OverlayLayout, json: bool) {
    if json {
        match serde_json::to_string(state) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize state: {}", e),
        }
    } else {
        let frame = overlay::render(state, layout);
        println!("{}", overlay::render_line(&frame, BAR_COLUMNS));
    }
}
