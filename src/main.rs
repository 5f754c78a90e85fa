use std::env;
use std::io;
use std::process;

use crossterm::event::{Event, KeyCode};
use log::{error, info, warn};

use asteroid_dodge::config::GameConfig;
use asteroid_dodge::constants::FPS;
use asteroid_dodge::game::{FrameClock, Game};
use asteroid_dodge::rendering::{OutputTarget, ScreenBuffer};
use asteroid_dodge::terminal_io::{InputSource, SimulatedInput, enter_terminal, leave_terminal};
use asteroid_dodge::world::World;

fn main() {
    let config = GameConfig::from_args(env::args().skip(1));
    let level = if config.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    if let Err(e) = simple_logging::log_to_file(&config.log_file, level) {
        eprintln!("asteroid-dodge: logging disabled, cannot open {}: {}", config.log_file, e);
    }
    info!("Starting Asteroid Dodge.");
    for warning in &config.warnings {
        warn!("{}", warning);
    }

    if let Err(e) = run(&config) {
        error!("Fatal error: {}", e);
        eprintln!("asteroid-dodge: {}", e);
        process::exit(1);
    }
    info!("Exiting Asteroid Dodge.");
}

fn run(config: &GameConfig) -> io::Result<()> {
    let mut world = World::new(config.seed);

    if config.debug {
        info!(
            "Debug mode: {}x{} screen buffer, frame budget {:?}, seed {:?}",
            config.grid_width, config.grid_height, config.max_frames, config.seed
        );
        let mut game = Game::new(
            OutputTarget::ScreenBuffer(ScreenBuffer::new(config.grid_width, config.grid_height)),
            InputSource::Simulated(debug_script()),
            FrameClock::unthrottled(),
            config.grid_width,
            config.grid_height,
            config.max_frames,
        );
        return game.run(&mut world);
    }

    let mut stdout = io::stdout();
    let (width, height) = match enter_terminal(&mut stdout) {
        Ok(size) => size,
        Err(e) => {
            let _ = leave_terminal(&mut stdout);
            return Err(io::Error::new(e.kind(), format!("cannot initialise terminal display: {}", e)));
        }
    };

    let mut game = Game::new(
        OutputTarget::Stdout(stdout),
        InputSource::Terminal,
        FrameClock::new(FPS),
        width,
        height,
        config.max_frames,
    );
    let result = game.run(&mut world);

    // Always try to restore the terminal, even after an error.
    let restored = leave_terminal(&mut io::stdout());
    result.and(restored)
}

/// Weaves left and right, and presses Space regularly so a game over restarts.
fn debug_script() -> SimulatedInput {
    let mut frames = Vec::new();
    for frame in (1..120).step_by(4) {
        frames.push((frame, Event::Key(KeyCode::Left.into())));
    }
    for frame in (120..240).step_by(4) {
        frames.push((frame, Event::Key(KeyCode::Right.into())));
    }
    for frame in (50..2_000).step_by(50) {
        frames.push((frame, Event::Key(KeyCode::Char(' ').into())));
    }
    SimulatedInput::from_frames(frames)
}
