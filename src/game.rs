use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::Event;
use log::info;

use crate::input::{Command, HeldKeys, command_for};
use crate::rendering::{GameGrid, OutputTarget, draw_game_over, draw_world};
use crate::terminal_io::InputSource;
use crate::world::{StepOutcome, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Running,
    GameOver,
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverChoice {
    Restart,
    Quit,
}

/// Caps the loop at a fixed frame rate by sleeping off what is left of each frame.
pub struct FrameClock {
    frame_duration: Option<Duration>,
    last_tick: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        FrameClock {
            frame_duration: Some(Duration::from_secs(1) / fps.max(1)),
            last_tick: Instant::now(),
        }
    }

    /// Never sleeps. Headless runs go as fast as they can.
    pub fn unthrottled() -> Self {
        FrameClock { frame_duration: None, last_tick: Instant::now() }
    }

    pub fn tick(&mut self) {
        if let Some(frame_duration) = self.frame_duration {
            if let Some(remaining) = frame_duration.checked_sub(self.last_tick.elapsed()) {
                thread::sleep(remaining);
            }
        }
        self.last_tick = Instant::now();
    }
}

pub struct Game {
    output: OutputTarget,
    input: InputSource,
    clock: FrameClock,
    grid: GameGrid,
    held_keys: HeldKeys,
    state: SessionState,
    frame_count: u64,
    max_frames: Option<u64>,
    sessions: u32,
}

impl Game {
    pub fn new(
        output: OutputTarget,
        input: InputSource,
        clock: FrameClock,
        grid_width: u16,
        grid_height: u16,
        max_frames: Option<u64>,
    ) -> Self {
        Game {
            output,
            input,
            clock,
            grid: GameGrid::new(grid_width, grid_height),
            held_keys: HeldKeys::new(),
            state: SessionState::Running,
            frame_count: 0,
            max_frames,
            sessions: 0,
        }
    }

    /// Plays sessions until the player quits. Restarts loop here instead of recursing.
    pub fn run(&mut self, world: &mut World) -> io::Result<()> {
        self.state = SessionState::Running;
        loop {
            self.state = match self.state {
                SessionState::Running => self.run_session(world)?,
                SessionState::GameOver => match self.game_over(world.score())? {
                    GameOverChoice::Restart => {
                        info!("Restarting after score {}.", world.score());
                        world.restart();
                        self.held_keys.clear();
                        SessionState::Running
                    }
                    GameOverChoice::Quit => {
                        info!("Quit from game over screen.");
                        SessionState::Terminated
                    }
                },
                SessionState::Terminated => break,
            };
        }
        info!("Game terminated after {} session(s), {} frame(s).", self.sessions, self.frame_count);
        Ok(())
    }

    fn run_session(&mut self, world: &mut World) -> io::Result<SessionState> {
        self.sessions += 1;
        info!("Session {} started.", self.sessions);

        loop {
            if self.out_of_frames() {
                info!("Frame budget of {:?} reached.", self.max_frames);
                return Ok(SessionState::Terminated);
            }

            for event in self.input.drain(self.frame_count)? {
                match event {
                    Event::Key(key) => {
                        self.held_keys.handle_key(&key, self.frame_count);
                        match command_for(&key) {
                            Some(Command::Quit) | Some(Command::WindowClose) => {
                                info!("Quit requested during session at score {}.", world.score());
                                return Ok(SessionState::Terminated);
                            }
                            _ => {}
                        }
                    }
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    _ => {}
                }
            }

            let movement = self.held_keys.movement(self.frame_count);
            let outcome = world.update(&movement);
            self.frame_count += 1;

            if outcome == StepOutcome::Collision {
                return Ok(SessionState::GameOver);
            }

            draw_world(&mut self.grid, world);
            self.present()?;
            self.clock.tick();
        }
    }

    /// Shows the summary and waits, one poll per frame, for restart or quit.
    fn game_over(&mut self, score: u32) -> io::Result<GameOverChoice> {
        info!("Game over. Final score: {}", score);
        draw_game_over(&mut self.grid, score);
        self.present()?;

        loop {
            if self.out_of_frames() {
                return Ok(GameOverChoice::Quit);
            }

            for event in self.input.drain(self.frame_count)? {
                match event {
                    Event::Key(key) => match command_for(&key) {
                        Some(Command::Restart) => return Ok(GameOverChoice::Restart),
                        Some(Command::Quit) | Some(Command::WindowClose) => return Ok(GameOverChoice::Quit),
                        _ => {}
                    },
                    Event::Resize(width, height) => {
                        self.handle_resize(width, height);
                        draw_game_over(&mut self.grid, score);
                        self.present()?;
                    }
                    _ => {}
                }
            }

            self.frame_count += 1;
            self.clock.tick();
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        if width > 0 && height > 0 {
            info!("Terminal resized to {}x{}", width, height);
            self.grid.resize(width, height);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        self.grid.render(&mut self.output)?;
        self.output.flush()?;
        self.output.log_frame();
        Ok(())
    }

    fn out_of_frames(&self) -> bool {
        self.max_frames.is_some_and(|max| self.frame_count >= max)
    }

    pub fn output(&self) -> &OutputTarget {
        &self.output
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn sessions(&self) -> u32 {
        self.sessions
    }
}
