use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    style::ResetColor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info, warn};

// --- SimulatedInput for headless runs ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events }
    }

    /// Single event per frame, the common case for scripted runs.
    pub fn from_frames(frames: impl IntoIterator<Item = (u64, Event)>) -> Self {
        let mut events: HashMap<u64, Vec<Event>> = HashMap::new();
        for (frame, event) in frames {
            events.entry(frame).or_default().push(event);
        }
        SimulatedInput { events }
    }

    pub fn take(&mut self, frame_count: u64) -> Vec<Event> {
        self.events.remove(&frame_count).unwrap_or_default()
    }

    pub fn is_exhausted(&self) -> bool {
        self.events.is_empty()
    }
}

pub enum InputSource {
    Terminal,
    Simulated(SimulatedInput),
}

impl InputSource {
    /// Every event pending at `frame_count`. Never blocks.
    pub fn drain(&mut self, frame_count: u64) -> io::Result<Vec<Event>> {
        match self {
            InputSource::Simulated(sim) => Ok(sim.take(frame_count)),
            InputSource::Terminal => {
                let mut events = Vec::new();
                while event::poll(Duration::ZERO).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                    events.push(event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?);
                }
                Ok(events)
            }
        }
    }
}

/// Raw mode, alternate screen, hidden cursor. Returns the terminal size.
pub fn enter_terminal(stdout: &mut io::Stdout) -> io::Result<(u16, u16)> {
    info!("Attempting to enable raw mode.");
    enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
    let (width, height) = terminal::size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    if width == 0 || height == 0 {
        error!("Terminal reports an empty display: {}x{}", width, height);
        return Err(io::Error::other(format!("terminal size is {}x{}", width, height)));
    }
    execute!(stdout, EnterAlternateScreen, Hide).map_err(|e| { error!("Failed to prepare screen: {}", e); e })?;

    // Release events make held keys exact on terminals that support them.
    if let Err(e) = execute!(stdout, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)) {
        warn!("Keyboard enhancement unavailable, falling back to key timeouts: {}", e);
    }
    stdout.flush()?;
    info!("Terminal ready: {}x{}", width, height);
    Ok((width, height))
}

/// Best effort: each step is attempted even if an earlier one fails.
pub fn leave_terminal(stdout: &mut io::Stdout) -> io::Result<()> {
    let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    let screen = execute!(stdout, ResetColor, Show, LeaveAlternateScreen);
    let raw = disable_raw_mode();
    screen.map_err(|e| { error!("Failed to restore screen: {}", e); e })?;
    raw.map_err(|e| { error!("Failed to disable raw mode: {}", e); e })?;
    info!("Terminal restored.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn test_simulated_input_yields_events_once() {
        let mut input = InputSource::Simulated(SimulatedInput::from_frames([
            (2, Event::Key(KeyCode::Left.into())),
            (2, Event::Key(KeyCode::Up.into())),
            (5, Event::Key(KeyCode::Esc.into())),
        ]));
        assert!(input.drain(0).unwrap().is_empty());
        assert_eq!(input.drain(2).unwrap().len(), 2);
        assert!(input.drain(2).unwrap().is_empty());
        assert_eq!(input.drain(5).unwrap(), vec![Event::Key(KeyCode::Esc.into())]);
        match input {
            InputSource::Simulated(sim) => assert!(sim.is_exhausted()),
            InputSource::Terminal => unreachable!(),
        }
    }
}
