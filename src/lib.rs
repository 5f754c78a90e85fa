//! Asteroid Dodge: steer a ship through falling asteroids in the terminal.
//!
//! Game logic runs in a fixed 800x600 world (`world`, `entities`) that knows
//! nothing about the display. `rendering` projects it onto character cells and
//! `game` drives the frame loop.

pub mod config;
pub mod constants;
pub mod entities;
pub mod game;
pub mod input;
pub mod rendering;
pub mod terminal_io;
pub mod types;
pub mod world;
