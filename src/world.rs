//! World state and the per-frame update step.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::constants::*;
use crate::entities::{Asteroid, Direction, Player, Star, generate_star_field};

/// Movement directions held during one frame. Several may be active at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementCommands {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementCommands {
    pub fn none() -> Self {
        MovementCommands::default()
    }

    pub fn only(direction: Direction) -> Self {
        let mut commands = MovementCommands::default();
        commands.set(direction, true);
        commands
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.is_held(*d))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Collision,
}

pub struct World {
    player: Player,
    asteroids: Vec<Asteroid>,
    stars: Vec<Star>,
    score: u32,
    spawn_timer: u32,
    spawn_delay: f64,
    rng: StdRng,
}

impl World {
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let stars = generate_star_field(&mut rng);
        World {
            player: Player::new(),
            asteroids: Vec::new(),
            stars,
            score: 0,
            spawn_timer: 0,
            spawn_delay: INITIAL_SPAWN_DELAY,
            rng,
        }
    }

    /// Back to session-start conditions. The RNG keeps running, so the star field is new.
    pub fn restart(&mut self) {
        self.player = Player::new();
        self.asteroids.clear();
        self.stars = generate_star_field(&mut self.rng);
        self.score = 0;
        self.spawn_timer = 0;
        self.spawn_delay = INITIAL_SPAWN_DELAY;
        info!("World reset for a new session.");
    }

    pub fn update(&mut self, movement: &MovementCommands) -> StepOutcome {
        for direction in movement.directions() {
            self.player.move_in(direction);
        }

        // Asteroids spawned this frame start moving on the next one.
        let existing = self.asteroids.len();
        self.spawn_timer += 1;
        if f64::from(self.spawn_timer) >= self.spawn_delay {
            let asteroid = Asteroid::spawn(&mut self.rng);
            debug!("Asteroid spawned at x: {}, speed: {:.2}", asteroid.position.x, asteroid.speed);
            self.asteroids.push(asteroid);
            self.spawn_timer = 0;
            self.spawn_delay = (self.spawn_delay - SPAWN_DELAY_DECREMENT).max(MIN_SPAWN_DELAY);
        }

        for asteroid in &mut self.asteroids[..existing] {
            asteroid.advance();
        }

        let before = self.asteroids.len();
        self.asteroids.retain(|asteroid| !asteroid.is_offscreen());
        let passed = (before - self.asteroids.len()) as u32;
        if passed > 0 {
            self.score += passed;
            debug!("{} asteroid(s) passed. Score: {}", passed, self.score);
        }

        let hit_rect = self.player.hit_rect();
        if self.asteroids.iter().any(|asteroid| hit_rect.intersects(&asteroid.bounding_rect())) {
            info!("Player hit by asteroid. Final score: {}", self.score);
            return StepOutcome::Collision;
        }
        StepOutcome::Continue
    }

    pub fn insert_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    pub fn spawn_delay(&self) -> f64 {
        self.spawn_delay
    }
}
