use crate::constants::*;
use crate::types::{Rect, Vector2D};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];
}

// --- Player ship ---
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub position: Vector2D,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Player {
    pub fn new() -> Self {
        Player {
            position: Vector2D::new(
                WORLD_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
                WORLD_HEIGHT - PLAYER_SIZE - PLAYER_BOTTOM_MARGIN,
            ),
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_SPEED,
        }
    }

    /// One step in `direction`, clamped so the ship never leaves the world.
    pub fn move_in(&mut self, direction: Direction) {
        let max_x = WORLD_WIDTH - self.width;
        let max_y = WORLD_HEIGHT - self.height;
        match direction {
            Direction::Left => self.position.x = (self.position.x - self.speed).max(0.0),
            Direction::Right => self.position.x = (self.position.x + self.speed).min(max_x),
            Direction::Up => self.position.y = (self.position.y - self.speed).max(0.0),
            Direction::Down => self.position.y = (self.position.y + self.speed).min(max_y),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn hit_rect(&self) -> Rect {
        self.bounds().inset(PLAYER_HITBOX_INSET)
    }

    pub fn ship_outline(&self) -> [Vector2D; 3] {
        let Vector2D { x, y } = self.position;
        [
            Vector2D::new(x + self.width / 2.0, y), // Nose
            Vector2D::new(x, y + self.height),
            Vector2D::new(x + self.width, y + self.height),
        ]
    }

    pub fn flame_outline(&self) -> [Vector2D; 3] {
        let center_x = self.position.x + self.width / 2.0;
        let bottom = self.position.y + self.height;
        [
            Vector2D::new(center_x - FLAME_HALF_WIDTH, bottom),
            Vector2D::new(center_x, bottom + FLAME_LENGTH),
            Vector2D::new(center_x + FLAME_HALF_WIDTH, bottom),
        ]
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}

// --- Falling asteroid ---
#[derive(Clone, Debug, PartialEq)]
pub struct Asteroid {
    pub position: Vector2D,
    pub size: f64,
    pub speed: f64,
    pub rotation: f64, // Degrees, cosmetic only
    pub rotation_speed: f64,
    radius_offsets: [f64; ASTEROID_VERTICES],
}

impl Asteroid {
    pub fn spawn(rng: &mut impl Rng) -> Self {
        let max_x = (WORLD_WIDTH - ASTEROID_SIZE) as i32;
        let x = f64::from(rng.gen_range(0..=max_x));
        let speed = rng.gen_range(ASTEROID_MIN_SPEED..ASTEROID_MAX_SPEED);
        let rotation_speed = rng.gen_range(-ASTEROID_MAX_ROTATION_SPEED..ASTEROID_MAX_ROTATION_SPEED);

        let mut radius_offsets = [0.0; ASTEROID_VERTICES];
        for offset in radius_offsets.iter_mut() {
            *offset = rng.gen_range(-ASTEROID_RADIUS_JITTER..=ASTEROID_RADIUS_JITTER);
        }

        Asteroid {
            position: Vector2D::new(x, -ASTEROID_SIZE),
            size: ASTEROID_SIZE,
            speed,
            rotation: 0.0,
            rotation_speed,
            radius_offsets,
        }
    }

    /// An asteroid with explicit motion and a regular outline.
    pub fn with_motion(x: f64, y: f64, speed: f64, rotation_speed: f64) -> Self {
        Asteroid {
            position: Vector2D::new(x, y),
            size: ASTEROID_SIZE,
            speed,
            rotation: 0.0,
            rotation_speed,
            radius_offsets: [0.0; ASTEROID_VERTICES],
        }
    }

    pub fn advance(&mut self) {
        self.position.y += self.speed;
        self.rotation += self.rotation_speed;
    }

    pub fn is_offscreen(&self) -> bool {
        self.position.y > WORLD_HEIGHT
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size, self.size)
    }

    /// Irregular polygon used for drawing. Collision uses `bounding_rect` instead.
    pub fn outline(&self) -> Vec<Vector2D> {
        let center = Vector2D::new(self.position.x + self.size / 2.0, self.position.y + self.size / 2.0);
        let step = 360.0 / ASTEROID_VERTICES as f64;
        self.radius_offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                let radius = self.size / 2.0 + offset;
                center.add(Vector2D::from_degrees(self.rotation + i as f64 * step).scale(radius))
            })
            .collect()
    }
}

// --- Background star ---
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vector2D,
    pub radius: u8,
}

impl Star {
    pub fn random(rng: &mut impl Rng) -> Self {
        let x = rng.gen_range(0..=WORLD_WIDTH as u32);
        let y = rng.gen_range(0..=WORLD_HEIGHT as u32);
        Star {
            position: Vector2D::new(f64::from(x), f64::from(y)),
            radius: rng.gen_range(STAR_MIN_RADIUS..=STAR_MAX_RADIUS),
        }
    }
}

pub fn generate_star_field(rng: &mut impl Rng) -> Vec<Star> {
    (0..STAR_COUNT).map(|_| Star::random(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_player_starts_centered_above_bottom() {
        let player = Player::new();
        assert_eq!(player.position, Vector2D::new(380.0, 540.0));
        assert_eq!(player.hit_rect(), Rect::new(390.0, 550.0, 20.0, 20.0));
    }

    #[test]
    fn test_player_stays_in_bounds_for_any_moves() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut player = Player::new();
        for _ in 0..5_000 {
            let direction = Direction::ALL[rng.gen_range(0..4)];
            player.move_in(direction);
            assert!(player.position.x >= 0.0 && player.position.x <= WORLD_WIDTH - player.width);
            assert!(player.position.y >= 0.0 && player.position.y <= WORLD_HEIGHT - player.height);
        }
    }

    #[test]
    fn test_player_clamps_instead_of_overshooting() {
        let mut player = Player::new();
        for _ in 0..100 {
            player.move_in(Direction::Left);
        }
        assert_eq!(player.position.x, 0.0);
        for _ in 0..100 {
            player.move_in(Direction::Down);
        }
        assert_eq!(player.position.y, WORLD_HEIGHT - PLAYER_SIZE);
    }

    #[test]
    fn test_asteroid_spawn_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let asteroid = Asteroid::spawn(&mut rng);
            assert_eq!(asteroid.position.y, -ASTEROID_SIZE);
            assert!(asteroid.position.x >= 0.0 && asteroid.position.x <= WORLD_WIDTH - ASTEROID_SIZE);
            assert_eq!(asteroid.position.x.fract(), 0.0);
            assert!(asteroid.speed >= ASTEROID_MIN_SPEED && asteroid.speed < ASTEROID_MAX_SPEED);
            assert!(asteroid.rotation_speed.abs() <= ASTEROID_MAX_ROTATION_SPEED);
        }
    }

    #[test]
    fn test_asteroid_offscreen_only_after_top_passes_bottom() {
        let mut asteroid = Asteroid::with_motion(100.0, WORLD_HEIGHT - 1.0, 1.0, 0.0);
        asteroid.advance();
        assert!(!asteroid.is_offscreen());
        asteroid.advance();
        assert!(asteroid.is_offscreen());
    }

    #[test]
    fn test_rotation_does_not_change_bounding_rect() {
        let mut asteroid = Asteroid::with_motion(100.0, 50.0, 0.0, 2.5);
        let before = asteroid.bounding_rect();
        let outline_before = asteroid.outline();
        asteroid.advance();
        assert_eq!(asteroid.bounding_rect(), before);
        assert_ne!(asteroid.outline(), outline_before);
        assert_eq!(asteroid.outline().len(), ASTEROID_VERTICES);
    }

    #[test]
    fn test_star_field_within_world() {
        let mut rng = StdRng::seed_from_u64(3);
        let stars = generate_star_field(&mut rng);
        assert_eq!(stars.len(), STAR_COUNT);
        for star in &stars {
            assert!(star.position.x >= 0.0 && star.position.x <= WORLD_WIDTH);
            assert!(star.position.y >= 0.0 && star.position.y <= WORLD_HEIGHT);
            assert!((STAR_MIN_RADIUS..=STAR_MAX_RADIUS).contains(&star.radius));
        }
    }
}
