// --- World Constants (logical canvas, world units) ---
pub const WORLD_WIDTH: f64 = 800.0;
pub const WORLD_HEIGHT: f64 = 600.0;
pub const FPS: u32 = 60;

// --- Player ---
pub const PLAYER_SIZE: f64 = 40.0;
pub const PLAYER_SPEED: f64 = 8.0;
pub const PLAYER_BOTTOM_MARGIN: f64 = 20.0;
pub const PLAYER_HITBOX_INSET: f64 = 10.0; // Forgiving hitbox, smaller than the drawn ship
pub const FLAME_HALF_WIDTH: f64 = 10.0;
pub const FLAME_LENGTH: f64 = 15.0;

// --- Asteroids ---
pub const ASTEROID_SIZE: f64 = 30.0;
pub const ASTEROID_MIN_SPEED: f64 = 3.0;
pub const ASTEROID_MAX_SPEED: f64 = 7.0;
pub const ASTEROID_MAX_ROTATION_SPEED: f64 = 3.0; // Degrees per frame
pub const ASTEROID_VERTICES: usize = 8;
pub const ASTEROID_RADIUS_JITTER: f64 = 5.0;

// --- Spawning / difficulty ---
pub const INITIAL_SPAWN_DELAY: f64 = 50.0; // Frames between spawns
pub const SPAWN_DELAY_DECREMENT: f64 = 0.2;
pub const MIN_SPAWN_DELAY: f64 = 20.0;

// --- Star field ---
pub const STAR_COUNT: usize = 100;
pub const STAR_MIN_RADIUS: u8 = 1;
pub const STAR_MAX_RADIUS: u8 = 3;

// --- Input ---
pub const KEY_RELEASE_TIMEOUT_FRAMES: u64 = 8; // Used until the terminal proves it reports releases

// --- Debug defaults ---
pub const DEBUG_GRID_WIDTH: u16 = 80;
pub const DEBUG_GRID_HEIGHT: u16 = 24;
pub const DEBUG_MAX_FRAMES: u64 = 600;
pub const DEFAULT_LOG_FILE: &str = "asteroid-dodge.log";
