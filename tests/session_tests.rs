//! Headless end-to-end runs of the game driver.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use asteroid_dodge::constants::{PLAYER_SPEED, WORLD_HEIGHT};
use asteroid_dodge::entities::Asteroid;
use asteroid_dodge::game::{FrameClock, Game, SessionState};
use asteroid_dodge::rendering::{OutputTarget, ScreenBuffer};
use asteroid_dodge::terminal_io::{InputSource, SimulatedInput};
use asteroid_dodge::world::World;

fn key(code: KeyCode) -> Event {
    Event::Key(code.into())
}

fn headless_game(script: Vec<(u64, Event)>, max_frames: Option<u64>) -> Game {
    Game::new(
        OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24)),
        InputSource::Simulated(SimulatedInput::from_frames(script)),
        FrameClock::unthrottled(),
        80,
        24,
        max_frames,
    )
}

fn screen(game: &Game) -> &ScreenBuffer {
    match game.output() {
        OutputTarget::ScreenBuffer(sb) => sb,
        OutputTarget::Stdout(_) => panic!("expected a headless screen"),
    }
}

fn doomed_world(seed: u64) -> World {
    let mut world = World::new(Some(seed));
    let hit = world.player().hit_rect();
    world.insert_asteroid(Asteroid::with_motion(hit.x - 29.0, hit.y, 0.0, 0.0));
    world
}

#[test]
fn test_quit_key_ends_session() {
    let mut world = World::new(Some(1));
    let mut game = headless_game(vec![(5, key(KeyCode::Esc))], Some(1_000));
    game.run(&mut world).unwrap();

    assert_eq!(game.state(), SessionState::Terminated);
    assert_eq!(game.sessions(), 1);
    assert_eq!(game.frame_count(), 5);
    assert!(screen(&game).row_text(0).starts_with("Score: 0"));
}

#[test]
fn test_collision_then_restart_gives_fresh_world() {
    let mut world = doomed_world(2);
    let old_stars = world.stars().to_vec();
    let mut game = headless_game(
        vec![(3, key(KeyCode::Char(' '))), (10, key(KeyCode::Char('q')))],
        Some(1_000),
    );
    game.run(&mut world).unwrap();

    assert_eq!(game.sessions(), 2);
    assert_eq!(world.score(), 0);
    assert!(world.asteroids().is_empty());
    assert_ne!(world.stars(), &old_stars[..]);
}

#[test]
fn test_quit_from_game_over_screen() {
    let mut world = doomed_world(3);
    let mut game = headless_game(vec![(4, key(KeyCode::Esc))], Some(1_000));
    game.run(&mut world).unwrap();

    assert_eq!(game.state(), SessionState::Terminated);
    assert_eq!(game.sessions(), 1);
    assert!(screen(&game).contains("GAME OVER"));
    assert!(screen(&game).contains("Final Score: 0"));
}

#[test]
fn test_window_close_during_game_over_terminates() {
    let mut world = doomed_world(4);
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    let mut game = headless_game(vec![(2, ctrl_c), (3, key(KeyCode::Char(' ')))], Some(1_000));
    game.run(&mut world).unwrap();

    assert_eq!(game.sessions(), 1);
    assert_eq!(game.frame_count(), 2);
}

#[test]
fn test_frame_budget_ends_run() {
    let mut world = World::new(Some(5));
    let mut game = headless_game(Vec::new(), Some(30));
    game.run(&mut world).unwrap();

    assert_eq!(game.state(), SessionState::Terminated);
    assert_eq!(game.frame_count(), 30);
}

#[test]
fn test_passing_asteroid_scores_and_updates_hud() {
    let mut world = World::new(Some(6));
    world.insert_asteroid(Asteroid::with_motion(0.0, WORLD_HEIGHT - 10.0, 5.0, 0.0));
    let mut game = headless_game(Vec::new(), Some(5));
    game.run(&mut world).unwrap();

    assert_eq!(world.score(), 1);
    assert!(screen(&game).row_text(0).starts_with("Score: 1"));
}

#[test]
fn test_tapped_key_moves_until_release_timeout() {
    let mut world = World::new(Some(7));
    let start_x = world.player().position.x;
    let mut game = headless_game(vec![(0, key(KeyCode::Left))], Some(20));
    game.run(&mut world).unwrap();

    // Held for the default eight-frame timeout, then auto-released.
    assert_eq!(world.player().position.x, start_x - 8.0 * PLAYER_SPEED);
}
