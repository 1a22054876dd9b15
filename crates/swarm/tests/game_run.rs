//! Whole-game runs against the recording backend.

use swarm::input::virtual_pointer;
use swarm::{
    Assets, FrameError, Game, GameConfig, GameEvent, GamePhase, InputSnapshot, Keys, SetupError,
};
use swarm_core::{Arena, CoreError, EntityKind};
use swarm_rendering::{
    BackendEvent, DrawCommand, FontId, MonospaceMeasure, RecordingBackend, TargetId, TextureId,
};
use swarm_shared::{Vec2, RENDER_SIZE, WINDOW_SIZE};

const DT: f32 = 1.0 / 60.0;

fn assets() -> Assets {
    Assets {
        atlas: TextureId(0),
        font: FontId(0),
        measure: Box::new(MonospaceMeasure::default()),
    }
}

fn input(mouse: Vec2) -> InputSnapshot {
    InputSnapshot {
        dt: DT,
        mouse,
        window_size: WINDOW_SIZE,
        keys: Keys::default(),
    }
}

fn snapshot_world(game: &Game<'_>) -> Vec<(EntityKind, Vec2)> {
    game.pool().iter().map(|e| (e.kind, e.pos)).collect()
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed: u64| {
        let config = GameConfig {
            seed,
            ..GameConfig::default()
        };
        let persistent = Arena::new("persistent");
        let mut game = Game::new(config, &persistent, assets()).unwrap();
        let mut backend = RecordingBackend::default();
        for frame in 0..300u32 {
            let mouse = Vec2::new((frame * 3 % 948) as f32, 100.0);
            game.tick(&input(mouse), &mut backend).unwrap();
            backend.take_events();
        }
        (game.score(), game.phase(), snapshot_world(&game))
    };

    assert_eq!(run(7), run(7));
    assert_ne!(run(7).2, run(8).2);
}

#[test]
fn test_contact_death_ends_run() {
    let mut config = GameConfig::default();
    config.tuning.player_max_health = 1.0;
    // enemies spawn on top of the player
    config.tuning.enemy_spawn_radius = 0;

    let persistent = Arena::new("persistent");
    let mut game = Game::new(config, &persistent, assets()).unwrap();
    let events = game.events();
    let mut backend = RecordingBackend::default();
    // aim at the top-left corner, away from the spawn point
    let aim = input(Vec2::ZERO);

    game.tick(&aim, &mut backend).unwrap();
    assert_eq!(game.phase(), GamePhase::Active);
    assert!(matches!(events.try_recv(), Some(GameEvent::Shot { .. })));

    game.tick(&aim, &mut backend).unwrap();
    assert_eq!(game.phase(), GamePhase::Ended);
    assert_eq!(
        events.try_recv(),
        Some(GameEvent::PlayerHit { health: 0.0 })
    );
    assert!(matches!(
        events.try_recv(),
        Some(GameEvent::GameOver { score: 0, .. })
    ));

    // ended: the world freezes and only the UI reaches the window
    let live = game.pool().live_count();
    let elapsed = game.elapsed();
    backend.take_events();
    game.tick(&aim, &mut backend).unwrap();

    assert_eq!(game.pool().live_count(), live);
    assert_eq!(game.elapsed(), elapsed);
    match backend.events().last() {
        Some(BackendEvent::Composite(blits)) => {
            assert_eq!(blits.len(), 1);
            assert_eq!(blits[0].target, TargetId::Ui);
        }
        other => panic!("expected composite, got {other:?}"),
    }
    assert_eq!(backend.texts()[0], "The end");
    assert_eq!(backend.texts()[1], "Killed squares: 0");
}

#[test]
fn test_world_pass_draws_in_layer_order() {
    let persistent = Arena::new("persistent");
    let mut game = Game::new(GameConfig::default(), &persistent, assets()).unwrap();
    let mut backend = RecordingBackend::default();

    game.tick(&input(Vec2::ZERO), &mut backend).unwrap();

    let world: Vec<&str> = backend
        .events()
        .iter()
        .skip(1)
        .take_while(|e| **e != BackendEvent::EndPass)
        .filter_map(|e| match e {
            BackendEvent::Draw(command, _) => Some(command.name()),
            _ => None,
        })
        .collect();

    // background, enemy fill + outline, projectile, player, cursor
    assert_eq!(
        world,
        ["texture", "quad", "quad_outline", "quad", "quad", "texture"]
    );
}

#[test]
fn test_cursor_follows_the_camera_it_is_drawn_with() {
    let persistent = Arena::new("persistent");
    let mut game = Game::new(GameConfig::default(), &persistent, assets()).unwrap();
    let mut backend = RecordingBackend::default();
    let mouse = WINDOW_SIZE * 0.5;
    let walking = InputSnapshot {
        keys: Keys {
            right: true,
            ..Keys::default()
        },
        ..input(mouse)
    };

    for _ in 0..3 {
        backend.take_events();
        game.tick(&walking, &mut backend).unwrap();
    }

    // the last world-pass command is the cursor sprite
    let cursor = backend
        .events()
        .iter()
        .take_while(|e| **e != BackendEvent::EndPass)
        .filter_map(|e| match e {
            BackendEvent::Draw(DrawCommand::Texture { position, .. }, _) => Some(*position),
            _ => None,
        })
        .last()
        .unwrap();

    assert!(game.camera().target.x > 0.0, "the player should have moved");
    let on_screen = game.camera().world_to_screen(cursor);
    let pointer = virtual_pointer(mouse, WINDOW_SIZE, RENDER_SIZE);
    assert!((on_screen.x - pointer.x).abs() < 1e-3, "{on_screen:?} vs {pointer:?}");
    assert!((on_screen.y - pointer.y).abs() < 1e-3, "{on_screen:?} vs {pointer:?}");
}

#[test]
fn test_invalid_config_is_rejected_before_the_first_tick() {
    let mut config = GameConfig::default();
    config.memory.layer_count = 900;

    let persistent = Arena::new("persistent");
    let err = Game::new(config, &persistent, assets()).err().unwrap();

    assert!(matches!(err, SetupError::Config(_)), "{err}");
}

#[test]
fn test_full_pool_fails_the_frame() {
    let mut config = GameConfig::default();
    // room for the player and the first shot only
    config.memory.pool_capacity = 2;

    let persistent = Arena::new("persistent");
    let mut game = Game::new(config, &persistent, assets()).unwrap();
    let mut backend = RecordingBackend::default();

    let err = game.tick(&input(Vec2::ZERO), &mut backend).unwrap_err();

    assert_eq!(err, FrameError::Core(CoreError::PoolExhausted { capacity: 2 }));
    assert_eq!(game.transient().used(), 0);
    assert!(backend.events().is_empty());
}

#[test]
fn test_transient_arena_resets_every_frame() {
    let persistent = Arena::new("persistent");
    let mut game = Game::new(GameConfig::default(), &persistent, assets()).unwrap();
    let mut backend = RecordingBackend::default();

    let mut peak = 0;
    for _ in 0..120 {
        let stats = game.tick(&input(Vec2::ZERO), &mut backend).unwrap();
        assert_eq!(game.transient().used(), 0);
        peak = peak.max(stats.transient_bytes);
        backend.take_events();
    }

    assert!(peak > 0, "projectile queries should use the frame arena");
    assert_eq!(game.stats().peak_transient_bytes, peak);
    assert_eq!(game.stats().frames_recorded, 120);
}

#[test]
fn test_full_event_queue_does_not_stall_the_game() {
    let mut config = GameConfig::default();
    config.memory.event_capacity = 1;

    let persistent = Arena::new("persistent");
    let mut game = Game::new(config, &persistent, assets()).unwrap();
    let events = game.events();
    let mut backend = RecordingBackend::default();

    for _ in 0..200 {
        game.tick(&input(Vec2::ZERO), &mut backend).unwrap();
        backend.take_events();
    }

    assert_eq!(game.frame_count(), 200);
    assert_eq!(events.pending_count(), 1);
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/swarm.toml");
    let config = GameConfig::from_path(path).unwrap();
    assert_eq!(config, GameConfig::default());
}
