use sky_raider::compute::*;
use sky_raider::config::GameConfig;
use sky_raider::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn cfg() -> GameConfig {
    GameConfig::default()
}

fn make_state() -> GameState {
    init_state(&cfg())
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn enemy_at(x: f32, y: f32, scale: f32) -> Enemy {
    Enemy {
        x,
        y,
        speed: 5.0 / scale,
        scale,
        variant: 0,
        fallback: false,
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = make_state();
    assert_eq!(s.player.x, 160.0);
    assert_eq!(s.player.y, 500.0);
    assert_eq!(s.player.width, 80.0);
    assert_eq!(s.player.height, 80.0);
}

#[test]
fn init_state_empty_collections() {
    let s = make_state();
    assert!(s.enemies.is_empty());
    assert!(s.bullets.is_empty());
    assert!(s.wingmen.is_empty());
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Running);
}

#[test]
fn init_state_economy_defaults() {
    let s = make_state();
    assert_eq!(s.economy.score, 0);
    assert_eq!(s.economy.currency, 0);
    assert_eq!(s.economy.fire_rate_level, 1);
    assert_eq!(s.economy.bullet_interval_ms, 300);
    assert_eq!(s.economy.shield_count, 0);
    assert!(!s.economy.has_wingmen);
    assert_eq!(s.spawn.interval_ms, 1000.0);
    assert_eq!(s.spawn.next_threshold, 260);
}

// ── Player input ──────────────────────────────────────────────────────────────

#[test]
fn set_position_is_unclamped() {
    let s = make_state();
    let s2 = set_player_position(&s, -50.0, 900.0);
    assert_eq!(s2.player.x, -50.0);
    assert_eq!(s2.player.y, 900.0);
}

#[test]
fn nudge_moves_by_delta() {
    let s = make_state();
    let s2 = nudge_player(&s, 12.0, -12.0);
    assert_eq!(s2.player.x, 172.0);
    assert_eq!(s2.player.y, 488.0);
}

#[test]
fn nudge_clamps_at_left_and_top() {
    let s = set_player_position(&make_state(), 5.0, 3.0);
    let s2 = nudge_player(&s, -12.0, -12.0);
    assert_eq!(s2.player.x, 0.0);
    assert_eq!(s2.player.y, 0.0);
}

#[test]
fn nudge_clamps_at_right_and_bottom() {
    let s = set_player_position(&make_state(), 310.0, 550.0);
    let s2 = nudge_player(&s, 12.0, 12.0);
    assert_eq!(s2.player.x, 320.0); // 400 - 80
    assert_eq!(s2.player.y, 560.0); // 640 - 80
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _s2 = nudge_player(&s, 12.0, 0.0);
    let _s3 = set_player_position(&s, 0.0, 0.0);
    assert_eq!(s.player.x, 160.0);
}

// ── Spawner ───────────────────────────────────────────────────────────────────

#[test]
fn spawned_enemies_respect_ranges() {
    let config = cfg();
    let mut rng = seeded_rng();
    let mut s = make_state();
    for _ in 0..200 {
        s = spawn_enemy(&s, &config, &mut rng, |_| true);
    }
    assert_eq!(s.enemies.len(), 200);
    for e in &s.enemies {
        assert!(e.x >= 0.0 && e.x < 400.0, "x out of range: {}", e.x);
        assert_eq!(e.y, -30.0);
        assert!(e.scale >= 1.0 && e.scale < 3.0, "scale out of range: {}", e.scale);
        assert!((e.speed * e.scale - 5.0).abs() < 1e-4);
        assert!(e.variant < 7);
        assert!(!e.fallback);
    }
}

#[test]
fn smaller_enemies_are_faster() {
    let config = cfg();
    let mut rng = seeded_rng();
    let mut s = make_state();
    for _ in 0..20 {
        s = spawn_enemy(&s, &config, &mut rng, |_| true);
    }
    let mut sorted = s.enemies.clone();
    sorted.sort_by(|a, b| a.scale.partial_cmp(&b.scale).unwrap());
    for pair in sorted.windows(2) {
        assert!(pair[0].speed >= pair[1].speed);
    }
}

#[test]
fn spawn_flags_missing_sprites_for_fallback() {
    let config = cfg();
    let mut rng = seeded_rng();
    let mut s = make_state();
    for _ in 0..100 {
        s = spawn_enemy(&s, &config, &mut rng, |variant| variant != 0);
    }
    for e in &s.enemies {
        assert_eq!(e.fallback, e.variant == 0);
    }
}

#[test]
fn spawn_is_noop_while_paused() {
    let s = open_menu(&make_state());
    let s2 = spawn_enemy(&s, &cfg(), &mut seeded_rng(), |_| true);
    assert!(s2.enemies.is_empty());
}

#[test]
fn spawn_accelerates_when_threshold_reached() {
    let mut s = make_state();
    s.economy.score = 260;
    let s2 = accelerate_spawn(&s, &cfg());
    assert!((s2.spawn.interval_ms - 850.0).abs() < 1e-9);
    assert_eq!(s2.spawn.next_threshold, 520);
}

#[test]
fn spawn_does_not_accelerate_below_threshold() {
    let mut s = make_state();
    s.economy.score = 250;
    let s2 = accelerate_spawn(&s, &cfg());
    assert_eq!(s2.spawn, s.spawn);
}

#[test]
fn spawn_acceleration_floors_and_then_stops() {
    let config = cfg();
    let mut s = make_state();
    s.economy.score = 10_000;
    s.spawn.interval_ms = 200.0;
    s.spawn.next_threshold = 1_000;

    let s2 = accelerate_spawn(&s, &config);
    assert_eq!(s2.spawn.interval_ms, 180.0);
    assert_eq!(s2.spawn.next_threshold, 1_260);

    // At the floor nothing moves, not even the threshold.
    let s3 = accelerate_spawn(&s2, &config);
    assert_eq!(s3.spawn, s2.spawn);
}

#[test]
fn fixed_spawn_variant_never_accelerates() {
    let config = GameConfig {
        adaptive_spawn: false,
        ..cfg()
    };
    let mut s = make_state();
    s.economy.score = 5_000;
    let s2 = accelerate_spawn(&s, &config);
    assert_eq!(s2.spawn.interval_ms, 1000.0);
}

// ── Weapons ───────────────────────────────────────────────────────────────────

#[test]
fn volley_fires_from_player_centre() {
    let s = fire_volley(&make_state(), &cfg());
    assert_eq!(s.bullets, vec![Bullet { x: 198.0, y: 500.0 }]);
}

#[test]
fn volley_includes_wingmen_when_unlocked() {
    let mut s = make_state();
    s.economy.has_wingmen = true;
    s.wingmen = vec![Wingman { offset_x: -50.0 }, Wingman { offset_x: 50.0 }];
    let s2 = fire_volley(&s, &cfg());
    assert_eq!(
        s2.bullets,
        vec![
            Bullet { x: 198.0, y: 500.0 },
            Bullet { x: 148.0, y: 510.0 },
            Bullet { x: 248.0, y: 510.0 },
        ]
    );
}

#[test]
fn volley_is_noop_while_paused() {
    let s = open_menu(&make_state());
    let s2 = fire_volley(&s, &cfg());
    assert!(s2.bullets.is_empty());
}

// ── Movement & pruning ────────────────────────────────────────────────────────

#[test]
fn bullets_move_up_and_leave_at_top() {
    let mut s = make_state();
    s.bullets = vec![
        Bullet { x: 10.0, y: 100.0 },
        Bullet { x: 20.0, y: 6.0 }, // lands exactly on 0 → kept
        Bullet { x: 30.0, y: 5.0 }, // goes to -1 → pruned
    ];
    let s2 = advance_entities(&s, &cfg());
    assert_eq!(
        s2.bullets,
        vec![Bullet { x: 10.0, y: 94.0 }, Bullet { x: 20.0, y: 0.0 }]
    );
}

#[test]
fn enemies_fall_by_their_speed_and_leave_at_bottom() {
    let mut s = make_state();
    s.enemies = vec![enemy_at(50.0, 100.0, 2.0), enemy_at(60.0, 639.0, 1.0)];
    let s2 = advance_entities(&s, &cfg());
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].y, 102.5);
}

// ── Collision: bullets ↔ enemies ──────────────────────────────────────────────

#[test]
fn bullet_hit_removes_both_and_rewards() {
    let mut s = make_state();
    s.bullets = vec![Bullet { x: 100.0, y: 50.0 }];
    s.enemies = vec![enemy_at(98.0, 48.0, 1.0)];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert!(s2.bullets.is_empty());
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.economy.score, 10);
    assert_eq!(s2.economy.currency, 10);
    assert_eq!(report.kills, 1);
    assert!(report.hud_changed());
}

#[test]
fn bullet_miss_changes_nothing() {
    let mut s = make_state();
    s.bullets = vec![Bullet { x: 200.0, y: 50.0 }];
    s.enemies = vec![enemy_at(98.0, 48.0, 1.0)];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.economy.score, 0);
    assert_eq!(report, FrameReport::default());
}

#[test]
fn touching_edges_do_not_collide() {
    let mut s = make_state();
    // Enemy spans x 98..128; a bullet starting at 128 only touches it.
    s.bullets = vec![Bullet { x: 128.0, y: 50.0 }];
    s.enemies = vec![enemy_at(98.0, 48.0, 1.0)];
    let (s2, _) = resolve_collisions(&s, &cfg());
    assert_eq!(s2.enemies.len(), 1);
}

#[test]
fn enemy_hitbox_grows_with_scale() {
    let mut s = make_state();
    // Scale 2 → 60px box spanning x 98..158.
    s.bullets = vec![Bullet { x: 150.0, y: 100.0 }];
    s.enemies = vec![enemy_at(98.0, 48.0, 2.0)];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert_eq!(report.kills, 1);
    assert!(s2.enemies.is_empty());
}

#[test]
fn one_bullet_kills_only_one_enemy() {
    let mut s = make_state();
    s.bullets = vec![Bullet { x: 100.0, y: 50.0 }];
    s.enemies = vec![enemy_at(98.0, 48.0, 1.0), enemy_at(90.0, 45.0, 1.0)];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert_eq!(report.kills, 1);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].x, 90.0);
    assert_eq!(s2.economy.score, 10);
}

#[test]
fn one_enemy_is_credited_once() {
    let mut s = make_state();
    s.bullets = vec![Bullet { x: 100.0, y: 50.0 }, Bullet { x: 110.0, y: 50.0 }];
    s.enemies = vec![enemy_at(98.0, 48.0, 1.0)];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert_eq!(report.kills, 1);
    assert_eq!(s2.bullets, vec![Bullet { x: 110.0, y: 50.0 }]);
    assert_eq!(s2.economy.currency, 10);
}

#[test]
fn separate_pairs_all_score() {
    let mut s = make_state();
    s.bullets = vec![Bullet { x: 20.0, y: 20.0 }, Bullet { x: 300.0, y: 20.0 }];
    s.enemies = vec![enemy_at(10.0, 10.0, 1.0), enemy_at(290.0, 10.0, 1.0)];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert_eq!(report.kills, 2);
    assert!(s2.bullets.is_empty() && s2.enemies.is_empty());
    assert_eq!(s2.economy.score, 20);
    assert_eq!(s2.economy.currency, 20);
}

// ── Collision: player ↔ enemies ───────────────────────────────────────────────

#[test]
fn unshielded_hit_defeats_and_keeps_enemies() {
    let mut s = make_state();
    s.enemies = vec![enemy_at(170.0, 510.0, 1.0)];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert!(report.defeated);
    assert_eq!(s2.status, GameStatus::Paused(PauseReason::Defeated));
    assert_eq!(s2.enemies, s.enemies);
}

#[test]
fn shield_absorbs_hit_and_removes_only_that_enemy() {
    let mut s = make_state();
    s.economy.shield_count = 2;
    s.enemies = vec![enemy_at(170.0, 510.0, 1.0), enemy_at(10.0, 10.0, 1.0)];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert!(!report.defeated);
    assert_eq!(report.shields_used, 1);
    assert_eq!(s2.economy.shield_count, 1);
    assert_eq!(s2.enemies, vec![enemy_at(10.0, 10.0, 1.0)]);
    assert_eq!(s2.status, GameStatus::Running);
}

#[test]
fn shield_runs_out_mid_pass() {
    let mut s = make_state();
    s.economy.shield_count = 1;
    s.enemies = vec![enemy_at(170.0, 510.0, 1.0), enemy_at(200.0, 520.0, 1.0)];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert_eq!(report.shields_used, 1);
    assert!(report.defeated);
    assert_eq!(s2.economy.shield_count, 0);
    assert_eq!(s2.enemies, vec![enemy_at(200.0, 520.0, 1.0)]);
    assert_eq!(s2.status, GameStatus::Paused(PauseReason::Defeated));
}

#[test]
fn killed_enemy_cannot_hit_player() {
    let mut s = make_state();
    s.enemies = vec![enemy_at(170.0, 510.0, 1.0)];
    s.bullets = vec![Bullet { x: 180.0, y: 520.0 }];
    let (s2, report) = resolve_collisions(&s, &cfg());
    assert_eq!(report.kills, 1);
    assert!(!report.defeated);
    assert_eq!(s2.status, GameStatus::Running);
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_moves_then_collides() {
    let mut s = make_state();
    s.frame = 5;
    s.bullets = vec![Bullet { x: 100.0, y: 56.0 }]; // → y 50
    s.enemies = vec![enemy_at(98.0, 43.0, 1.0)]; // → y 48
    let (s2, report) = tick(&s, &cfg());
    assert_eq!(s2.frame, 6);
    assert_eq!(report.kills, 1);
    assert_eq!(s2.economy.score, 10);
}

#[test]
fn tick_does_nothing_while_paused() {
    let mut s = make_state();
    s.bullets = vec![Bullet { x: 100.0, y: 300.0 }];
    s.enemies = vec![enemy_at(50.0, 50.0, 1.0)];
    let paused = open_menu(&s);
    let (s2, report) = tick(&paused, &cfg());
    assert_eq!(s2.frame, 0);
    assert_eq!(s2.bullets, paused.bullets);
    assert_eq!(s2.enemies, paused.enemies);
    assert_eq!(report, FrameReport::default());
}

// ── Run control ───────────────────────────────────────────────────────────────

#[test]
fn menu_pauses_and_resume_continues() {
    let s = open_menu(&make_state());
    assert_eq!(s.status, GameStatus::Paused(PauseReason::Menu));
    let s2 = resume_game(&s);
    assert_eq!(s2.status, GameStatus::Running);
}

#[test]
fn defeat_cannot_be_resumed_or_masked_by_menu() {
    let mut s = make_state();
    s.status = GameStatus::Paused(PauseReason::Defeated);
    assert_eq!(resume_game(&s).status, s.status);
    assert_eq!(open_menu(&s).status, s.status);
}
