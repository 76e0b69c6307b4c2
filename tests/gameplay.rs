use std::time::{Duration, Instant};

use galactatec::game::arena::Arena;
use galactatec::game::entity::{Directions, Enemy, PlayerSlot, Projectile, Rect, Ship, SHIP_SPEED};
use galactatec::game::session::{GameSession, PowerUp, SCORE_PER_KILL};
use galactatec::game::sprite::{Sprite, SHIP_SIZE};

const WORLD: Rect = Rect::new(0.0, 0.0, 900.0, 700.0);

fn arena_with_ship(cx: f32, cy: f32) -> Arena {
    let mut arena = Arena::new(WORLD);
    arena.add_ship(Ship::new(cx, cy, SHIP_SPEED, PlayerSlot::One, Sprite::placeholder()));
    arena
}

fn ship_rect(arena: &Arena) -> Rect {
    arena.ships().values().next().unwrap().rect
}

fn all_directions() -> Vec<Directions> {
    (0..16u8)
        .map(|bits| Directions {
            left: bits & 1 != 0,
            right: bits & 2 != 0,
            up: bits & 4 != 0,
            down: bits & 8 != 0,
        })
        .collect()
}

// ── Movement ───────────────────────────────────────────────────────

#[test]
fn holding_left_moves_six_pixels_per_frame() {
    let mut arena = arena_with_ship(450.0, 350.0);
    let left = Directions { left: true, ..Directions::NONE };
    let t0 = Instant::now();
    for i in 0..10 {
        arena.update(left, t0 + Duration::from_millis(16 * i));
    }
    let r = ship_rect(&arena);
    assert_eq!(r.center_x(), 390.0);
    assert_eq!(r.center_y(), 350.0);
}

#[test]
fn ship_never_leaves_the_field() {
    let half = SHIP_SIZE as f32 / 2.0;
    let corners = [
        (half, half),
        (WORLD.w - half, half),
        (half, WORLD.h - half),
        (WORLD.w - half, WORLD.h - half),
        (half + 2.0, WORLD.h / 2.0),
    ];
    let t0 = Instant::now();
    for (cx, cy) in corners {
        for dirs in all_directions() {
            let mut arena = arena_with_ship(cx, cy);
            for i in 0..20 {
                arena.update(dirs, t0 + Duration::from_millis(16 * i));
                assert!(WORLD.contains(&ship_rect(&arena)), "{:?} from ({}, {})", dirs, cx, cy);
            }
        }
    }
}

// ── Projectiles ────────────────────────────────────────────────────

#[test]
fn projectile_is_removed_once_fully_above_the_top() {
    let mut arena = Arena::new(WORLD);
    // Bottom edge starts at y = 46; after 4 frames it is at -2.
    arena.add_projectile(Projectile::new(100.0, 40.0, -12.0, PlayerSlot::One));
    let t0 = Instant::now();
    for _ in 0..3 {
        arena.update(Directions::NONE, t0);
        assert_eq!(arena.projectiles().len(), 1);
    }
    arena.update(Directions::NONE, t0);
    assert!(arena.projectiles().is_empty());
}

#[test]
fn fired_projectile_leaves_from_the_ship_nose() {
    let mut arena = arena_with_ship(450.0, 490.0);
    let ship = arena.ships().iter().next().map(|(id, _)| id).unwrap();
    let shot = arena.fire_from(ship).unwrap();
    let p = arena.projectiles().get(shot).unwrap();
    assert_eq!(p.rect.center_x(), 450.0);
    assert_eq!(p.rect.center_y(), ship_rect(&arena).top());
    assert_eq!(p.owner, PlayerSlot::One);
}

#[test]
fn two_projectiles_on_one_enemy_score_once() {
    let mut arena = Arena::new(WORLD);
    arena.add_enemy(Enemy::stationary(200.0, 200.0));
    let first = arena.add_projectile(Projectile::new(195.0, 230.0, -12.0, PlayerSlot::One));
    let second = arena.add_projectile(Projectile::new(205.0, 230.0, -12.0, PlayerSlot::Two));

    let report = arena.update(Directions::NONE, Instant::now());
    assert_eq!(report.kills.len(), 1);
    assert_eq!(report.kills[0].projectile, first);
    assert_eq!(report.kills[0].owner, PlayerSlot::One);
    assert!(arena.enemies().is_empty());
    // The other shot flies on.
    assert!(arena.projectiles().contains(second));
}

// ── Scoring ────────────────────────────────────────────────────────

#[test]
fn each_kill_is_worth_a_hundred_points() {
    let mut arena = Arena::new(WORLD);
    let mut session = GameSession::new("NOVA", "ORION", Default::default());
    let n = 7;
    for i in 0..n {
        let x = 60.0 + 100.0 * i as f32;
        arena.add_enemy(Enemy::stationary(x, 150.0));
        arena.add_projectile(Projectile::new(x, 175.0, -12.0, PlayerSlot::One));
    }
    let report = arena.update(Directions::NONE, Instant::now());
    for kill in &report.kills {
        session.player_mut(kill.owner).record_kill();
    }
    assert_eq!(session.players[0].score, SCORE_PER_KILL * n);
    assert_eq!(session.players[1].score, 0);
}

#[test]
fn tenth_kill_grants_a_power_up() {
    let mut session = GameSession::new("NOVA", "ORION", Default::default());
    let player = session.active_mut();
    let earned: Vec<_> = (0..10).filter_map(|_| player.record_kill()).collect();
    assert_eq!(earned, vec![PowerUp::Shield]);
    assert!(player.power_ups.contains(&PowerUp::Shield));
}
