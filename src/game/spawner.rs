use rand::Rng;

use super::difficulty::Difficulty;
use super::entity::{Enemy, Rect, ENEMY_HEIGHT, ENEMY_WIDTH};

/// Upper bound on live enemies; the spawner skips its turn above it.
pub const MAX_ENEMIES: usize = 12;

/// Drops one enemy just above the arena every `interval` ticks.
#[derive(Debug, Clone)]
pub struct Spawner {
    difficulty: Difficulty,
    interval: u64,
    ticks: u64,
}

impl Spawner {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            interval: difficulty.spawn_interval(),
            ticks: 0,
        }
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: Rect, live: usize) -> Option<Enemy> {
        self.ticks += 1;
        if self.ticks < self.interval {
            return None;
        }
        self.ticks = 0;
        if live >= MAX_ENEMIES || bounds.w < ENEMY_WIDTH {
            return None;
        }
        let half = ENEMY_WIDTH / 2.0;
        let cx = rng.gen_range(bounds.left() + half..=bounds.right() - half);
        let cy = bounds.top() - ENEMY_HEIGHT / 2.0;
        Some(Enemy::new(
            cx,
            cy,
            self.difficulty.pattern(),
            self.difficulty.enemy_speed(),
            self.difficulty.contact_damage(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 900.0, 700.0);

    #[test]
    fn spawns_once_per_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut s = Spawner::new(Difficulty::Normal);
        let spawned = (0..180).filter_map(|_| s.tick(&mut rng, BOUNDS, 0)).count();
        assert_eq!(spawned, 3);
    }

    #[test]
    fn spawned_enemy_carries_tier_stats() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut s = Spawner::new(Difficulty::Hard);
        let e = (0..40).find_map(|_| s.tick(&mut rng, BOUNDS, 0)).unwrap();
        assert_eq!(e.pattern, Difficulty::Hard.pattern());
        assert_eq!(e.speed, Difficulty::Hard.enemy_speed());
        assert_eq!(e.damage, Difficulty::Hard.contact_damage());
        assert!(e.rect.left() >= 0.0 && e.rect.right() <= 900.0);
        assert!(e.rect.bottom() <= 0.0);
    }

    #[test]
    fn full_arena_skips_spawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut s = Spawner::new(Difficulty::Hard);
        let spawned = (0..400).filter_map(|_| s.tick(&mut rng, BOUNDS, MAX_ENEMIES)).count();
        assert_eq!(spawned, 0);
    }
}
