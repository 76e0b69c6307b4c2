//! The battlefield: live ships, projectiles and enemies, per-frame physics
//! and collision resolution.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::time::Instant;

use super::canvas::DotCanvas;
use super::entity::{
    Body, Directions, Enemy, FrameContext, PlayerSlot, Projectile, Rect, Ship, PROJECTILE_SPEED,
};
use crate::audio::SoundCue;

/// Stable handle into a `Pool<T>`. Never reused within one pool.
pub struct Id<T> {
    raw: u32,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    fn new(raw: u32) -> Self {
        Self { raw, _kind: PhantomData }
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Id<T> {}
impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl<T> Eq for Id<T> {}
impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}
impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.raw)
    }
}

/// Insertion-ordered collection with stable ids.
pub struct Pool<T> {
    next: u32,
    items: Vec<(Id<T>, T)>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { next: 0, items: Vec::new() }
    }
}

impl<T> Pool<T> {
    pub fn insert(&mut self, item: T) -> Id<T> {
        let id = Id::new(self.next);
        self.next += 1;
        self.items.push((id, item));
        id
    }

    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.items.iter().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    pub fn contains(&self, id: Id<T>) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.items.iter().map(|(i, t)| (*i, t))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn remove_ids(&mut self, ids: &[Id<T>]) {
        if !ids.is_empty() {
            self.items.retain(|(i, _)| !ids.contains(i));
        }
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = (Id<T>, &mut T)> {
        self.items.iter_mut().map(|(i, t)| (*i, t))
    }
}

/// A projectile that destroyed an enemy this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill {
    pub owner: PlayerSlot,
    pub enemy: Id<Enemy>,
    pub projectile: Id<Projectile>,
}

/// An enemy that rammed a ship this frame. The enemy is gone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub ship: Id<Ship>,
    pub owner: PlayerSlot,
    pub damage: f32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameReport {
    pub kills: Vec<Kill>,
    pub hits: Vec<Hit>,
    pub cues: Vec<SoundCue>,
    /// Enemies that left through the bottom edge.
    pub escaped: usize,
}

pub struct Arena {
    bounds: Rect,
    ships: Pool<Ship>,
    projectiles: Pool<Projectile>,
    enemies: Pool<Enemy>,
}

impl Arena {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ships: Pool::default(),
            projectiles: Pool::default(),
            enemies: Pool::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn ships(&self) -> &Pool<Ship> {
        &self.ships
    }

    pub fn projectiles(&self) -> &Pool<Projectile> {
        &self.projectiles
    }

    pub fn enemies(&self) -> &Pool<Enemy> {
        &self.enemies
    }

    pub fn add_ship(&mut self, ship: Ship) -> Id<Ship> {
        self.ships.insert(ship)
    }

    pub fn add_enemy(&mut self, enemy: Enemy) -> Id<Enemy> {
        self.enemies.insert(enemy)
    }

    pub fn add_projectile(&mut self, projectile: Projectile) -> Id<Projectile> {
        self.projectiles.insert(projectile)
    }

    /// Spawn one projectile at the ship's muzzle. No rate limit here.
    pub fn fire_from(&mut self, ship: Id<Ship>) -> Option<Id<Projectile>> {
        let ship = self.ships.get(ship)?;
        let (x, y) = ship.muzzle();
        let owner = ship.owner;
        Some(self.projectiles.insert(Projectile::new(x, y, PROJECTILE_SPEED, owner)))
    }

    /// Drop projectiles and enemies, keep ships.
    pub fn clear_hostiles(&mut self) {
        self.projectiles.clear();
        self.enemies.clear();
    }

    pub fn remove_ships(&mut self) {
        self.ships.clear();
    }

    /// One frame: move everything, despawn what left the field, then
    /// resolve collisions.
    pub fn update(&mut self, directions: Directions, now: Instant) -> FrameReport {
        let mut report = FrameReport::default();
        let frame = FrameContext {
            directions,
            bounds: self.bounds,
            now,
            target_x: self.ships.values().next().map(|s| s.rect.center_x()),
        };

        for (_, ship) in self.ships.iter_mut() {
            if let Some(cue) = ship.on_update(&frame).cue {
                report.cues.push(cue);
            }
        }

        let mut gone = Vec::new();
        for (id, p) in self.projectiles.iter_mut() {
            if p.on_update(&frame).despawn {
                gone.push(id);
            }
        }
        self.projectiles.remove_ids(&gone);

        let mut gone = Vec::new();
        for (id, e) in self.enemies.iter_mut() {
            if e.on_update(&frame).despawn {
                gone.push(id);
            }
        }
        report.escaped = gone.len();
        self.enemies.remove_ids(&gone);

        self.resolve_projectile_hits(&mut report);
        self.resolve_rams(&mut report);
        report
    }

    /// Projectiles in insertion order each claim the first intersecting
    /// enemy (also insertion order) that no earlier projectile claimed.
    fn resolve_projectile_hits(&mut self, report: &mut FrameReport) {
        let mut dead_enemies: Vec<Id<Enemy>> = Vec::new();
        let mut spent: Vec<Id<Projectile>> = Vec::new();
        for (pid, p) in self.projectiles.iter() {
            let hit = self
                .enemies
                .iter()
                .find(|(eid, e)| !dead_enemies.contains(eid) && p.rect.intersects(&e.rect));
            if let Some((eid, _)) = hit {
                dead_enemies.push(eid);
                spent.push(pid);
                report.kills.push(Kill { owner: p.owner, enemy: eid, projectile: pid });
            }
        }
        self.enemies.remove_ids(&dead_enemies);
        self.projectiles.remove_ids(&spent);
    }

    fn resolve_rams(&mut self, report: &mut FrameReport) {
        let mut rammed: Vec<Id<Enemy>> = Vec::new();
        for (sid, ship) in self.ships.iter() {
            for (eid, e) in self.enemies.iter() {
                if !rammed.contains(&eid) && ship.rect.intersects(&e.rect) {
                    rammed.push(eid);
                    report.hits.push(Hit { ship: sid, owner: ship.owner, damage: e.damage });
                }
            }
        }
        self.enemies.remove_ids(&rammed);
    }

    pub fn draw(&self, canvas: &mut DotCanvas) {
        for e in self.enemies.values() {
            e.on_draw(canvas);
        }
        for p in self.projectiles.values() {
            p.on_draw(canvas);
        }
        for s in self.ships.values() {
            s.on_draw(canvas);
        }
    }
}
