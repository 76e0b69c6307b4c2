use std::time::{Duration, Instant};

use ratatui::style::Color;

use super::canvas::DotCanvas;
use super::sprite::{Sprite, SHIP_SIZE};
use crate::audio::SoundCue;

pub const PROJECTILE_WIDTH: f32 = 4.0;
pub const PROJECTILE_HEIGHT: f32 = 12.0;
pub const PROJECTILE_SPEED: f32 = -12.0;
pub const SHIP_SPEED: f32 = 6.0;
pub const ENEMY_WIDTH: f32 = 40.0;
pub const ENEMY_HEIGHT: f32 = 28.0;
const MOVE_SOUND_COOLDOWN: Duration = Duration::from_millis(100);
const SWAY_AMPLITUDE: f32 = 60.0;
const SWAY_RATE: f32 = 0.05;

/// Axis-aligned rectangle in logical pixels, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn left(&self) -> f32 {
        self.x
    }
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
    pub fn top(&self) -> f32 {
        self.y
    }
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Overlap with positive area; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Move inside `bounds`. A rectangle larger than `bounds` is pinned to
    /// its top-left corner.
    pub fn clamp_inside(&mut self, bounds: &Rect) {
        if self.w >= bounds.w {
            self.x = bounds.x;
        } else {
            self.x = self.x.clamp(bounds.left(), bounds.right() - self.w);
        }
        if self.h >= bounds.h {
            self.y = bounds.y;
        } else {
            self.y = self.y.clamp(bounds.top(), bounds.bottom() - self.h);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Directions {
    pub const NONE: Directions = Directions { left: false, right: false, up: false, down: false };

    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    pub fn or(self, other: Directions) -> Directions {
        Directions {
            left: self.left || other.left,
            right: self.right || other.right,
            up: self.up || other.up,
            down: self.down || other.down,
        }
    }
}

/// Logical player owning a ship or a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// Everything an entity may read during its update. Built once per frame
/// before any entity moves, so no update depends on another's result.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub directions: Directions,
    pub bounds: Rect,
    pub now: Instant,
    /// Horizontal centre of the primary ship, for homing enemies.
    pub target_x: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step {
    pub despawn: bool,
    pub cue: Option<SoundCue>,
}

impl Step {
    const KEEP: Step = Step { despawn: false, cue: None };
    const DESPAWN: Step = Step { despawn: true, cue: None };
}

/// Capabilities shared by every entity kind.
pub trait Body {
    fn bounding_box(&self) -> Rect;
    fn on_update(&mut self, frame: &FrameContext) -> Step;
    fn on_draw(&self, canvas: &mut DotCanvas);
}

// ── Ship ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Ship {
    pub rect: Rect,
    pub owner: PlayerSlot,
    pub speed: f32,
    pub sprite: Sprite,
    last_move_sound: Option<Instant>,
}

impl Ship {
    pub fn new(cx: f32, cy: f32, speed: f32, owner: PlayerSlot, sprite: Sprite) -> Self {
        let size = SHIP_SIZE as f32;
        Self {
            rect: Rect::from_center(cx, cy, size, size),
            owner,
            speed,
            sprite,
            last_move_sound: None,
        }
    }

    /// Where projectiles leave the ship.
    pub fn muzzle(&self) -> (f32, f32) {
        (self.rect.center_x(), self.rect.top())
    }

    fn move_sound_ready(&mut self, now: Instant) -> bool {
        let ready = self
            .last_move_sound
            .map_or(true, |t| now.saturating_duration_since(t) >= MOVE_SOUND_COOLDOWN);
        if ready {
            self.last_move_sound = Some(now);
        }
        ready
    }
}

impl Body for Ship {
    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn on_update(&mut self, frame: &FrameContext) -> Step {
        let d = frame.directions;
        let b = frame.bounds;
        let mut moved = false;
        if d.left && self.rect.left() > b.left() {
            self.rect.x -= self.speed;
            moved = true;
        }
        if d.right && self.rect.right() < b.right() {
            self.rect.x += self.speed;
            moved = true;
        }
        if d.up && self.rect.top() > b.top() {
            self.rect.y -= self.speed;
            moved = true;
        }
        if d.down && self.rect.bottom() < b.bottom() {
            self.rect.y += self.speed;
            moved = true;
        }
        self.rect.clamp_inside(&b);

        if moved && self.move_sound_ready(frame.now) {
            Step { despawn: false, cue: Some(SoundCue::Move) }
        } else {
            Step::KEEP
        }
    }

    fn on_draw(&self, canvas: &mut DotCanvas) {
        for layer in &self.sprite.layers {
            canvas.blit_mask(self.rect, &layer.mask, layer.color);
        }
    }
}

// ── Projectile ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub rect: Rect,
    /// Vertical velocity in pixels per tick; negative is upwards.
    pub vy: f32,
    pub owner: PlayerSlot,
}

impl Projectile {
    /// Centred on the muzzle point.
    pub fn new(x: f32, y: f32, vy: f32, owner: PlayerSlot) -> Self {
        Self {
            rect: Rect::from_center(x, y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            vy,
            owner,
        }
    }
}

impl Body for Projectile {
    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn on_update(&mut self, frame: &FrameContext) -> Step {
        self.rect.y += self.vy;
        if self.rect.bottom() < frame.bounds.top() || self.rect.top() > frame.bounds.bottom() {
            Step::DESPAWN
        } else {
            Step::KEEP
        }
    }

    fn on_draw(&self, canvas: &mut DotCanvas) {
        canvas.fill_rect(self.rect, Color::Rgb(255, 255, 0), true);
    }
}

// ── Enemy ───────────────────────────────────────────────────────────

/// Movement pattern, selected by difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Never moves. Used for hand-placed targets.
    Static,
    /// Straight down.
    Descend,
    /// Down while swaying around the spawn column.
    Sway,
    /// Sway around a column that drifts towards the player's ship.
    Homing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub color: Color,
    pub pattern: Pattern,
    /// Pixels per tick, vertical.
    pub speed: f32,
    /// Hull points removed from a ship on contact.
    pub damage: f32,
    anchor_x: f32,
    age: u32,
}

impl Enemy {
    pub fn new(cx: f32, cy: f32, pattern: Pattern, speed: f32, damage: f32) -> Self {
        Self {
            rect: Rect::from_center(cx, cy, ENEMY_WIDTH, ENEMY_HEIGHT),
            color: Color::Rgb(220, 60, 60),
            pattern,
            speed,
            damage,
            anchor_x: cx,
            age: 0,
        }
    }

    /// A motionless target.
    pub fn stationary(cx: f32, cy: f32) -> Self {
        Self::new(cx, cy, Pattern::Static, 0.0, 0.0)
    }

    fn sway_offset(&self) -> f32 {
        (self.age as f32 * SWAY_RATE).sin() * SWAY_AMPLITUDE
    }
}

impl Body for Enemy {
    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn on_update(&mut self, frame: &FrameContext) -> Step {
        if self.pattern == Pattern::Static {
            return Step::KEEP;
        }
        self.age = self.age.wrapping_add(1);
        self.rect.y += self.speed;

        if self.pattern == Pattern::Homing {
            if let Some(tx) = frame.target_x {
                let drift = self.speed * 0.5;
                self.anchor_x += (tx - self.anchor_x).clamp(-drift, drift);
            }
        }
        if matches!(self.pattern, Pattern::Sway | Pattern::Homing) {
            let cx = self.anchor_x + self.sway_offset();
            let half = self.rect.w / 2.0;
            let lo = frame.bounds.left() + half;
            let hi = (frame.bounds.right() - half).max(lo);
            self.rect.x = cx.clamp(lo, hi) - half;
        }

        if self.rect.top() > frame.bounds.bottom() {
            Step::DESPAWN
        } else {
            Step::KEEP
        }
    }

    fn on_draw(&self, canvas: &mut DotCanvas) {
        canvas.fill_rect(self.rect, self.color, false);
    }
}
