use std::collections::BTreeSet;
use std::path::PathBuf;

use super::difficulty::Difficulty;
use super::entity::PlayerSlot;

pub const MAX_LIVES: u8 = 3;
pub const HULL_PER_LIFE: f32 = 100.0;
pub const SCORE_PER_KILL: u32 = 100;
/// Kills between power-up awards.
pub const KILLS_PER_POWER_UP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PowerUp {
    Shield,
    RapidFire,
}

impl PowerUp {
    pub fn all() -> &'static [PowerUp] {
        &[PowerUp::Shield, PowerUp::RapidFire]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerUp::Shield => "SHIELD",
            PowerUp::RapidFire => "RAPID",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalPlayer {
    pub name: String,
    pub score: u32,
    lives: u8,
    pub hull: f32,
    pub kills: u32,
    pub power_ups: BTreeSet<PowerUp>,
    pub active: bool,
}

impl LogicalPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            lives: MAX_LIVES,
            hull: HULL_PER_LIFE,
            kills: 0,
            power_ups: BTreeSet::new(),
            active: false,
        }
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_out(&self) -> bool {
        self.lives == 0
    }

    /// Returns the power-up earned by this kill, if any.
    pub fn record_kill(&mut self) -> Option<PowerUp> {
        self.score += SCORE_PER_KILL;
        self.kills += 1;
        if self.kills % KILLS_PER_POWER_UP != 0 {
            return None;
        }
        let next = PowerUp::all().iter().copied().find(|p| !self.power_ups.contains(p))?;
        self.power_ups.insert(next);
        Some(next)
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.hull = HULL_PER_LIFE;
    }

    /// Apply contact damage. A held shield absorbs the whole hit and is
    /// used up. Returns true when the hit cost a life.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.power_ups.remove(&PowerUp::Shield) {
            return false;
        }
        self.hull -= amount;
        if self.hull <= 0.0 {
            self.lose_life();
            true
        } else {
            false
        }
    }
}

/// Device feeding the engine's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputBinding {
    KeyboardOnly,
    /// Keyboard plus the first enumerated joystick.
    KeyboardAndPad { name: String },
}

#[derive(Debug, Clone)]
pub struct GameSession {
    pub players: [LogicalPlayer; 2],
    active: PlayerSlot,
    pub difficulty: Difficulty,
    pub track: Option<PathBuf>,
    pub binding: InputBinding,
}

impl GameSession {
    pub fn new(p1: impl Into<String>, p2: impl Into<String>, difficulty: Difficulty) -> Self {
        let mut players = [LogicalPlayer::new(p1), LogicalPlayer::new(p2)];
        players[0].active = true;
        Self {
            players,
            active: PlayerSlot::One,
            difficulty,
            track: None,
            binding: InputBinding::KeyboardOnly,
        }
    }

    pub fn active_slot(&self) -> PlayerSlot {
        self.active
    }

    pub fn active(&self) -> &LogicalPlayer {
        &self.players[self.active.index()]
    }

    pub fn active_mut(&mut self) -> &mut LogicalPlayer {
        &mut self.players[self.active.index()]
    }

    pub fn player_mut(&mut self, slot: PlayerSlot) -> &mut LogicalPlayer {
        &mut self.players[slot.index()]
    }

    pub fn is_over(&self) -> bool {
        self.players.iter().all(LogicalPlayer::is_out)
    }

    /// Hand play to the other player if the active one is out and the other
    /// still has lives. Returns the new slot on a hand-over.
    pub fn pass_turn(&mut self) -> Option<PlayerSlot> {
        if !self.active().is_out() {
            return None;
        }
        let other = self.active.other();
        if self.players[other.index()].is_out() {
            return None;
        }
        self.players[self.active.index()].active = false;
        self.players[other.index()].active = true;
        self.active = other;
        Some(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kills_score_and_award_power_ups_in_order() {
        let mut p = LogicalPlayer::new("ace");
        let awards: Vec<_> = (0..30).filter_map(|_| p.record_kill()).collect();
        assert_eq!(p.score, 3000);
        assert_eq!(awards, vec![PowerUp::Shield, PowerUp::RapidFire]);
    }

    #[test]
    fn shield_absorbs_one_hit() {
        let mut p = LogicalPlayer::new("ace");
        p.power_ups.insert(PowerUp::Shield);
        assert!(!p.take_damage(500.0));
        assert_eq!(p.hull, HULL_PER_LIFE);
        assert!(p.take_damage(100.0));
        assert_eq!(p.lives(), MAX_LIVES - 1);
    }

    #[test]
    fn lives_never_underflow() {
        let mut p = LogicalPlayer::new("ace");
        for _ in 0..5 {
            p.lose_life();
        }
        assert_eq!(p.lives(), 0);
        assert!(p.is_out());
    }

    #[test]
    fn turn_passes_only_to_a_player_with_lives() {
        let mut s = GameSession::new("one", "two", Difficulty::Normal);
        assert_eq!(s.pass_turn(), None);
        for _ in 0..MAX_LIVES {
            s.active_mut().lose_life();
        }
        assert_eq!(s.pass_turn(), Some(PlayerSlot::Two));
        assert!(s.players[1].active && !s.players[0].active);
        for _ in 0..MAX_LIVES {
            s.active_mut().lose_life();
        }
        assert_eq!(s.pass_turn(), None);
        assert!(s.is_over());
    }
}
