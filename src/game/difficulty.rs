use ratatui::style::Color;

use super::entity::Pattern;

const BASE_ENEMY_SPEED: f32 = 2.0;
const BASE_CONTACT_DAMAGE: f32 = 40.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
    }

    pub fn from_index(idx: u8) -> Option<Difficulty> {
        match idx {
            0 => Some(Difficulty::Easy),
            1 => Some(Difficulty::Normal),
            2 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Difficulty::Easy => "RECRUIT (Easy)",
            Difficulty::Normal => "SERGEANT (Normal)",
            Difficulty::Hard => "COMMANDER (Hard)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Slow enemies, predictable patterns",
            Difficulty::Normal => "Standard speed, varied patterns",
            Difficulty::Hard => "Fast enemies, complex patterns",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Difficulty::Easy => Color::Rgb(80, 220, 120),
            Difficulty::Normal => Color::Rgb(255, 255, 100),
            Difficulty::Hard => Color::Rgb(255, 90, 90),
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.4,
        }
    }

    pub fn damage_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Ticks between enemy spawns.
    pub fn spawn_interval(&self) -> u64 {
        match self {
            Difficulty::Easy => 90,
            Difficulty::Normal => 60,
            Difficulty::Hard => 40,
        }
    }

    pub fn pattern(&self) -> Pattern {
        match self {
            Difficulty::Easy => Pattern::Descend,
            Difficulty::Normal => Pattern::Sway,
            Difficulty::Hard => Pattern::Homing,
        }
    }

    pub fn enemy_speed(&self) -> f32 {
        BASE_ENEMY_SPEED * self.speed_multiplier()
    }

    pub fn contact_damage(&self) -> f32 {
        BASE_CONTACT_DAMAGE * self.damage_multiplier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_strictly_increase() {
        let [e, n, h] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];
        assert!(e.speed_multiplier() < n.speed_multiplier());
        assert!(n.speed_multiplier() < h.speed_multiplier());
        assert!(e.damage_multiplier() < n.damage_multiplier());
        assert!(n.damage_multiplier() < h.damage_multiplier());
        assert!(e.spawn_interval() > n.spawn_interval());
        assert!(n.spawn_interval() > h.spawn_interval());
    }

    #[test]
    fn index_maps_both_ways() {
        for d in Difficulty::all() {
            assert_eq!(Difficulty::from_index(d.index()), Some(*d));
        }
        assert_eq!(Difficulty::from_index(3), None);
    }
}
