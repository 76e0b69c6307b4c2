//! Keyboard and joystick normalisation into one directional state plus
//! discrete button presses.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::entity::Directions;
use crate::error::InputDeviceError;

pub const DEADZONE: f32 = 0.4;
pub const AXIS_X: usize = 0;
pub const AXIS_Y: usize = 1;
pub const BUTTON_FIRE: u8 = 0;
pub const BUTTON_MENU: u8 = 7;

/// One input occurrence as seen by screens and the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    PadButton(u8),
}

impl InputEvent {
    fn pressed(&self, code: KeyCode) -> bool {
        matches!(self, InputEvent::Key(k) if k.code == code && k.kind != KeyEventKind::Release)
    }

    /// Enter or joystick button 0.
    pub fn is_confirm(&self) -> bool {
        self.pressed(KeyCode::Enter) || *self == InputEvent::PadButton(BUTTON_FIRE)
    }

    /// Space or joystick button 0.
    pub fn is_fire(&self) -> bool {
        self.pressed(KeyCode::Char(' ')) || *self == InputEvent::PadButton(BUTTON_FIRE)
    }

    /// Esc or joystick button 7.
    pub fn is_menu_toggle(&self) -> bool {
        self.pressed(KeyCode::Esc) || *self == InputEvent::PadButton(BUTTON_MENU)
    }

    pub fn is_key(&self, code: KeyCode) -> bool {
        self.pressed(code)
    }
}

/// State of the bound joystick at one poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadSnapshot {
    pub axes: Vec<f32>,
    /// Buttons that went down since the previous poll.
    pub pressed: Vec<u8>,
}

impl PadSnapshot {
    pub fn axis(&self, idx: usize) -> f32 {
        self.axes.get(idx).copied().unwrap_or(0.0)
    }

    /// Axis values beyond the deadzone, as arrow-key equivalents.
    pub fn directions(&self) -> Directions {
        let x = self.axis(AXIS_X);
        let y = self.axis(AXIS_Y);
        Directions {
            left: x < -DEADZONE,
            right: x > DEADZONE,
            up: y < -DEADZONE,
            down: y > DEADZONE,
        }
    }

    pub fn events(&self) -> impl Iterator<Item = InputEvent> + '_ {
        self.pressed.iter().map(|b| InputEvent::PadButton(*b))
    }
}

pub trait Gamepad {
    fn name(&self) -> &str;
    fn poll(&mut self) -> PadSnapshot;
}

pub trait GamepadHub {
    fn enumerate(&mut self) -> Result<Vec<Box<dyn Gamepad>>, InputDeviceError>;
}

/// Hub used when no joystick backend is compiled in.
#[derive(Debug, Default)]
pub struct NoGamepads;

impl GamepadHub for NoGamepads {
    fn enumerate(&mut self) -> Result<Vec<Box<dyn Gamepad>>, InputDeviceError> {
        Err(InputDeviceError::NoBackend)
    }
}

/// Bind the first enumerated joystick, or none.
pub fn first_gamepad(hub: &mut dyn GamepadHub) -> Option<Box<dyn Gamepad>> {
    match hub.enumerate() {
        Ok(pads) => {
            let pad = pads.into_iter().next();
            match &pad {
                Some(p) => log::info!("Joystick bound: {}", p.name()),
                None => log::info!("No joystick connected, keyboard only"),
            }
            pad
        }
        Err(e) => {
            log::warn!("Joystick enumeration failed, keyboard only: {}", e);
            None
        }
    }
}

/// The joystick backend compiled into this build: gilrs with the `gamepad`
/// feature, nothing otherwise.
pub fn system_hub() -> Box<dyn GamepadHub> {
    #[cfg(feature = "gamepad")]
    {
        Box::new(device::GilrsHub)
    }
    #[cfg(not(feature = "gamepad"))]
    {
        Box::new(NoGamepads)
    }
}

#[cfg(feature = "gamepad")]
mod device {
    use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};

    use super::{Gamepad, GamepadHub, PadSnapshot, AXIS_X, AXIS_Y};
    use crate::error::InputDeviceError;

    /// Opens one gilrs context per enumeration.
    #[derive(Debug, Default)]
    pub struct GilrsHub;

    impl GamepadHub for GilrsHub {
        /// Pads share the context that found them, so only the first
        /// connected pad is returned.
        fn enumerate(&mut self) -> Result<Vec<Box<dyn Gamepad>>, InputDeviceError> {
            let gilrs = Gilrs::new().map_err(|e| InputDeviceError::Enumeration(e.to_string()))?;
            let first = gilrs
                .gamepads()
                .find(|(_, pad)| pad.is_connected())
                .map(|(id, pad)| (id, pad.name().to_string()));
            Ok(first
                .map(|(id, name)| Box::new(GilrsPad { gilrs, id, name }) as Box<dyn Gamepad>)
                .into_iter()
                .collect())
        }
    }

    pub struct GilrsPad {
        gilrs: Gilrs,
        id: GamepadId,
        name: String,
    }

    /// Conventional indices: face buttons 0-3, bumpers 4-5, back 6, start 7.
    pub(super) fn button_index(button: Button) -> Option<u8> {
        match button {
            Button::South => Some(0),
            Button::East => Some(1),
            Button::West => Some(2),
            Button::North => Some(3),
            Button::LeftTrigger => Some(4),
            Button::RightTrigger => Some(5),
            Button::Select => Some(6),
            Button::Start => Some(7),
            _ => None,
        }
    }

    /// gilrs reports stick Y positive upward; screen Y grows downward.
    pub(super) fn stick_axes(x: f32, y_up: f32) -> Vec<f32> {
        let mut axes = vec![0.0; AXIS_X.max(AXIS_Y) + 1];
        axes[AXIS_X] = x;
        axes[AXIS_Y] = -y_up;
        axes
    }

    impl Gamepad for GilrsPad {
        fn name(&self) -> &str {
            &self.name
        }

        fn poll(&mut self) -> PadSnapshot {
            let mut pressed = Vec::new();
            while let Some(ev) = self.gilrs.next_event() {
                if ev.id != self.id {
                    continue;
                }
                match ev.event {
                    EventType::ButtonPressed(button, _) => pressed.extend(button_index(button)),
                    EventType::Disconnected => log::warn!("Joystick disconnected: {}", self.name),
                    EventType::Connected => log::info!("Joystick reconnected: {}", self.name),
                    _ => {}
                }
            }
            let pad = self.gilrs.gamepad(self.id);
            if !pad.is_connected() {
                return PadSnapshot { axes: Vec::new(), pressed };
            }
            PadSnapshot {
                axes: stick_axes(pad.value(Axis::LeftStickX), pad.value(Axis::LeftStickY)),
                pressed,
            }
        }
    }

}

/// Held arrow keys.
///
/// With release reporting (`exact`), keys stay down until their release
/// event. Otherwise each press or auto-repeat keeps the key down for
/// `hold_ticks` ticks.
#[derive(Debug, Clone)]
pub struct KeyboardState {
    exact: bool,
    hold_ticks: u32,
    /// Left, right, up, down.
    remaining: [u32; 4],
}

impl KeyboardState {
    pub fn new(exact: bool, hold_ticks: u32) -> Self {
        Self { exact, hold_ticks: hold_ticks.max(1), remaining: [0; 4] }
    }

    fn slot(code: KeyCode) -> Option<usize> {
        match code {
            KeyCode::Left => Some(0),
            KeyCode::Right => Some(1),
            KeyCode::Up => Some(2),
            KeyCode::Down => Some(3),
            _ => None,
        }
    }

    /// Returns true when the key was a direction key.
    pub fn handle(&mut self, key: &KeyEvent) -> bool {
        let Some(i) = Self::slot(key.code) else {
            return false;
        };
        self.remaining[i] = match (key.kind, self.exact) {
            (KeyEventKind::Release, _) => 0,
            (_, true) => u32::MAX,
            (_, false) => self.hold_ticks,
        };
        true
    }

    /// Age timed holds by one tick. Read `directions` before calling.
    pub fn tick(&mut self) {
        if self.exact {
            return;
        }
        for r in &mut self.remaining {
            *r = r.saturating_sub(1);
        }
    }

    pub fn directions(&self) -> Directions {
        Directions {
            left: self.remaining[0] > 0,
            right: self.remaining[1] > 0,
            up: self.remaining[2] > 0,
            down: self.remaining[3] > 0,
        }
    }

    pub fn clear(&mut self) {
        self.remaining = [0; 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE, kind, state: KeyEventState::NONE }
    }

    #[test]
    fn deadzone_filters_small_deflection() {
        let snap = PadSnapshot { axes: vec![-0.39, 0.41], pressed: vec![] };
        assert_eq!(snap.directions(), Directions { down: true, ..Directions::NONE });
        let snap = PadSnapshot { axes: vec![-0.9], pressed: vec![] };
        assert_eq!(snap.directions(), Directions { left: true, ..Directions::NONE });
    }

    #[test]
    fn pad_buttons_map_to_fire_and_menu() {
        assert!(InputEvent::PadButton(0).is_fire());
        assert!(InputEvent::PadButton(0).is_confirm());
        assert!(InputEvent::PadButton(7).is_menu_toggle());
        assert!(!InputEvent::PadButton(3).is_fire());
    }

    #[test]
    fn timed_hold_expires_without_repeat() {
        let mut kb = KeyboardState::new(false, 3);
        kb.handle(&key(KeyCode::Left, KeyEventKind::Press));
        for _ in 0..3 {
            assert!(kb.directions().left);
            kb.tick();
        }
        assert!(!kb.directions().left);
    }

    #[test]
    fn exact_mode_waits_for_release() {
        let mut kb = KeyboardState::new(true, 3);
        kb.handle(&key(KeyCode::Up, KeyEventKind::Press));
        for _ in 0..100 {
            kb.tick();
        }
        assert!(kb.directions().up);
        kb.handle(&key(KeyCode::Up, KeyEventKind::Release));
        assert!(!kb.directions().up);
    }

    #[test]
    fn hub_without_backend_binds_nothing() {
        assert!(first_gamepad(&mut NoGamepads).is_none());
    }

    #[cfg(not(feature = "gamepad"))]
    #[test]
    fn default_build_falls_back_to_keyboard() {
        let mut hub = system_hub();
        assert!(matches!(hub.enumerate(), Err(InputDeviceError::NoBackend)));
        assert!(first_gamepad(hub.as_mut()).is_none());
    }
}
