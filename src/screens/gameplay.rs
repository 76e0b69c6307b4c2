use std::time::Duration;

use ratatui::prelude::*;

use super::{Crew, RenderContext, Screen, ScreenKind, Services, Transition};
use crate::display::DisplayScope;
use crate::error::EngineError;
use crate::game::input::InputEvent;
use crate::game::session::InputBinding;
use crate::game::{Engine, EngineConfig, EngineState, GameSetup};
use crate::notify::{Severity, DEFAULT_BANNER_DURATION};

/// The engine embedded as a screen. Holds the display scope taken when
/// gameplay started; the shell restores it on the way out.
pub struct Gameplay {
    engine: Engine,
    scope: DisplayScope,
}

impl Gameplay {
    /// Build and start the engine. On failure the scope is handed back so
    /// the caller can restore the display.
    pub fn open(
        crew: &Crew,
        svc: &mut Services,
        scope: DisplayScope,
    ) -> Result<Self, (EngineError, DisplayScope)> {
        let setup = GameSetup {
            player_one: crew.player_name().to_string(),
            player_two: crew.player_two_name().to_string(),
            ship_image: crew.player.as_ref().and_then(|p| p.ship_image.clone()),
            favourite_tracks: crew
                .player
                .as_ref()
                .map(|p| p.favourite_tracks.clone())
                .unwrap_or_default(),
            difficulty: crew.difficulty,
            binding: match svc.pad_name {
                Some(name) => InputBinding::KeyboardAndPad { name: name.to_string() },
                None => InputBinding::KeyboardOnly,
            },
        };
        let config = EngineConfig {
            world_width: svc.settings.world_width,
            world_height: svc.settings.world_height,
            key_hold_ticks: u32::try_from(svc.settings.key_hold_ticks).unwrap_or(u32::MAX),
            exact_keys: svc.exact_keys,
        };
        match Engine::new(setup, config, svc.catalog, &mut *svc.rng) {
            Ok(mut engine) => {
                engine.start(svc.audio);
                Ok(Self { engine, scope })
            }
            Err(e) => Err((e, scope)),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn into_scope(self) -> DisplayScope {
        self.scope
    }

    fn after(&mut self, svc: &mut Services) -> Transition {
        for (msg, severity) in self.engine.take_notices() {
            svc.banner.notify(&msg, severity, DEFAULT_BANNER_DURATION);
        }
        if self.engine.state() == EngineState::Exited {
            let s = &self.engine.session().players;
            svc.banner.notify(
                &format!("Final score: {} {} / {} {}", s[0].name, s[0].score, s[1].name, s[1].score),
                Severity::Info,
                DEFAULT_BANNER_DURATION,
            );
            Transition::ExitGameplay
        } else {
            Transition::Stay
        }
    }
}

impl Screen for Gameplay {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Gameplay
    }

    fn handle_input(&mut self, ev: &InputEvent, svc: &mut Services) -> Transition {
        self.engine.handle_input(ev, svc.audio);
        self.after(svc)
    }

    fn update(&mut self, dt: Duration, svc: &mut Services) -> Transition {
        self.engine.tick(dt, svc.now, svc.pad, svc.audio, &mut *svc.rng);
        self.after(svc)
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        self.engine.render(frame, area, ctx.volume);
    }
}
