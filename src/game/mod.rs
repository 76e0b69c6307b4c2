pub mod arena;
pub mod canvas;
pub mod difficulty;
pub mod engine;
pub mod entity;
pub mod hud;
pub mod input;
pub mod session;
pub mod spawner;
pub mod sprite;
pub mod starfield;

pub use difficulty::Difficulty;
pub use engine::{Engine, EngineConfig, EngineState, GameSetup};
pub use entity::PlayerSlot;
