pub mod alien;
pub mod cache;
pub mod cli_renderer;
pub mod collision;
pub mod config;
pub mod dance;
pub mod entity;
pub mod error;
pub mod game;
pub mod geometry;
pub mod regulator;
pub mod renderer;
pub mod sprite;
pub mod wave;

pub use alien::{Alien, Soul};
pub use cli_renderer::CliRenderer;
pub use config::{GalagaConfig, HostConfig};
pub use dance::{DanceContext, DanceStage};
pub use entity::{Affects, Entity, LifeStatus, Shape, Shot, Starship};
pub use error::ConfigError;
pub use game::{CollisionEvent, Galaga, Game, MatchState};
pub use geometry::{BoundingBox, Direction, LineSegment, Position};
pub use regulator::GameplayRegulator;
pub use renderer::{Hud, Input, Renderer};
pub use sprite::{PatternSprites, SolidSprites, SpriteMask, SpriteSource};
pub use wave::{standard_waves, Wave, WaveContext};
