use crate::dance::{BossAvoidance, DanceContext, DanceStage, Patrol, DEFAULT_PATROL_STEPS};
use crate::entity::{Affects, Entity, LifeStatus, Shape, Shot};
use crate::geometry::Position;

pub const ALIEN_SIZE: f64 = 16.0;
pub const ALIEN_DEATH_ANIMATION_SPEED: u32 = 1;
/// Dance ticks an alien spends spiralling in from its spawn point.
pub const DEFAULT_TIME_TO_REACH: u32 = 40;

/// Alien archetype. Decides the sprite, the score, how the alien dances and
/// how often it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Soul {
    Bee,
    Boss,
    /// `has_starship` is set while it carries a captured starship.
    Abductor { has_starship: bool },
}

impl Soul {
    pub fn sprite_id(&self) -> &'static str {
        match self {
            Soul::Bee => "bee",
            Soul::Boss => "boss",
            Soul::Abductor { .. } => "abductor",
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.sprite_id(), ALIEN_SIZE, ALIEN_SIZE)
    }

    pub fn score_when_killed(&self, level: u32) -> u64 {
        let level = u64::from(level);
        match self {
            Soul::Bee => 10 * level.pow(2),
            Soul::Boss => 100 * level,
            Soul::Abductor { has_starship: true } => 20 * level.pow(3),
            Soul::Abductor { has_starship: false } => level,
        }
    }

    /// A resident alien fires with probability 1 / `fire_chance()` per dance tick.
    pub fn fire_chance(&self) -> u32 {
        match self {
            Soul::Bee => 60,
            Soul::Boss => 40,
            Soul::Abductor { .. } => 50,
        }
    }

    pub fn initial_stage(&self, spawn: Position, rest: Position, time_to_reach: u32) -> DanceStage {
        let resident = match self {
            Soul::Boss => DanceStage::BossAvoidance(BossAvoidance),
            Soul::Bee | Soul::Abductor { .. } => DanceStage::Patrol(Patrol::new(DEFAULT_PATROL_STEPS)),
        };
        DanceStage::spiral_then(spawn, rest, time_to_reach, resident)
    }
}

#[derive(Debug, Clone)]
pub struct Alien {
    pub body: Entity,
    pub rest_position: Position,
    pub soul: Soul,
    stage: DanceStage,
}

impl Alien {
    pub fn new(spawn: Position, rest_position: Position, soul: Soul) -> Self {
        Self::with_time_to_reach(spawn, rest_position, soul, DEFAULT_TIME_TO_REACH)
    }

    pub fn with_time_to_reach(
        spawn: Position,
        rest_position: Position,
        soul: Soul,
        time_to_reach: u32,
    ) -> Self {
        let stage = soul.initial_stage(spawn, rest_position, time_to_reach);
        Self::with_stage(spawn, rest_position, soul, stage)
    }

    /// An alien driven by an explicit stage instead of its soul's default dance.
    pub fn with_stage(spawn: Position, rest_position: Position, soul: Soul, stage: DanceStage) -> Self {
        Self {
            body: Entity::new(
                spawn,
                soul.shape(),
                LifeStatus::new(ALIEN_DEATH_ANIMATION_SPEED),
            ),
            rest_position,
            soul,
            stage,
        }
    }

    pub fn stage(&self) -> &DanceStage {
        &self.stage
    }

    pub fn is_incoming(&self) -> bool {
        self.stage.is_incoming()
    }

    /// Moves one step along the current dance and hands over to the next
    /// stage once the current one cedes.
    pub fn dance(&mut self, ctx: &DanceContext<'_>) {
        let delta = self.stage.advance(&self.body, ctx);
        if delta != Position::ZERO {
            self.body.shape.set_rotation(delta.to_direction());
        }
        self.body.position = self.body.position + delta;
        if self.stage.has_ceded() {
            self.stage = std::mem::take(&mut self.stage).successor();
        }
    }

    pub fn create_shot(&self) -> Shot {
        Shot::new(self.body.position, Position::new(0.0, -1.0), Affects::Starships)
    }

    pub fn score_when_killed(&self, level: u32) -> u64 {
        self.soul.score_when_killed(level)
    }
}
