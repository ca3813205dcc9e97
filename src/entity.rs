use crate::collision;
use crate::geometry::{BoundingBox, Direction, LineSegment, Position, BOARD_WIDTH};
use crate::sprite::SpriteMask;

/// Number of death-animation frames; an entity is finished once it has
/// played through all of them.
pub const MAX_DEATH_ANIMATION_STAGE: u32 = 20;

pub const STARSHIP_DEATH_ANIMATION_SPEED: u32 = 5;
pub const STARSHIP_SIZE: f64 = 16.0;
/// Resting height of a starship's center above the bottom edge.
pub const STARSHIP_ROW_Y: f64 = 18.0;

/// Sprite identity, logical size and rotation hint, plus the last rendered
/// mask for that sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: String,
    pub width: f64,
    pub height: f64,
    rotation: Direction,
    mask: Option<SpriteMask>,
}

impl Shape {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            rotation: Direction::UP,
            mask: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Switches to another sprite. The old mask no longer matches, so the
    /// shape counts as unrendered until a new mask is attached.
    pub fn set_image_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
        self.mask = None;
    }

    pub fn rotation(&self) -> Direction {
        self.rotation
    }

    /// Turns the shape. A turn that lands on a different quarter turn makes
    /// the current mask stale, so the shape counts as unrendered again.
    pub fn set_rotation(&mut self, rotation: Direction) {
        if rotation.quarter_turns() != self.rotation.quarter_turns() {
            self.mask = None;
        }
        self.rotation = rotation;
    }

    pub fn mask(&self) -> Option<&SpriteMask> {
        self.mask.as_ref()
    }

    pub fn attach_mask(&mut self, mask: SpriteMask) {
        self.mask = Some(mask);
    }

    pub fn is_rendered(&self) -> bool {
        self.mask.is_some()
    }

    /// Image size in pixels at the given resolution.
    pub fn pixel_dimensions(&self, pixels_per_unit: usize) -> (usize, usize) {
        let scale = pixels_per_unit.max(1) as f64;
        (
            ((self.width * scale).round() as usize).max(1),
            ((self.height * scale).round() as usize).max(1),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifeStatus {
    alive: bool,
    death_animation_speed: u32,
    death_animation_tick: u32,
}

impl LifeStatus {
    /// `death_animation_speed` is the number of ticks each death frame stays up.
    pub fn new(death_animation_speed: u32) -> Self {
        Self {
            alive: true,
            death_animation_speed: death_animation_speed.max(1),
            death_animation_tick: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn animation_stage(&self) -> u32 {
        self.death_animation_tick / self.death_animation_speed
    }

    pub fn is_finished(&self) -> bool {
        self.animation_stage() >= MAX_DEATH_ANIMATION_STAGE
    }

    fn kill(&mut self) {
        self.alive = false;
    }

    /// Advances the death countdown and swaps frames on stage boundaries.
    fn tick_and_adjust_shape(&mut self, shape: &mut Shape) {
        if self.alive || self.is_finished() {
            return;
        }
        let former_stage = self.animation_stage();
        self.death_animation_tick += 1;
        let new_stage = self.animation_stage();
        if new_stage != former_stage && new_stage < MAX_DEATH_ANIMATION_STAGE {
            shape.set_image_id(death_frame(new_stage));
        }
    }
}

fn death_frame(stage: u32) -> String {
    format!("death-animations/{stage}")
}

/// Position, sprite and life cycle shared by everything that can be drawn and hit.
#[derive(Debug, Clone)]
pub struct Entity {
    pub position: Position,
    pub shape: Shape,
    pub life: LifeStatus,
}

impl Entity {
    pub fn new(position: Position, shape: Shape, life: LifeStatus) -> Self {
        Self {
            position,
            shape,
            life,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life.is_alive()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box_at(self.position)
    }

    pub fn bounding_box_at(&self, position: Position) -> BoundingBox {
        BoundingBox::centered_on(position, self.shape.width, self.shape.height)
    }

    pub fn could_be_located_at(&self, position: Position) -> bool {
        !self.bounding_box_at(position).is_out_of_bounds()
    }

    /// Whether `shot`'s latest move crossed a painted pixel of this entity.
    pub fn collides_with(&self, shot: &Shot, debug_assertions: bool) -> bool {
        match shot.last_movement() {
            Some(movement) => collision::intersects_with(movement, self, debug_assertions),
            None => false,
        }
    }

    /// Marks the entity dead and starts its death animation. The entity stays
    /// wherever it is stored until it is finished and swept.
    pub fn destroy(&mut self) {
        self.life.kill();
        self.shape.set_image_id(death_frame(0));
    }

    pub fn tick(&mut self) {
        self.life.tick_and_adjust_shape(&mut self.shape);
    }

    pub fn is_finished(&self) -> bool {
        self.life.is_finished()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affects {
    Aliens,
    Starships,
}

/// A projectile moving along a fixed unit direction. It remembers the
/// segment it swept on its latest move for collision tests.
#[derive(Debug, Clone)]
pub struct Shot {
    pub position: Position,
    pub direction: Position,
    pub affects: Affects,
    last_movement: Option<LineSegment>,
}

impl Shot {
    pub fn new(position: Position, direction: Position, affects: Affects) -> Self {
        Self {
            position,
            direction,
            affects,
            last_movement: None,
        }
    }

    pub fn advance(&mut self, distance: f64) {
        let from = self.position;
        self.position = from + self.direction * distance;
        self.last_movement = Some(LineSegment::new(from, self.position));
    }

    pub fn last_movement(&self) -> Option<&LineSegment> {
        self.last_movement.as_ref()
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.position.is_out_of_bounds()
    }
}

#[derive(Debug, Clone)]
pub struct Starship {
    pub body: Entity,
}

impl Starship {
    pub fn new(position: Position) -> Self {
        Self {
            body: Entity::new(
                position,
                Shape::new("starship", STARSHIP_SIZE, STARSHIP_SIZE),
                LifeStatus::new(STARSHIP_DEATH_ANIMATION_SPEED),
            ),
        }
    }

    /// A starship centered on the bottom row.
    pub fn centered() -> Self {
        Self::new(Position::new(BOARD_WIDTH / 2.0, STARSHIP_ROW_Y))
    }

    pub fn can_move_by(&self, dx: f64) -> bool {
        self.body
            .could_be_located_at(self.body.position + Position::new(dx, 0.0))
    }

    pub fn move_by(&mut self, dx: f64) {
        self.body.position = self.body.position + Position::new(dx, 0.0);
    }

    pub fn create_shot(&self) -> Shot {
        Shot::new(self.body.position, Position::new(0.0, 1.0), Affects::Aliens)
    }
}
