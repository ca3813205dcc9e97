use std::f64::consts::PI;

use crate::entity::{Entity, Shot};
use crate::geometry::{Position, BOARD_WIDTH};

/// Angle the approach spiral starts from; it unwinds down to zero.
pub const SPIRAL_START_ANGLE: f64 = 2.0 * PI / 3.0;
pub const DEFAULT_PATROL_STEPS: u32 = 16;
/// Bosses stop dodging this close to either side of the board.
pub const BOSS_EDGE_MARGIN: f64 = 20.0;
pub const BOSS_STEP: f64 = 2.0;

/// What a dancing alien can observe about the rest of the match.
#[derive(Debug, Clone, Copy)]
pub struct DanceContext<'a> {
    pub shots: &'a [Shot],
}

/// The behavior currently steering one alien. Each call to [`advance`]
/// yields that tick's displacement; a stage that has ceded is swapped for
/// its successor with [`successor`].
///
/// [`advance`]: DanceStage::advance
/// [`successor`]: DanceStage::successor
#[derive(Debug, Clone)]
pub enum DanceStage {
    Spiral(SpiralApproach),
    Patrol(Patrol),
    BossAvoidance(BossAvoidance),
}

impl Default for DanceStage {
    fn default() -> Self {
        DanceStage::Patrol(Patrol::default())
    }
}

impl DanceStage {
    pub fn spiral_then(start: Position, end: Position, time_to_reach: u32, then: DanceStage) -> Self {
        DanceStage::Spiral(SpiralApproach::new(start, end, time_to_reach, then))
    }

    /// True while the alien is still flying in and not yet part of the formation.
    pub fn is_incoming(&self) -> bool {
        matches!(self, DanceStage::Spiral(_))
    }

    pub fn advance(&mut self, body: &Entity, ctx: &DanceContext<'_>) -> Position {
        match self {
            DanceStage::Spiral(spiral) => spiral.advance(),
            DanceStage::Patrol(patrol) => patrol.advance(),
            DanceStage::BossAvoidance(avoidance) => avoidance.advance(body, ctx),
        }
    }

    pub fn has_ceded(&self) -> bool {
        match self {
            DanceStage::Spiral(spiral) => spiral.is_complete(),
            DanceStage::Patrol(_) | DanceStage::BossAvoidance(_) => false,
        }
    }

    /// The stage that takes over once this one cedes. Stages that never cede
    /// are their own successor.
    pub fn successor(self) -> DanceStage {
        match self {
            DanceStage::Spiral(spiral) => *spiral.then,
            other => other,
        }
    }
}

/// Flies along the polar spiral r = θ from a spawn point to a rest point.
///
/// θ unwinds from 2π/3 to 0 in `time_to_reach` equal steps. The spiral's own
/// start-to-end displacement is stretched per axis to the requested one, so
/// summing every step lands exactly on the rest point.
#[derive(Debug, Clone)]
pub struct SpiralApproach {
    total_steps: u32,
    remaining_steps: u32,
    scale: Position,
    then: Box<DanceStage>,
}

impl SpiralApproach {
    pub fn new(start: Position, end: Position, time_to_reach: u32, then: DanceStage) -> Self {
        let natural = spiral_point(0.0) - spiral_point(SPIRAL_START_ANGLE);
        let desired = end - start;
        let ratio = |want: f64, have: f64| if have == 0.0 { 0.0 } else { want / have };
        let total_steps = time_to_reach.max(1);
        Self {
            total_steps,
            remaining_steps: total_steps,
            scale: Position::new(ratio(desired.x, natural.x), ratio(desired.y, natural.y)),
            then: Box::new(then),
        }
    }

    /// Angle removed on every step: 2π / (3 × time_to_reach).
    pub fn angle_step(&self) -> f64 {
        SPIRAL_START_ANGLE / self.total_steps as f64
    }

    pub fn angle(&self) -> f64 {
        SPIRAL_START_ANGLE * self.remaining_steps as f64 / self.total_steps as f64
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_steps == 0
    }

    fn advance(&mut self) -> Position {
        if self.is_complete() {
            return Position::ZERO;
        }
        let from = spiral_point(self.angle());
        self.remaining_steps -= 1;
        let to = spiral_point(self.angle());
        let step = to - from;
        Position::new(step.x * self.scale.x, step.y * self.scale.y)
    }
}

fn spiral_point(theta: f64) -> Position {
    Position::new(theta * theta.cos(), theta * theta.sin())
}

/// Sways one unit right for `step_amount` ticks, then one unit left for as
/// many, forever.
#[derive(Debug, Clone)]
pub struct Patrol {
    step_amount: u32,
    ticks: u32,
}

impl Default for Patrol {
    fn default() -> Self {
        Self::new(DEFAULT_PATROL_STEPS)
    }
}

impl Patrol {
    pub fn new(step_amount: u32) -> Self {
        Self {
            step_amount: step_amount.max(1),
            ticks: 0,
        }
    }

    fn advance(&mut self) -> Position {
        let phase = self.ticks % (2 * self.step_amount);
        self.ticks = self.ticks.wrapping_add(1);
        let dx = if phase < self.step_amount { 1.0 } else { -1.0 };
        Position::new(dx, 0.0)
    }
}

/// Sidesteps away from whichever side currently has more shots in flight.
#[derive(Debug, Clone, Default)]
pub struct BossAvoidance;

impl BossAvoidance {
    fn advance(&mut self, body: &Entity, ctx: &DanceContext<'_>) -> Position {
        let x = body.position.x;
        if x < BOSS_EDGE_MARGIN || x > BOARD_WIDTH - BOSS_EDGE_MARGIN {
            return Position::ZERO;
        }
        let right = ctx.shots.iter().filter(|shot| shot.position.x > x).count();
        let left = ctx.shots.iter().filter(|shot| shot.position.x < x).count();
        // Equal counts step away from the right.
        let dx = if right >= left { -BOSS_STEP } else { BOSS_STEP };
        let delta = Position::new(dx, 0.0);
        if body.could_be_located_at(body.position + delta) {
            delta
        } else {
            Position::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Affects, LifeStatus, Shape};
    use proptest::prelude::*;

    fn body_at(x: f64, y: f64) -> Entity {
        Entity::new(Position::new(x, y), Shape::new("boss", 16.0, 16.0), LifeStatus::new(1))
    }

    fn shot_at(x: f64) -> Shot {
        Shot::new(Position::new(x, 100.0), Position::new(0.0, 1.0), Affects::Aliens)
    }

    fn run_to_completion(stage: &mut DanceStage, body: &Entity) -> (Position, u32) {
        let ctx = DanceContext { shots: &[] };
        let mut total = Position::ZERO;
        let mut ticks = 0;
        while !stage.has_ceded() {
            total = total + stage.advance(body, &ctx);
            ticks += 1;
            assert!(ticks <= 10_000, "spiral never ceded");
        }
        (total, ticks)
    }

    #[test]
    fn test_spiral_is_incoming_until_it_cedes() {
        let body = body_at(0.0, 0.0);
        let mut stage = DanceStage::spiral_then(
            Position::new(112.0, 280.0),
            Position::new(60.0, 220.0),
            12,
            DanceStage::Patrol(Patrol::new(4)),
        );
        assert!(stage.is_incoming());
        let (_, ticks) = run_to_completion(&mut stage, &body);
        assert_eq!(ticks, 12);

        let stage = stage.successor();
        assert!(!stage.is_incoming());
        assert!(matches!(stage, DanceStage::Patrol(_)));
    }

    #[test]
    fn test_spiral_angle_step() {
        let spiral = SpiralApproach::new(Position::ZERO, Position::new(1.0, 1.0), 40, DanceStage::default());
        assert!((spiral.angle_step() - 2.0 * PI / (3.0 * 40.0)).abs() < 1e-12);
        assert!((spiral.angle() - SPIRAL_START_ANGLE).abs() < 1e-12);
    }

    #[test]
    fn test_spiral_handles_pure_vertical_approach() {
        let body = body_at(0.0, 0.0);
        let start = Position::new(100.0, 280.0);
        let end = Position::new(100.0, 200.0);
        let mut stage = DanceStage::spiral_then(start, end, 30, DanceStage::default());
        let (total, _) = run_to_completion(&mut stage, &body);
        assert_eq!(start + total, end);
    }

    #[test]
    fn test_patrol_alternates_with_period() {
        let body = body_at(100.0, 200.0);
        let ctx = DanceContext { shots: &[] };
        let mut stage = DanceStage::Patrol(Patrol::new(3));
        let steps: Vec<f64> = (0..12).map(|_| stage.advance(&body, &ctx).x).collect();
        assert_eq!(
            steps,
            vec![1.0, 1.0, 1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0]
        );
        assert!(!stage.has_ceded());
    }

    #[test]
    fn test_boss_steps_away_from_denser_side() {
        let body = body_at(100.0, 200.0);
        let mut stage = DanceStage::BossAvoidance(BossAvoidance);

        let shots = [shot_at(150.0), shot_at(160.0), shot_at(50.0)];
        let delta = stage.advance(&body, &DanceContext { shots: &shots });
        assert_eq!(delta, Position::new(-BOSS_STEP, 0.0));

        let shots = [shot_at(40.0), shot_at(50.0), shot_at(150.0)];
        let delta = stage.advance(&body, &DanceContext { shots: &shots });
        assert_eq!(delta, Position::new(BOSS_STEP, 0.0));
    }

    #[test]
    fn test_boss_tie_steps_away_from_right() {
        let body = body_at(100.0, 200.0);
        let mut stage = DanceStage::BossAvoidance(BossAvoidance);
        let shots = [shot_at(40.0), shot_at(150.0), shot_at(100.0)];
        let delta = stage.advance(&body, &DanceContext { shots: &shots });
        assert_eq!(delta, Position::new(-BOSS_STEP, 0.0));
        let delta = stage.advance(&body, &DanceContext { shots: &[] });
        assert_eq!(delta, Position::new(-BOSS_STEP, 0.0));
    }

    #[test]
    fn test_boss_holds_near_edges() {
        let mut stage = DanceStage::BossAvoidance(BossAvoidance);
        let shots = [shot_at(200.0)];
        let ctx = DanceContext { shots: &shots };
        assert_eq!(stage.advance(&body_at(19.0, 200.0), &ctx), Position::ZERO);
        assert_eq!(stage.advance(&body_at(205.0, 200.0), &ctx), Position::ZERO);
    }

    #[test]
    fn test_boss_refuses_out_of_bounds_step() {
        let mut stage = DanceStage::BossAvoidance(BossAvoidance);
        // Clear of the side margins, but the box already pokes through the top.
        let mut body = body_at(100.0, 280.0);
        body.shape = Shape::new("boss", 16.0, 20.0);
        assert_eq!(
            stage.advance(&body, &DanceContext { shots: &[] }),
            Position::ZERO
        );

        let mut wide = body_at(21.0, 200.0);
        wide.shape = Shape::new("boss", 40.0, 16.0);
        assert_eq!(
            stage.advance(&wide, &DanceContext { shots: &[] }),
            Position::ZERO
        );
    }

    proptest! {
        #[test]
        fn prop_spiral_closes_on_rest_position(
            sx in 0.0f64..224.0, sy in 0.0f64..288.0,
            ex in 0.0f64..224.0, ey in 0.0f64..288.0,
            time_to_reach in 1u32..400,
        ) {
            let body = body_at(sx, sy);
            let start = Position::new(sx, sy);
            let end = Position::new(ex, ey);
            let mut stage = DanceStage::spiral_then(start, end, time_to_reach, DanceStage::default());
            let (total, ticks) = run_to_completion(&mut stage, &body);
            prop_assert_eq!(ticks, time_to_reach);
            let landed = start + total;
            prop_assert!((landed.x - end.x).abs() < 1e-6, "x landed at {} not {}", landed.x, end.x);
            prop_assert!((landed.y - end.y).abs() < 1e-6, "y landed at {} not {}", landed.y, end.y);
        }
    }
}
