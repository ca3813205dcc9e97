use std::collections::VecDeque;

use crate::alien::{Alien, Soul, DEFAULT_TIME_TO_REACH};
use crate::geometry::Position;

/// What a wave sees when it is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveContext {
    /// Level the wave is about to start.
    pub level: u32,
}

/// Builds the aliens for one wave.
pub type Wave = Box<dyn FnOnce(&WaveContext) -> Vec<Alien>>;

/// Every alien enters from here and spirals to its formation slot.
pub const SPAWN_POINT: Position = Position { x: 112.0, y: 280.0 };

const FORMATION_COLUMNS: [f64; 5] = [48.0, 80.0, 112.0, 144.0, 176.0];
const FRONT_ROW_Y: f64 = 216.0;
const BACK_ROW_Y: f64 = 240.0;
const BOSS_ROW_Y: f64 = 262.0;

/// Later levels fly in faster, down to half the default approach time.
fn time_to_reach(ctx: &WaveContext) -> u32 {
    DEFAULT_TIME_TO_REACH
        .saturating_sub(4 * ctx.level.saturating_sub(1))
        .max(DEFAULT_TIME_TO_REACH / 2)
}

fn row(ctx: &WaveContext, y: f64, soul_for_column: impl Fn(usize) -> Soul) -> Vec<Alien> {
    FORMATION_COLUMNS
        .iter()
        .enumerate()
        .map(|(column, &x)| {
            Alien::with_time_to_reach(
                SPAWN_POINT,
                Position::new(x, y),
                soul_for_column(column),
                time_to_reach(ctx),
            )
        })
        .collect()
}

/// The three stock waves: a row of bees; bees backed by abductors (the
/// middle one carrying a captured starship); a boss escorted by two rows of bees.
pub fn standard_waves() -> VecDeque<Wave> {
    let mut waves: VecDeque<Wave> = VecDeque::new();
    waves.push_back(Box::new(|ctx: &WaveContext| row(ctx, BACK_ROW_Y, |_| Soul::Bee)));
    waves.push_back(Box::new(|ctx: &WaveContext| {
        let mut aliens = row(ctx, FRONT_ROW_Y, |_| Soul::Bee);
        aliens.extend(row(ctx, BACK_ROW_Y, |column| Soul::Abductor {
            has_starship: column == FORMATION_COLUMNS.len() / 2,
        }));
        aliens
    }));
    waves.push_back(Box::new(|ctx: &WaveContext| {
        let mut aliens = vec![Alien::with_time_to_reach(
            SPAWN_POINT,
            Position::new(SPAWN_POINT.x, BOSS_ROW_Y),
            Soul::Boss,
            time_to_reach(ctx),
        )];
        aliens.extend(row(ctx, BACK_ROW_Y, |_| Soul::Bee));
        aliens.extend(row(ctx, FRONT_ROW_Y, |_| Soul::Bee));
        aliens
    }));
    waves
}
