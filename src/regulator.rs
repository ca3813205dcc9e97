use serde::Deserialize;

use crate::error::ConfigError;

/// Cadence of the periodic actions inside a tick, as "every N ticks" of the
/// match's tick counter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameplayRegulator {
    pub move_shots_every: u64,
    pub dance_every: u64,
    pub cleanup_every: u64,
    pub spawn_every: u64,
    /// Logical units a shot travels each time shots move.
    pub shot_distance: f64,
    /// Turns internal consistency checks into hard failures.
    pub debug_assertions: bool,
}

impl Default for GameplayRegulator {
    fn default() -> Self {
        Self {
            move_shots_every: 1,
            dance_every: 2,
            cleanup_every: 40,
            spawn_every: 20,
            shot_distance: 3.0,
            debug_assertions: false,
        }
    }
}

impl GameplayRegulator {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cadences = [
            ("move_shots_every", self.move_shots_every),
            ("dance_every", self.dance_every),
            ("cleanup_every", self.cleanup_every),
            ("spawn_every", self.spawn_every),
        ];
        if let Some((field, _)) = cadences.into_iter().find(|(_, every)| *every == 0) {
            return Err(ConfigError::InvalidCadence { field });
        }
        if !(self.shot_distance.is_finite() && self.shot_distance > 0.0) {
            return Err(ConfigError::InvalidShotDistance);
        }
        Ok(())
    }

    pub fn should_move_shots(&self, tick: u64) -> bool {
        is_due(tick, self.move_shots_every)
    }

    pub fn should_dance(&self, tick: u64) -> bool {
        is_due(tick, self.dance_every)
    }

    pub fn should_clean_up(&self, tick: u64) -> bool {
        is_due(tick, self.cleanup_every)
    }

    pub fn should_check_spawn(&self, tick: u64) -> bool {
        is_due(tick, self.spawn_every)
    }
}

fn is_due(tick: u64, every: u64) -> bool {
    every != 0 && tick % every == 0
}
