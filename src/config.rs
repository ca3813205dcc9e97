use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::regulator::GameplayRegulator;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// Everything the host reads from `galaga.toml`. Missing tables and keys fall
/// back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalagaConfig {
    pub regulator: GameplayRegulator,
    pub host: HostConfig,
}

/// Settings that belong to the host loop rather than the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Wall-clock time between ticks outside debug mode.
    pub tick_interval_ms: u64,
    /// Fixed RNG seed; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed: None,
        }
    }
}

impl GalagaConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidCadence {
                field: "tick_interval_ms",
            });
        }
        self.regulator.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = GalagaConfig::from_toml_str("").unwrap();
        assert_eq!(config, GalagaConfig::default());
        assert_eq!(config.host.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(config.host.seed, None);
    }

    #[test]
    fn test_partial_tables_keep_other_defaults() {
        let config = GalagaConfig::from_toml_str(
            r#"
            [regulator]
            dance_every = 3
            debug_assertions = true

            [host]
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.regulator.dance_every, 3);
        assert!(config.regulator.debug_assertions);
        assert_eq!(
            config.regulator.cleanup_every,
            GameplayRegulator::default().cleanup_every
        );
        assert_eq!(config.host.seed, Some(42));
        assert_eq!(config.host.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
    }

    #[test]
    fn test_zero_cadence_is_rejected() {
        let err = GalagaConfig::from_toml_str("[regulator]\nspawn_every = 0\n").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidCadence {
                field: "spawn_every"
            }
        );

        let err = GalagaConfig::from_toml_str("[host]\ntick_interval_ms = 0\n").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidCadence {
                field: "tick_interval_ms"
            }
        );
    }

    #[test]
    fn test_shots_that_would_never_leave_the_board_are_rejected() {
        for distance in ["0.0", "-3.0", "nan", "inf"] {
            let text = format!("[regulator]\nshot_distance = {distance}\n");
            assert_eq!(
                GalagaConfig::from_toml_str(&text),
                Err(ConfigError::InvalidShotDistance),
                "shot_distance = {distance}"
            );
        }
    }

    #[test]
    fn test_unknown_keys_and_bad_types_are_parse_errors() {
        assert!(matches!(
            GalagaConfig::from_toml_str("[regulator]\nwarp_speed = 9\n"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            GalagaConfig::from_toml_str("[host]\nseed = \"abc\"\n"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let path = Path::new("definitely/not/here/galaga.toml");
        match GalagaConfig::load(path) {
            Err(ConfigError::Read { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
