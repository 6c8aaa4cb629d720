use crate::domain::errors::ConfigError;
use crate::domain::geometry::Playfield;
use crate::domain::tuning::AirplaneTuning;
use std::time::Duration;

/// Optional game features. The desktop, mobile and leaderboard releases of the game
/// differ only in these toggles and in layout values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Anti-aircraft emplacements appear once the activation score is reached.
    pub emplacements: bool,
    /// High-score checks, name entry and the top-scores screen.
    pub leaderboard: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            emplacements: true,
            leaderboard: true,
        }
    }
}

/// Playfield configuration supplied when a simulation is constructed.
///
/// Speeds are pixels per tick; spawn intervals are ticks; fire intervals and the
/// game-over dwell are wall-clock durations.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,

    /// Score at which emplacements start spawning.
    pub activation_score: u32,
    pub max_health: u32,

    pub background_speed: f32,
    /// Height of one background tile; the scroll offset wraps at this value.
    pub background_tile_height: f32,
    pub projectile_speed: f32,
    /// Speed of emplacement rounds.
    pub round_speed: f32,

    pub ground_target_spawn_interval: u32,
    pub emplacement_spawn_interval: u32,

    /// Emplacement fire intervals are drawn from `[fire_interval_min, fire_interval_max)`.
    pub fire_interval_min: Duration,
    pub fire_interval_max: Duration,
    /// Emplacements hold fire when the airplane is farther away than this.
    pub engagement_range: f32,

    pub game_over_dwell: Duration,

    pub target_size: f32,
    pub emplacement_size: f32,
    pub airplane: AirplaneTuning,

    pub features: FeatureFlags,
}

impl GameConfig {
    pub fn desktop() -> Self {
        let target_size = 120.0 * 1.3;
        Self {
            width: 800.0,
            height: 600.0,
            activation_score: 10,
            max_health: 5,
            background_speed: 2.0,
            background_tile_height: 100.0,
            projectile_speed: 8.0,
            round_speed: 4.0,
            ground_target_spawn_interval: 120,
            emplacement_spawn_interval: 180,
            fire_interval_min: Duration::from_millis(1500),
            fire_interval_max: Duration::from_millis(3000),
            engagement_range: 600.0,
            game_over_dwell: Duration::from_secs(3),
            target_size,
            emplacement_size: (target_size * 0.75).floor(),
            airplane: AirplaneTuning::desktop(),
            features: FeatureFlags::default(),
        }
    }

    pub fn mobile() -> Self {
        let target_size = 80.0;
        Self {
            width: 400.0,
            height: 720.0,
            target_size,
            emplacement_size: (target_size * 0.75).floor(),
            airplane: AirplaneTuning::mobile(),
            ..Self::desktop()
        }
    }

    pub fn playfield(&self) -> Playfield {
        Playfield {
            width: self.width,
            height: self.height,
        }
    }

    /// Where the airplane sits at the start of every run.
    pub fn airplane_start(&self) -> (f32, f32) {
        (
            self.width / 2.0 - self.airplane.start_offset_x,
            self.height - self.airplane.start_inset_y,
        )
    }

    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension { field });
            }
        }

        for (field, value) in [
            ("background_speed", self.background_speed),
            ("projectile_speed", self.projectile_speed),
            ("round_speed", self.round_speed),
            ("airplane.speed", self.airplane.speed),
            ("engagement_range", self.engagement_range),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeSpeed { field });
            }
        }

        for (field, value) in [
            ("ground_target_spawn_interval", self.ground_target_spawn_interval),
            ("emplacement_spawn_interval", self.emplacement_spawn_interval),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { field });
            }
        }

        if self.fire_interval_min.is_zero() {
            return Err(ConfigError::ZeroInterval {
                field: "fire_interval_min",
            });
        }
        if self.fire_interval_min > self.fire_interval_max {
            return Err(ConfigError::InvertedFireInterval);
        }

        if self.max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }

        for (field, value) in [
            ("background_tile_height", self.background_tile_height),
            ("target_size", self.target_size),
            ("emplacement_size", self.emplacement_size),
            ("airplane.width", self.airplane.width),
            ("airplane.height", self.airplane.height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension { field });
            }
        }

        for (field, size, limit) in [
            ("target_size", self.target_size, self.width),
            ("emplacement_size", self.emplacement_size, self.width),
            ("airplane.width", self.airplane.width, self.width),
            ("airplane.height", self.airplane.height, self.height),
        ] {
            if size > limit {
                return Err(ConfigError::EntityTooLarge { field });
            }
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_preset_is_validated_then_it_passes() {
        assert_eq!(GameConfig::desktop().validate(), Ok(()));
        assert_eq!(GameConfig::mobile().validate(), Ok(()));
    }

    #[test]
    fn when_desktop_preset_is_built_then_gun_is_three_quarters_of_a_target() {
        let config = GameConfig::desktop();
        assert_eq!(config.target_size, 156.0);
        assert_eq!(config.emplacement_size, 117.0);
    }

    #[test]
    fn when_width_is_zero_then_config_is_rejected() {
        let config = GameConfig {
            width: 0.0,
            ..GameConfig::desktop()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDimension { field: "width" })
        );
    }

    #[test]
    fn when_height_is_nan_then_config_is_rejected() {
        let config = GameConfig {
            height: f32::NAN,
            ..GameConfig::desktop()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDimension { field: "height" })
        );
    }

    #[test]
    fn when_speed_is_negative_then_config_is_rejected() {
        let config = GameConfig {
            round_speed: -1.0,
            ..GameConfig::desktop()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeSpeed {
                field: "round_speed"
            })
        );
    }

    #[test]
    fn when_fire_interval_is_inverted_then_config_is_rejected() {
        let config = GameConfig {
            fire_interval_min: Duration::from_millis(3000),
            fire_interval_max: Duration::from_millis(1500),
            ..GameConfig::desktop()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvertedFireInterval));
    }

    #[test]
    fn when_spawn_interval_is_zero_then_config_is_rejected() {
        let config = GameConfig {
            ground_target_spawn_interval: 0,
            ..GameConfig::desktop()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroInterval {
                field: "ground_target_spawn_interval"
            })
        );
    }

    #[test]
    fn when_max_health_is_zero_then_config_is_rejected() {
        let config = GameConfig {
            max_health: 0,
            ..GameConfig::desktop()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxHealth));
    }

    #[test]
    fn when_target_is_wider_than_playfield_then_config_is_rejected() {
        let config = GameConfig {
            width: 100.0,
            ..GameConfig::desktop()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EntityTooLarge {
                field: "target_size"
            })
        );
    }

    #[test]
    fn when_run_starts_then_airplane_sits_near_the_bottom_centre() {
        let config = GameConfig::mobile();
        assert_eq!(config.airplane_start(), (150.0, 620.0));
    }
}
