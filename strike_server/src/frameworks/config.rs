use crate::domain::GameConfig;
use std::{env, str::FromStr, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    parsed("STRIKE_SERVER_PORT").unwrap_or(3001)
}

/// Base URL of the external high-score table. Unset means scores stay in memory.
pub fn leaderboard_url() -> Option<String> {
    env::var("LEADERBOARD_URL")
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

pub fn leaderboard_api_key() -> Option<String> {
    env::var("LEADERBOARD_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}

pub fn leaderboard_timeout() -> Duration {
    Duration::from_millis(parsed("LEADERBOARD_TIMEOUT_MS").unwrap_or(1500))
}

/// Pins every session to one seed when set.
pub fn session_seed() -> Option<u64> {
    parsed("STRIKE_SEED")
}

/// Layout preset plus per-option overrides. Validation happens when sessions are built.
pub fn game_config() -> GameConfig {
    let mut config = match env::var("STRIKE_LAYOUT").as_deref() {
        Ok("mobile") => GameConfig::mobile(),
        Ok("desktop") | Err(_) => GameConfig::desktop(),
        Ok(other) => {
            tracing::warn!(layout = other, "unknown layout; using desktop");
            GameConfig::desktop()
        }
    };

    override_with(&mut config.width, "STRIKE_WIDTH");
    override_with(&mut config.height, "STRIKE_HEIGHT");
    override_with(&mut config.activation_score, "STRIKE_ACTIVATION_SCORE");
    override_with(&mut config.max_health, "STRIKE_MAX_HEALTH");
    override_with(&mut config.background_speed, "STRIKE_BACKGROUND_SPEED");
    override_with(&mut config.projectile_speed, "STRIKE_PROJECTILE_SPEED");
    override_with(&mut config.round_speed, "STRIKE_ROUND_SPEED");
    override_with(
        &mut config.ground_target_spawn_interval,
        "STRIKE_TARGET_SPAWN_INTERVAL",
    );
    override_with(
        &mut config.emplacement_spawn_interval,
        "STRIKE_EMPLACEMENT_SPAWN_INTERVAL",
    );
    override_with(&mut config.engagement_range, "STRIKE_ENGAGEMENT_RANGE");
    if let Some(ms) = parsed::<u64>("STRIKE_FIRE_INTERVAL_MIN_MS") {
        config.fire_interval_min = Duration::from_millis(ms);
    }
    if let Some(ms) = parsed::<u64>("STRIKE_FIRE_INTERVAL_MAX_MS") {
        config.fire_interval_max = Duration::from_millis(ms);
    }
    override_with(&mut config.features.emplacements, "STRIKE_EMPLACEMENTS");
    override_with(&mut config.features.leaderboard, "STRIKE_LEADERBOARD");

    config
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

fn override_with<T: FromStr>(slot: &mut T, key: &str) {
    if let Some(value) = parsed(key) {
        *slot = value;
    }
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 60);
