// Fixed sizes and per-tick deltas for short-lived entities.

pub const PROJECTILE_WIDTH: f32 = 4.0;
pub const PROJECTILE_HEIGHT: f32 = 12.0;

pub const ROUND_SIZE: f32 = 4.0;
// Rounds survive this far outside the playfield before being retired.
pub const ROUND_BOUNDS_MARGIN: f32 = 10.0;

pub const TARGET_REMOVAL_MARGIN: f32 = 120.0;
pub const TARGET_GLOW_STEP: f32 = 0.1;

pub const EXPLOSION_INITIAL_RADIUS: f32 = 5.0;
pub const EXPLOSION_MAX_RADIUS: f32 = 60.0;
pub const EXPLOSION_GROWTH: f32 = 2.0;
pub const EXPLOSION_FADE: f32 = 0.02;
pub const EXPLOSION_MAX_AGE: u32 = 50;

// Emplacements fade in over this many milliseconds after spawning.
pub const EMPLACEMENT_FADE_IN_MS: u64 = 1000;
