// Gameplay tuning, kept separate from runtime/server configuration (tick rates, buffer sizes, etc.).

pub mod airplane;
pub mod effects;
pub mod playfield;

pub use airplane::AirplaneTuning;
pub use playfield::{FeatureFlags, GameConfig};
