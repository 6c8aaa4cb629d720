// Domain layer: core simulation types and rules.

pub mod entities;
pub mod errors;
pub mod geometry;
pub mod input;
pub mod ledger;
pub mod name_entry;
pub mod phase;
pub mod ports;
pub mod systems;
pub mod tuning;
pub mod world;

pub use entities::{
    Airplane, Body, Emplacement, EmplacementRound, Explosion, GroundTarget, Projectile, Side,
    TargetState,
};
pub use errors::{ConfigError, LeaderboardError};
pub use geometry::{Playfield, Rect};
pub use input::{InputFlags, NameKey, PlayerAction};
pub use ledger::{HitKind, Ledger, qualifies_for_high_score};
pub use name_entry::NameEntry;
pub use phase::{GamePhase, PhaseKind, Transition};
pub use ports::{Clock, LeaderboardStore, ScoreEntry};
pub use tuning::{AirplaneTuning, FeatureFlags, GameConfig};
pub use world::World;
