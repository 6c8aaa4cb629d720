// Per-tick systems driven by the simulation.

pub mod collision;
pub mod fire;
pub mod motion;
pub mod spawner;

pub use collision::{CollisionReport, Hit};
pub use spawner::{EmplacementSpot, Placement};
