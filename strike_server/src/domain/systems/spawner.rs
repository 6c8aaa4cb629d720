// Rejection-sampling placement for ground targets and emplacements.

use crate::domain::entities::Side;
use crate::domain::geometry::Rect;
use crate::domain::tuning::GameConfig;
use crate::domain::world::World;
use rand::Rng;
use tracing::debug;

pub const TARGET_PLACEMENT_ATTEMPTS: u32 = 20;
/// Minimum horizontal gap between targets, as a multiple of the target size.
pub const TARGET_SPACING_FACTOR: f32 = 1.5;
/// Targets closer than this many sizes vertically are checked for spacing.
pub const TARGET_VERTICAL_WINDOW_FACTOR: f32 = 2.0;

pub const EMPLACEMENT_PLACEMENT_ATTEMPTS: u32 = 30;
pub const EMPLACEMENT_SIDE_MARGIN: f32 = 50.0;
pub const EMPLACEMENT_BAND_TOP: f32 = 150.0;
/// Vertical space kept free of emplacements (top band plus bottom band).
pub const EMPLACEMENT_BAND_RESERVED: f32 = 300.0;
pub const EMPLACEMENT_TARGET_CLEARANCE: f32 = 20.0;
pub const EMPLACEMENT_SPACING_FACTOR: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The candidate respected the spacing rule.
    Clear,
    /// Every attempt collided; the last candidate was used anyway.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmplacementSpot {
    pub x: f32,
    pub y: f32,
    pub side: Side,
}

/// Picks an x for a new ground target at height `y`.
pub fn place_ground_target<R: Rng + ?Sized>(
    rng: &mut R,
    world: &World,
    config: &GameConfig,
    y: f32,
) -> (f32, Placement) {
    let size = config.target_size;
    let span = (config.width - size).max(0.0);
    let min_spacing = size * TARGET_SPACING_FACTOR;
    let window = size * TARGET_VERTICAL_WINDOW_FACTOR;

    let mut x = 0.0;
    for _ in 0..TARGET_PLACEMENT_ATTEMPTS {
        x = rng.r#gen::<f32>() * span;
        let crowded = world.live_targets().any(|target| {
            (x - target.rect.x).abs() < min_spacing && (y - target.rect.y).abs() < window
        });
        if !crowded {
            return (x, Placement::Clear);
        }
    }

    debug!(x, y, "no clear spot for ground target, placing anyway");
    (x, Placement::BestEffort)
}

/// Picks a spot for a new emplacement, or `None` when every attempt collided.
pub fn place_emplacement<R: Rng + ?Sized>(
    rng: &mut R,
    world: &World,
    config: &GameConfig,
) -> Option<EmplacementSpot> {
    let size = config.emplacement_size;
    let (side, x) = if rng.gen_bool(0.5) {
        (Side::Left, EMPLACEMENT_SIDE_MARGIN)
    } else {
        (Side::Right, config.width - size - EMPLACEMENT_SIDE_MARGIN)
    };
    let band = config.height - size - EMPLACEMENT_BAND_RESERVED;
    let min_spacing = size * EMPLACEMENT_SPACING_FACTOR;

    for _ in 0..EMPLACEMENT_PLACEMENT_ATTEMPTS {
        let y = rng.r#gen::<f32>() * band + EMPLACEMENT_BAND_TOP;
        let candidate = Rect::new(x, y, size, size);

        let near_target = world.live_targets().any(|target| {
            candidate.intersects(&target.rect.expanded(EMPLACEMENT_TARGET_CLEARANCE))
        });
        let near_gun = world.live_emplacements().any(|gun| {
            (x - gun.rect.x).hypot(y - gun.rect.y) < min_spacing
        });

        if !near_target && !near_gun {
            return Some(EmplacementSpot { x, y, side });
        }
    }

    debug!(?side, "no clear spot for emplacement, skipping spawn");
    None
}
