use crate::domain::entities::{Airplane, Body};
use crate::domain::geometry::Playfield;
use crate::domain::input::InputFlags;
use crate::domain::tuning::AirplaneTuning;

/// Advances every body one tick and drops the expired ones, keeping order.
pub fn advance_all<T: Body>(bodies: &mut Vec<T>, field: Playfield) {
    for body in bodies.iter_mut() {
        body.advance();
    }
    bodies.retain(|body| !body.is_expired(field));
}

/// Background scroll offset after one tick, wrapped to a single tile.
pub fn scroll_background(offset: f32, speed: f32, tile_height: f32) -> f32 {
    (offset + speed).rem_euclid(tile_height)
}

/// Moves the airplane by the held direction flags and clamps it to its allowed box.
/// Each axis is clamped independently.
pub fn steer_airplane(
    airplane: &mut Airplane,
    input: &InputFlags,
    tuning: &AirplaneTuning,
    field: Playfield,
) {
    let step_x = airplane.speed;
    let step_y = airplane.speed * tuning.vertical_factor;
    let rect = &mut airplane.rect;

    if input.move_left {
        rect.x -= step_x;
    }
    if input.move_right {
        rect.x += step_x;
    }
    if input.move_up {
        rect.y -= step_y;
    }
    if input.move_down {
        rect.y += step_y;
    }

    let max_x = (field.width - rect.w).max(0.0);
    let max_y = (field.height - rect.h - tuning.bottom_margin).max(tuning.top_margin);
    rect.x = rect.x.clamp(0.0, max_x);
    rect.y = rect.y.clamp(tuning.top_margin, max_y);
}
