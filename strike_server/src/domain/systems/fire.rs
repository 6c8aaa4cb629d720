// Aim-and-forget fire for anti-aircraft emplacements.

use crate::domain::entities::EmplacementRound;
use crate::domain::geometry::Playfield;
use crate::domain::world::World;

/// Velocity of a round fired from `origin` at `target`.
///
/// `None` when the target is out of `range` or sits exactly on the origin.
pub fn aim_round(origin: (f32, f32), target: (f32, f32), speed: f32, range: f32) -> Option<(f32, f32)> {
    let dx = target.0 - origin.0;
    let dy = target.1 - origin.1;
    let distance = dx.hypot(dy);
    if distance > range || distance == 0.0 {
        return None;
    }
    Some((dx / distance * speed, dy / distance * speed))
}

/// Lets every on-screen emplacement whose interval elapsed take its shot.
/// Returns the number of rounds fired.
pub fn fire_emplacements(
    world: &mut World,
    field: Playfield,
    now_ms: u64,
    round_speed: f32,
    range: f32,
) -> usize {
    let aim_point = world.airplane.rect.center();
    let mut shots = Vec::new();

    for gun in world.emplacements.iter_mut() {
        if gun.destroyed || !gun.is_on_screen(field) || !gun.ready_to_fire(now_ms) {
            continue;
        }
        // The interval restarts even when the airplane is out of range.
        gun.last_fire_ms = now_ms;

        let origin = gun.rect.center();
        if let Some((vx, vy)) = aim_round(origin, aim_point, round_speed, range) {
            shots.push((origin, vx, vy));
        }
    }

    let fired = shots.len();
    for (origin, vx, vy) in shots {
        let id = world.next_id();
        world
            .rounds
            .push(EmplacementRound::fired_from(id, origin, vx, vy));
    }
    fired
}
