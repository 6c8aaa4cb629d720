// Domain-level simulation entities. Pure data plus per-tick motion rules.

use crate::domain::geometry::{Playfield, Rect};
use crate::domain::tuning::effects::{
    EMPLACEMENT_FADE_IN_MS, EXPLOSION_FADE, EXPLOSION_GROWTH, EXPLOSION_INITIAL_RADIUS,
    EXPLOSION_MAX_AGE, EXPLOSION_MAX_RADIUS, PROJECTILE_HEIGHT, PROJECTILE_WIDTH,
    ROUND_BOUNDS_MARGIN, ROUND_SIZE, TARGET_GLOW_STEP, TARGET_REMOVAL_MARGIN,
};

/// Shared behaviour of every moving entity kind.
pub trait Body {
    fn bounds(&self) -> Rect;

    /// Applies one tick of motion/animation.
    fn advance(&mut self);

    /// True once the entity should be removed from its collection.
    fn is_expired(&self, field: Playfield) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Airplane {
    pub rect: Rect,
    /// Horizontal step per tick.
    pub speed: f32,
}

impl Airplane {
    pub fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Player rocket. Travels straight up.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub rect: Rect,
    pub speed: f32,
}

impl Projectile {
    /// Rocket leaving the airplane's nose.
    pub fn launched_from(id: u64, airplane: &Airplane, speed: f32) -> Self {
        let (center_x, _) = airplane.rect.center();
        Self {
            id,
            rect: Rect::new(
                center_x - PROJECTILE_WIDTH / 2.0,
                airplane.rect.y,
                PROJECTILE_WIDTH,
                PROJECTILE_HEIGHT,
            ),
            speed,
        }
    }
}

impl Body for Projectile {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn advance(&mut self) {
        self.rect.y -= self.speed;
    }

    fn is_expired(&self, _field: Playfield) -> bool {
        self.rect.bottom() < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Pristine,
    Damaged,
    Destroyed,
}

impl TargetState {
    /// State after one more rocket hit, or `None` if the target is already gone.
    pub fn after_hit(self) -> Option<TargetState> {
        match self {
            TargetState::Pristine => Some(TargetState::Damaged),
            TargetState::Damaged => Some(TargetState::Destroyed),
            TargetState::Destroyed => None,
        }
    }

    pub fn is_live(self) -> bool {
        self != TargetState::Destroyed
    }
}

/// Reactor scrolling down with the background.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundTarget {
    pub id: u64,
    pub rect: Rect,
    pub speed: f32,
    pub state: TargetState,
    // Cosmetic only; renderers use it for the pulsing core.
    pub glow_phase: f32,
}

impl GroundTarget {
    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }
}

impl Body for GroundTarget {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn advance(&mut self) {
        self.rect.y += self.speed;
        self.glow_phase += TARGET_GLOW_STEP;
    }

    fn is_expired(&self, field: Playfield) -> bool {
        self.rect.y > field.height + TARGET_REMOVAL_MARGIN
    }
}

/// Screen edge an emplacement is anchored to. Only affects which sprite faces the airplane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Anti-aircraft gun.
#[derive(Debug, Clone, PartialEq)]
pub struct Emplacement {
    pub id: u64,
    pub rect: Rect,
    pub speed: f32,
    pub side: Side,
    pub destroyed: bool,

    // Wall-clock bookkeeping in clock milliseconds.
    pub spawned_at_ms: u64,
    pub last_fire_ms: u64,
    pub fire_interval_ms: u64,
}

impl Emplacement {
    pub fn is_on_screen(&self, field: Playfield) -> bool {
        self.rect.y > -self.rect.h && self.rect.y < field.height
    }

    pub fn ready_to_fire(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_fire_ms) > self.fire_interval_ms
    }

    /// Opacity ramp for freshly spawned guns, 0.0..=1.0.
    pub fn fade_in(&self, now_ms: u64) -> f32 {
        let since = now_ms.saturating_sub(self.spawned_at_ms);
        (since as f32 / EMPLACEMENT_FADE_IN_MS as f32).min(1.0)
    }
}

impl Body for Emplacement {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn advance(&mut self) {
        self.rect.y += self.speed;
    }

    fn is_expired(&self, field: Playfield) -> bool {
        self.destroyed || self.rect.y > field.height + self.rect.h
    }
}

/// Round fired by an emplacement. Velocity is fixed when fired.
#[derive(Debug, Clone, PartialEq)]
pub struct EmplacementRound {
    pub id: u64,
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
}

impl EmplacementRound {
    /// Round centred on `origin`.
    pub fn fired_from(id: u64, origin: (f32, f32), vx: f32, vy: f32) -> Self {
        Self {
            id,
            rect: Rect::new(
                origin.0 - ROUND_SIZE / 2.0,
                origin.1 - ROUND_SIZE / 2.0,
                ROUND_SIZE,
                ROUND_SIZE,
            ),
            vx,
            vy,
        }
    }
}

impl Body for EmplacementRound {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn advance(&mut self) {
        self.rect.x += self.vx;
        self.rect.y += self.vy;
    }

    fn is_expired(&self, field: Playfield) -> bool {
        self.rect.x < -ROUND_BOUNDS_MARGIN
            || self.rect.x > field.width + ROUND_BOUNDS_MARGIN
            || self.rect.y < -ROUND_BOUNDS_MARGIN
            || self.rect.y > field.height + ROUND_BOUNDS_MARGIN
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub max_radius: f32,
    pub opacity: f32,
    pub age: u32,
}

impl Explosion {
    pub fn at(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            radius: EXPLOSION_INITIAL_RADIUS,
            max_radius: EXPLOSION_MAX_RADIUS,
            opacity: 1.0,
            age: 0,
        }
    }
}

impl Body for Explosion {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.x - self.radius,
            self.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    fn advance(&mut self) {
        self.age += 1;
        self.radius += EXPLOSION_GROWTH;
        self.opacity -= EXPLOSION_FADE;
    }

    fn is_expired(&self, _field: Playfield) -> bool {
        self.age > EXPLOSION_MAX_AGE || self.opacity <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: Playfield = Playfield {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn when_target_is_hit_then_state_progresses_to_destroyed() {
        assert_eq!(TargetState::Pristine.after_hit(), Some(TargetState::Damaged));
        assert_eq!(TargetState::Damaged.after_hit(), Some(TargetState::Destroyed));
        assert_eq!(TargetState::Destroyed.after_hit(), None);
    }

    #[test]
    fn when_rocket_clears_the_top_then_it_expires() {
        let mut rocket = Projectile {
            id: 1,
            rect: Rect::new(10.0, 0.0, 4.0, 12.0),
            speed: 8.0,
        };
        rocket.advance();
        assert_eq!(rocket.rect.y, -8.0);
        assert!(!rocket.is_expired(FIELD));
        rocket.advance();
        assert!(rocket.is_expired(FIELD));
    }

    #[test]
    fn when_rocket_launches_then_it_leaves_the_airplane_nose() {
        let airplane = Airplane {
            rect: Rect::new(100.0, 400.0, 100.0, 120.0),
            speed: 4.0,
        };
        let rocket = Projectile::launched_from(7, &airplane, 8.0);
        assert_eq!(rocket.rect, Rect::new(148.0, 400.0, 4.0, 12.0));
    }

    #[test]
    fn when_round_leaves_any_side_then_it_expires_past_the_margin() {
        let inside = EmplacementRound::fired_from(1, (-8.0, 300.0), 0.0, 0.0);
        assert!(!inside.is_expired(FIELD));

        for origin in [(-20.0, 300.0), (820.0, 300.0), (400.0, -20.0), (400.0, 620.0)] {
            let round = EmplacementRound::fired_from(2, origin, 0.0, 0.0);
            assert!(round.is_expired(FIELD), "round at {origin:?} should expire");
        }
    }

    #[test]
    fn when_explosion_advances_then_it_grows_fades_and_expires() {
        let mut explosion = Explosion::at(1, 50.0, 50.0);
        explosion.advance();
        assert_eq!(explosion.age, 1);
        assert_eq!(explosion.radius, 7.0);
        assert!((explosion.opacity - 0.98).abs() < 1e-6);

        let mut ticks = 1;
        while !explosion.is_expired(FIELD) {
            explosion.advance();
            ticks += 1;
        }
        assert!(ticks <= 51);
    }

    #[test]
    fn when_gun_spawns_then_it_fades_in_over_one_second() {
        let gun = Emplacement {
            id: 1,
            rect: Rect::new(50.0, 200.0, 117.0, 117.0),
            speed: 2.0,
            side: Side::Left,
            destroyed: false,
            spawned_at_ms: 1_000,
            last_fire_ms: 0,
            fire_interval_ms: 1_500,
        };
        assert_eq!(gun.fade_in(1_000), 0.0);
        assert_eq!(gun.fade_in(1_500), 0.5);
        assert_eq!(gun.fade_in(5_000), 1.0);
    }

    #[test]
    fn when_gun_is_destroyed_then_it_is_expired() {
        let mut gun = Emplacement {
            id: 1,
            rect: Rect::new(50.0, 200.0, 117.0, 117.0),
            speed: 2.0,
            side: Side::Right,
            destroyed: false,
            spawned_at_ms: 0,
            last_fire_ms: 0,
            fire_interval_ms: 1_500,
        };
        assert!(!gun.is_expired(FIELD));
        gun.destroyed = true;
        assert!(gun.is_expired(FIELD));
    }
}
