// AABB hit resolution: a pure detection pass followed by an apply pass.

use crate::domain::entities::TargetState;
use crate::domain::ledger::{HitKind, Ledger};
use crate::domain::world::World;

#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    /// Rocket struck a ground target, which moves to `outcome`.
    Target {
        projectile: u64,
        target: u64,
        outcome: TargetState,
        at: (f32, f32),
    },
    Emplacement {
        projectile: u64,
        emplacement: u64,
        at: (f32, f32),
    },
    /// An emplacement round struck the airplane.
    Airplane { round: u64, at: (f32, f32) },
}

/// Totals from applying one tick's hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub points: u32,
    pub targets_damaged: u32,
    pub targets_destroyed: u32,
    pub emplacements_destroyed: u32,
    pub airplane_hit: bool,
}

/// Finds every hit in the current world without touching it.
///
/// Rockets are checked newest first. A rocket is consumed by its first hit, targets
/// first, and target states progress within the pass so two rockets landing on the
/// same pristine target on one tick destroy it. At most one round hits the airplane
/// per tick.
pub fn detect(world: &World) -> Vec<Hit> {
    let mut target_states: Vec<TargetState> = world.targets.iter().map(|t| t.state).collect();
    let mut guns_down: Vec<bool> = world.emplacements.iter().map(|g| g.destroyed).collect();
    let mut hits = Vec::new();

    for rocket in world.projectiles.iter().rev() {
        let struck_target = world
            .targets
            .iter()
            .enumerate()
            .find(|(idx, target)| target_states[*idx].is_live() && rocket.rect.intersects(&target.rect));

        if let Some((idx, target)) = struck_target {
            if let Some(outcome) = target_states[idx].after_hit() {
                target_states[idx] = outcome;
                hits.push(Hit::Target {
                    projectile: rocket.id,
                    target: target.id,
                    outcome,
                    at: target.rect.center(),
                });
            }
            continue;
        }

        let struck_gun = world
            .emplacements
            .iter()
            .enumerate()
            .find(|(idx, gun)| !guns_down[*idx] && rocket.rect.intersects(&gun.rect));

        if let Some((idx, gun)) = struck_gun {
            guns_down[idx] = true;
            hits.push(Hit::Emplacement {
                projectile: rocket.id,
                emplacement: gun.id,
                at: gun.rect.center(),
            });
        }
    }

    let airplane = world.airplane.rect;
    if let Some(round) = world
        .rounds
        .iter()
        .rev()
        .find(|round| round.rect.intersects(&airplane))
    {
        hits.push(Hit::Airplane {
            round: round.id,
            at: airplane.center(),
        });
    }

    hits
}

/// Applies detected hits: removes spent rockets and rounds, updates targets and guns,
/// spawns explosions and books score and damage.
pub fn apply(world: &mut World, ledger: &mut Ledger, hits: &[Hit]) -> CollisionReport {
    let mut report = CollisionReport::default();
    let mut spent_rockets = Vec::new();
    let mut spent_rounds = Vec::new();

    for hit in hits {
        match *hit {
            Hit::Target {
                projectile,
                target,
                outcome,
                at,
            } => {
                spent_rockets.push(projectile);
                if let Some(entry) = world.targets.iter_mut().find(|t| t.id == target) {
                    entry.state = outcome;
                }
                let kind = if outcome == TargetState::Destroyed {
                    report.targets_destroyed += 1;
                    HitKind::TargetDestroyed
                } else {
                    report.targets_damaged += 1;
                    HitKind::TargetDamaged
                };
                report.points += ledger.apply_hit(kind);
                world.spawn_explosion(at);
            }
            Hit::Emplacement {
                projectile,
                emplacement,
                at,
            } => {
                spent_rockets.push(projectile);
                if let Some(gun) = world.emplacements.iter_mut().find(|g| g.id == emplacement) {
                    gun.destroyed = true;
                }
                report.emplacements_destroyed += 1;
                report.points += ledger.apply_hit(HitKind::EmplacementDestroyed);
                world.spawn_explosion(at);
            }
            Hit::Airplane { round, at } => {
                spent_rounds.push(round);
                ledger.take_damage();
                report.airplane_hit = true;
                world.spawn_explosion(at);
            }
        }
    }

    if !spent_rockets.is_empty() {
        world.projectiles.retain(|p| !spent_rockets.contains(&p.id));
    }
    if !spent_rounds.is_empty() {
        world.rounds.retain(|r| !spent_rounds.contains(&r.id));
    }

    report
}

pub fn resolve(world: &mut World, ledger: &mut Ledger) -> CollisionReport {
    let hits = detect(world);
    apply(world, ledger, &hits)
}
