use crate::domain::entities::{
    Airplane, Emplacement, EmplacementRound, Explosion, GroundTarget, Projectile,
};
use crate::domain::geometry::Rect;

/// Every entity alive in a session, plus the scrolling background offset.
#[derive(Debug, Clone)]
pub struct World {
    pub airplane: Airplane,
    pub projectiles: Vec<Projectile>,
    pub targets: Vec<GroundTarget>,
    pub emplacements: Vec<Emplacement>,
    pub rounds: Vec<EmplacementRound>,
    pub explosions: Vec<Explosion>,
    pub background_offset: f32,
    next_id: u64,
}

impl World {
    pub fn new(airplane: Airplane) -> Self {
        Self {
            airplane,
            projectiles: Vec::new(),
            targets: Vec::new(),
            emplacements: Vec::new(),
            rounds: Vec::new(),
            explosions: Vec::new(),
            background_offset: 0.0,
            next_id: 1,
        }
    }

    /// Allocates a session-unique entity id. Ids are never reused, even across resets.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_explosion(&mut self, (x, y): (f32, f32)) -> u64 {
        let id = self.next_id();
        self.explosions.push(Explosion::at(id, x, y));
        id
    }

    /// Empties every collection and puts the airplane back at `start`.
    pub fn clear(&mut self, start: (f32, f32)) {
        self.projectiles.clear();
        self.targets.clear();
        self.emplacements.clear();
        self.rounds.clear();
        self.explosions.clear();
        self.background_offset = 0.0;
        let Rect { w, h, .. } = self.airplane.rect;
        self.airplane.rect = Rect::new(start.0, start.1, w, h);
    }

    pub fn live_targets(&self) -> impl Iterator<Item = &GroundTarget> {
        self.targets.iter().filter(|target| target.is_live())
    }

    pub fn live_emplacements(&self) -> impl Iterator<Item = &Emplacement> {
        self.emplacements.iter().filter(|gun| !gun.destroyed)
    }
}
