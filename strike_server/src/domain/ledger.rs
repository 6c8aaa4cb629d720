// Score and health bookkeeping for a single run.

/// Scoring events produced by the collision resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    TargetDamaged,
    TargetDestroyed,
    EmplacementDestroyed,
}

impl HitKind {
    pub fn points(self) -> u32 {
        match self {
            HitKind::TargetDamaged => 1,
            HitKind::TargetDestroyed => 2,
            HitKind::EmplacementDestroyed => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub score: u32,
    /// Targets taken from pristine to damaged.
    pub hit_count: u32,
    /// Targets taken from damaged to destroyed.
    pub destroyed_count: u32,
    pub emplacement_kills: u32,
    pub health: u32,
    pub max_health: u32,
}

impl Ledger {
    pub fn new(max_health: u32) -> Self {
        Self {
            score: 0,
            hit_count: 0,
            destroyed_count: 0,
            emplacement_kills: 0,
            health: max_health,
            max_health,
        }
    }

    /// Records a hit and returns the points it was worth. Score never decreases.
    pub fn apply_hit(&mut self, kind: HitKind) -> u32 {
        match kind {
            HitKind::TargetDamaged => self.hit_count += 1,
            HitKind::TargetDestroyed => self.destroyed_count += 1,
            HitKind::EmplacementDestroyed => self.emplacement_kills += 1,
        }
        let points = kind.points();
        self.score = self.score.saturating_add(points);
        points
    }

    /// Removes one health point, floored at zero. Returns the remaining health.
    pub fn take_damage(&mut self) -> u32 {
        self.health = self.health.saturating_sub(1);
        self.health
    }

    pub fn is_depleted(&self) -> bool {
        self.health == 0
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.max_health);
    }
}

/// True when `score` would enter the best `top_n` of `recorded`.
///
/// Fewer than `top_n` recorded scores always qualifies; otherwise the score must beat
/// the lowest of the best `top_n` (ties do not displace an earlier entry).
pub fn qualifies_for_high_score(recorded: &[u32], score: u32, top_n: usize) -> bool {
    if recorded.len() < top_n {
        return true;
    }

    let mut best = recorded.to_vec();
    best.sort_unstable_by(|a, b| b.cmp(a));
    best.truncate(top_n);

    match best.iter().min() {
        Some(lowest) => score > *lowest,
        None => true,
    }
}
