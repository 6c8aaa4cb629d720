// Explicit simulation context: owns every entity, timer, the RNG and the ledger for one
// game session and advances them one tick at a time.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use super::types::{Cue, EmplacementView, SimEvent, WorldUpdate};
use crate::domain::entities::{Airplane, Emplacement, GroundTarget, Projectile, TargetState};
use crate::domain::systems::{Placement, collision, fire, motion, spawner};
use crate::domain::{
    Clock, ConfigError, GameConfig, GamePhase, InputFlags, Ledger, NameEntry, PlayerAction, Rect,
    ScoreEntry, Transition, World,
};

/// Heights of the targets placed when a run starts.
pub const STARTING_TARGET_ROWS: [f32; 3] = [0.0, -200.0, -400.0];

pub struct Simulation<C: Clock> {
    config: GameConfig,
    clock: C,
    rng: ChaCha8Rng,

    world: World,
    ledger: Ledger,
    phase: GamePhase,
    input: InputFlags,

    tick: u64,
    target_timer: u32,
    emplacement_timer: u32,
    emplacements_armed: bool,
    shoot_cooldown: u32,

    // Bumped on every StartGame; high-score verdicts for other runs are dropped.
    run: u64,
    name_entry: NameEntry,
    name_entry_granted: bool,
    top_scores: Vec<ScoreEntry>,

    events: Vec<SimEvent>,
    cues: Vec<Cue>,
}

impl<C: Clock> Simulation<C> {
    pub fn new(config: GameConfig, clock: C, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let (x, y) = config.airplane_start();
        let airplane = Airplane {
            rect: Rect::new(x, y, config.airplane.width, config.airplane.height),
            speed: config.airplane.speed,
        };
        let ledger = Ledger::new(config.max_health);

        Ok(Self {
            config,
            clock,
            rng: ChaCha8Rng::seed_from_u64(seed),
            world: World::new(airplane),
            ledger,
            phase: GamePhase::Splash,
            input: InputFlags::default(),
            tick: 0,
            target_timer: 0,
            emplacement_timer: 0,
            emplacements_armed: false,
            shoot_cooldown: 0,
            run: 0,
            name_entry: NameEntry::default(),
            name_entry_granted: false,
            top_scores: Vec::new(),
            events: Vec::new(),
            cues: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn top_scores(&self) -> &[ScoreEntry] {
        &self.top_scores
    }

    pub fn name_buffer(&self) -> &str {
        self.name_entry.as_str()
    }

    /// Replaces the held control flags. They stay in effect until the next call.
    pub fn set_input(&mut self, input: InputFlags) {
        self.input = input;
    }

    /// Applies a one-shot action. Actions the current phase does not accept are ignored.
    pub fn handle_action(&mut self, action: PlayerAction) {
        let Some(transition) = self.phase.on_action(&action) else {
            debug!(?action, phase = ?self.phase.kind(), "action ignored");
            return;
        };

        match transition {
            Transition::StartRun => self.start_run(),
            Transition::AbandonRun => {
                info!(run = self.run, score = self.ledger.score, "run abandoned");
                self.return_to_splash(true);
            }
            Transition::ShowTopScores => {
                self.phase = GamePhase::TopScores;
                if self.config.features.leaderboard {
                    self.events.push(SimEvent::LeaderboardRequested);
                } else {
                    self.top_scores.clear();
                }
            }
            Transition::CloseTopScores => self.phase = GamePhase::Splash,
            Transition::EditName(key) => {
                self.name_entry.press(key);
            }
            Transition::SubmitName(text) => {
                if let Some(text) = text {
                    self.name_entry.replace(&text);
                }
                let name = self.name_entry.submitted_name();
                let score = self.ledger.score;
                info!(%name, score, "high score submitted");
                self.events.push(SimEvent::ScoreSubmitted { name, score });
                // The submit path refreshes the board once the entry is stored.
                self.return_to_splash(false);
            }
            Transition::CancelNameEntry => {
                info!(score = self.ledger.score, "name entry cancelled");
                self.return_to_splash(true);
            }
        }
    }

    /// Records the asynchronous high-score check. Takes effect at the next tick.
    pub fn record_high_score_verdict(&mut self, run: u64, qualifies: bool) {
        let current = run == self.run && matches!(self.phase, GamePhase::GameOver { .. });
        if !current {
            debug!(run, current_run = self.run, "stale high-score verdict ignored");
            return;
        }
        if qualifies {
            self.name_entry_granted = true;
        }
    }

    pub fn load_top_scores(&mut self, scores: Vec<ScoreEntry>) {
        self.top_scores = scores;
    }

    /// Events raised since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advances the session by one tick.
    pub fn tick(&mut self) {
        self.tick += 1;
        self.cues.clear();
        let now = self.clock.now_millis();

        match self.phase {
            GamePhase::Playing => self.step(now),
            GamePhase::GameOver { at_ms } => {
                if self.name_entry_granted {
                    self.name_entry_granted = false;
                    self.name_entry.clear();
                    self.phase = GamePhase::NameInput;
                    info!(score = self.ledger.score, "new high score, awaiting name");
                } else if now.saturating_sub(at_ms) >= self.dwell_ms() {
                    self.return_to_splash(true);
                }
            }
            GamePhase::Splash | GamePhase::NameInput | GamePhase::TopScores => {}
        }
    }

    /// Places a new ground target at `y` (default: just above the top edge).
    pub fn spawn_ground_target(&mut self, y: Option<f32>) -> Placement {
        let size = self.config.target_size;
        let y = y.unwrap_or(-size);
        let (x, placement) = spawner::place_ground_target(&mut self.rng, &self.world, &self.config, y);

        let id = self.world.next_id();
        let glow_phase = self.rng.gen_range(0.0..TAU);
        self.world.targets.push(GroundTarget {
            id,
            rect: Rect::new(x, y, size, size),
            speed: self.config.background_speed,
            state: TargetState::Pristine,
            glow_phase,
        });
        debug!(id, x, y, ?placement, "ground target spawned");
        placement
    }

    /// Places a new emplacement when the feature is on and the score allows it.
    /// Returns the new entity id, or `None` when nothing was spawned.
    pub fn spawn_emplacement(&mut self) -> Option<u64> {
        if !self.config.features.emplacements || self.ledger.score < self.config.activation_score {
            return None;
        }

        let spot = spawner::place_emplacement(&mut self.rng, &self.world, &self.config)?;
        let now = self.clock.now_millis();
        let fire_interval_ms = self.draw_fire_interval();
        let size = self.config.emplacement_size;

        let id = self.world.next_id();
        self.world.emplacements.push(Emplacement {
            id,
            rect: Rect::new(spot.x, spot.y, size, size),
            speed: self.config.background_speed,
            side: spot.side,
            destroyed: false,
            spawned_at_ms: now,
            last_fire_ms: 0,
            fire_interval_ms,
        });
        debug!(id, x = spot.x, y = spot.y, side = ?spot.side, fire_interval_ms, "emplacement spawned");
        Some(id)
    }

    pub fn snapshot(&self) -> WorldUpdate {
        let now = self.clock.now_millis();
        WorldUpdate {
            tick: self.tick,
            phase: self.phase.kind(),
            airplane: self.world.airplane.clone(),
            projectiles: self.world.projectiles.clone(),
            targets: self.world.targets.clone(),
            emplacements: self
                .world
                .emplacements
                .iter()
                .map(|gun| EmplacementView {
                    gun: gun.clone(),
                    fade: gun.fade_in(now),
                })
                .collect(),
            rounds: self.world.rounds.clone(),
            explosions: self.world.explosions.clone(),
            ledger: self.ledger.clone(),
            background_offset: self.world.background_offset,
            name_buffer: self.name_entry.as_str().to_string(),
            top_scores: self.top_scores.clone(),
            cues: self.cues.clone(),
        }
    }

    // One Playing tick: motion and spawning, then collisions on the moved world.
    fn step(&mut self, now: u64) {
        let field = self.config.playfield();

        if !self.emplacements_armed
            && self.config.features.emplacements
            && self.ledger.score >= self.config.activation_score
        {
            self.emplacements_armed = true;
            info!(score = self.ledger.score, "emplacements armed");
            self.events.push(SimEvent::EmplacementsArmed {
                score: self.ledger.score,
            });
        }

        self.world.background_offset = motion::scroll_background(
            self.world.background_offset,
            self.config.background_speed,
            self.config.background_tile_height,
        );

        motion::steer_airplane(
            &mut self.world.airplane,
            &self.input,
            &self.config.airplane,
            field,
        );
        if self.input.fire && self.shoot_cooldown == 0 {
            let id = self.world.next_id();
            let rocket =
                Projectile::launched_from(id, &self.world.airplane, self.config.projectile_speed);
            self.world.projectiles.push(rocket);
            self.shoot_cooldown = self.config.airplane.shoot_cooldown_ticks;
        }
        motion::advance_all(&mut self.world.projectiles, field);

        self.target_timer += 1;
        if self.target_timer >= self.config.ground_target_spawn_interval {
            self.target_timer = 0;
            self.spawn_ground_target(None);
        }
        motion::advance_all(&mut self.world.targets, field);

        if self.emplacements_armed {
            self.emplacement_timer += 1;
            if self.emplacement_timer >= self.config.emplacement_spawn_interval {
                self.emplacement_timer = 0;
                self.spawn_emplacement();
            }
        }
        motion::advance_all(&mut self.world.emplacements, field);
        fire::fire_emplacements(
            &mut self.world,
            field,
            now,
            self.config.round_speed,
            self.config.engagement_range,
        );

        motion::advance_all(&mut self.world.rounds, field);
        motion::advance_all(&mut self.world.explosions, field);

        let report = collision::resolve(&mut self.world, &mut self.ledger);
        self.record_cues(&report);
        if report.targets_destroyed > 0 {
            info!(score = self.ledger.score, "reactor destroyed");
        }
        if report.emplacements_destroyed > 0 {
            info!(score = self.ledger.score, "emplacement destroyed");
        }
        if report.airplane_hit {
            info!(
                health = self.ledger.health,
                max_health = self.ledger.max_health,
                "airplane hit"
            );
        }

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);

        if self.ledger.is_depleted() {
            self.enter_game_over(now);
        }
    }

    fn record_cues(&mut self, report: &collision::CollisionReport) {
        let counts = [
            (report.targets_damaged, Cue::TargetDamaged),
            (report.targets_destroyed, Cue::TargetDestroyed),
            (report.emplacements_destroyed, Cue::EmplacementDestroyed),
            (u32::from(report.airplane_hit), Cue::AirplaneHit),
        ];
        for (count, cue) in counts {
            for _ in 0..count {
                self.cues.push(cue);
            }
        }
    }

    fn enter_game_over(&mut self, now: u64) {
        let score = self.ledger.score;
        self.phase = GamePhase::GameOver { at_ms: now };
        self.name_entry_granted = false;
        info!(run = self.run, score, "game over");

        self.events.push(SimEvent::GameOver {
            run: self.run,
            score,
        });
        if self.config.features.leaderboard {
            self.events.push(SimEvent::HighScoreCheck {
                run: self.run,
                score,
            });
        }
    }

    fn start_run(&mut self) {
        self.reset();
        self.run += 1;
        self.phase = GamePhase::Playing;
        for y in STARTING_TARGET_ROWS {
            self.spawn_ground_target(Some(y));
        }
        info!(run = self.run, "run started");
        self.events.push(SimEvent::RunStarted { run: self.run });
    }

    fn return_to_splash(&mut self, refresh_scores: bool) {
        self.reset();
        self.phase = GamePhase::Splash;
        if refresh_scores && self.config.features.leaderboard {
            self.events.push(SimEvent::LeaderboardRequested);
        }
    }

    fn reset(&mut self) {
        self.world.clear(self.config.airplane_start());
        self.ledger.reset();
        self.target_timer = 0;
        self.emplacement_timer = 0;
        self.emplacements_armed = false;
        self.shoot_cooldown = 0;
        self.name_entry.clear();
        self.name_entry_granted = false;
    }

    fn draw_fire_interval(&mut self) -> u64 {
        let min = duration_ms(self.config.fire_interval_min);
        let max = duration_ms(self.config.fire_interval_max);
        if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    fn dwell_ms(&self) -> u64 {
        duration_ms(self.config.game_over_dwell)
    }
}

fn duration_ms(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
