// Wire protocol DTOs and conversions for public game server messages.

use crate::domain::{
    Emplacement, GroundTarget, InputFlags, Ledger, NameKey, PhaseKind, PlayerAction, Rect,
    ScoreEntry, Side, TargetState,
};
use crate::use_cases::{Cue, EmplacementView, WorldUpdate};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Sent once per connection, before any world update.
    Session(SessionInfoDto),
    // Snapshot of the world for a given tick.
    WorldUpdate(WorldUpdateDto),
    // Coarse phase transitions (splash, playing, game over, ...).
    Phase(PhaseDto),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // Held controls; the latest message stays in effect.
    Input(InputDto),
    // One-shot actions.
    Action(ActionDto),
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfoDto {
    pub session_id: String,
    pub seed: u64,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputDto {
    #[serde(default)]
    pub move_left: bool,
    #[serde(default)]
    pub move_right: bool,
    #[serde(default)]
    pub move_up: bool,
    #[serde(default)]
    pub move_down: bool,
    #[serde(default)]
    pub fire: bool,
}

impl From<InputDto> for InputFlags {
    fn from(input: InputDto) -> Self {
        Self {
            move_left: input.move_left,
            move_right: input.move_right,
            move_up: input.move_up,
            move_down: input.move_down,
            fire: input.fire,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum ActionDto {
    StartGame,
    ReturnToMenu,
    OpenLeaderboard,
    /// `key` is a single character, `"Space"` or `"Backspace"`.
    NameKey { key: String },
    SubmitName {
        #[serde(default)]
        name: Option<String>,
    },
    CancelNameEntry,
}

impl ActionDto {
    /// Domain action, or `None` for a key the name entry screen does not know.
    pub fn into_action(self) -> Option<PlayerAction> {
        let action = match self {
            ActionDto::StartGame => PlayerAction::StartGame,
            ActionDto::ReturnToMenu => PlayerAction::ReturnToMenu,
            ActionDto::OpenLeaderboard => PlayerAction::OpenLeaderboard,
            ActionDto::NameKey { key } => PlayerAction::NameKey(parse_name_key(&key)?),
            ActionDto::SubmitName { name } => PlayerAction::SubmitName { name },
            ActionDto::CancelNameEntry => PlayerAction::CancelNameEntry,
        };
        Some(action)
    }
}

fn parse_name_key(key: &str) -> Option<NameKey> {
    match key {
        "Backspace" => Some(NameKey::Backspace),
        "Space" | "SPACE" => Some(NameKey::Space),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(NameKey::Char(c)),
                _ => None,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum PhaseDto {
    Splash,
    Playing,
    GameOver,
    NameInput,
    TopScores,
}

impl From<PhaseKind> for PhaseDto {
    fn from(phase: PhaseKind) -> Self {
        match phase {
            PhaseKind::Splash => PhaseDto::Splash,
            PhaseKind::Playing => PhaseDto::Playing,
            PhaseKind::GameOver => PhaseDto::GameOver,
            PhaseKind::NameInput => PhaseDto::NameInput,
            PhaseKind::TopScores => PhaseDto::TopScores,
        }
    }
}

/// Snapshot of the world sent to clients on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub phase: PhaseDto,
    pub airplane: BoxDto,
    pub projectiles: Vec<BoxDto>,
    pub targets: Vec<TargetDto>,
    pub emplacements: Vec<EmplacementDto>,
    pub rounds: Vec<BoxDto>,
    pub explosions: Vec<ExplosionDto>,
    pub ledger: LedgerDto,
    pub background_offset: f32,
    pub name_buffer: String,
    pub top_scores: Vec<ScoreDto>,
    pub cues: Vec<CueDto>,
}

impl From<WorldUpdate> for WorldUpdateDto {
    fn from(update: WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            phase: update.phase.into(),
            airplane: BoxDto::new(0, update.airplane.rect),
            projectiles: update
                .projectiles
                .iter()
                .map(|p| BoxDto::new(p.id, p.rect))
                .collect(),
            targets: update.targets.iter().map(TargetDto::from).collect(),
            emplacements: update.emplacements.iter().map(EmplacementDto::from).collect(),
            rounds: update
                .rounds
                .iter()
                .map(|r| BoxDto::new(r.id, r.rect))
                .collect(),
            explosions: update
                .explosions
                .iter()
                .map(|e| ExplosionDto {
                    id: e.id,
                    x: e.x,
                    y: e.y,
                    radius: e.radius,
                    opacity: e.opacity,
                })
                .collect(),
            ledger: LedgerDto::from(&update.ledger),
            background_offset: update.background_offset,
            name_buffer: update.name_buffer,
            top_scores: update.top_scores.into_iter().map(ScoreDto::from).collect(),
            cues: update.cues.into_iter().map(CueDto::from).collect(),
        }
    }
}

/// Axis-aligned box of any entity, top-left anchored.
#[derive(Debug, Clone, Serialize)]
pub struct BoxDto {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BoxDto {
    fn new(id: u64, rect: Rect) -> Self {
        Self {
            id,
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum TargetStateDto {
    Pristine,
    Damaged,
    Destroyed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetDto {
    #[serde(flatten)]
    pub body: BoxDto,
    pub state: TargetStateDto,
    pub glow_phase: f32,
}

impl From<&GroundTarget> for TargetDto {
    fn from(target: &GroundTarget) -> Self {
        Self {
            body: BoxDto::new(target.id, target.rect),
            state: match target.state {
                TargetState::Pristine => TargetStateDto::Pristine,
                TargetState::Damaged => TargetStateDto::Damaged,
                TargetState::Destroyed => TargetStateDto::Destroyed,
            },
            glow_phase: target.glow_phase,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum SideDto {
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmplacementDto {
    #[serde(flatten)]
    pub body: BoxDto,
    pub side: SideDto,
    pub destroyed: bool,
    pub fade: f32,
}

impl From<&EmplacementView> for EmplacementDto {
    fn from(view: &EmplacementView) -> Self {
        let Emplacement {
            id,
            rect,
            side,
            destroyed,
            ..
        } = &view.gun;
        Self {
            body: BoxDto::new(*id, *rect),
            side: match side {
                Side::Left => SideDto::Left,
                Side::Right => SideDto::Right,
            },
            destroyed: *destroyed,
            fade: view.fade,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplosionDto {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerDto {
    pub score: u32,
    pub health: u32,
    pub max_health: u32,
    pub hit_count: u32,
    pub destroyed_count: u32,
    pub emplacement_kills: u32,
}

impl From<&Ledger> for LedgerDto {
    fn from(ledger: &Ledger) -> Self {
        Self {
            score: ledger.score,
            health: ledger.health,
            max_health: ledger.max_health,
            hit_count: ledger.hit_count,
            destroyed_count: ledger.destroyed_count,
            emplacement_kills: ledger.emplacement_kills,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreDto {
    pub name: String,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

impl From<ScoreEntry> for ScoreDto {
    fn from(entry: ScoreEntry) -> Self {
        Self {
            name: entry.name,
            score: entry.score,
            recorded_at: entry.recorded_at,
        }
    }
}

/// Body of `GET /scores`.
#[derive(Debug, Clone, Serialize)]
pub struct ScoresResponse {
    pub scores: Vec<ScoreDto>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum CueDto {
    TargetDamaged,
    TargetDestroyed,
    EmplacementDestroyed,
    AirplaneHit,
}

impl From<Cue> for CueDto {
    fn from(cue: Cue) -> Self {
        match cue {
            Cue::TargetDamaged => CueDto::TargetDamaged,
            Cue::TargetDestroyed => CueDto::TargetDestroyed,
            Cue::EmplacementDestroyed => CueDto::EmplacementDestroyed,
            Cue::AirplaneHit => CueDto::AirplaneHit,
        }
    }
}
