// Input coming from the player's device, already mapped to game intents.

/// Level-triggered controls, sampled every tick. The last value received is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFlags {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub fire: bool,
}

/// A single key press on the name-entry screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKey {
    Char(char),
    Space,
    Backspace,
}

/// Edge-triggered actions. Each one is applied once, at the next tick boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    StartGame,
    /// Escape: abandons a run, closes the scores screen or cancels name entry.
    ReturnToMenu,
    OpenLeaderboard,
    NameKey(NameKey),
    /// Submits the name-entry buffer, or `name` when provided.
    SubmitName { name: Option<String> },
    CancelNameEntry,
}
