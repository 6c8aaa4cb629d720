use crate::domain::input::{NameKey, PlayerAction};

/// Coarse game phases. Only `Playing` runs the tick pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Splash,
    Playing,
    /// Health reached zero at `at_ms` (clock millis).
    GameOver { at_ms: u64 },
    NameInput,
    TopScores,
}

/// Phase without its payload, as published to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Splash,
    Playing,
    GameOver,
    NameInput,
    TopScores,
}

/// What the simulation must do in response to an action accepted by the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    StartRun,
    AbandonRun,
    ShowTopScores,
    CloseTopScores,
    EditName(NameKey),
    SubmitName(Option<String>),
    CancelNameEntry,
}

impl GamePhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            GamePhase::Splash => PhaseKind::Splash,
            GamePhase::Playing => PhaseKind::Playing,
            GamePhase::GameOver { .. } => PhaseKind::GameOver,
            GamePhase::NameInput => PhaseKind::NameInput,
            GamePhase::TopScores => PhaseKind::TopScores,
        }
    }

    pub fn is_simulating(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }

    /// Maps an action to a transition. Actions the phase does not accept yield `None`.
    pub fn on_action(&self, action: &PlayerAction) -> Option<Transition> {
        match (self, action) {
            (GamePhase::Splash, PlayerAction::StartGame) => Some(Transition::StartRun),
            (GamePhase::Splash, PlayerAction::OpenLeaderboard) => Some(Transition::ShowTopScores),
            (GamePhase::Playing, PlayerAction::ReturnToMenu) => Some(Transition::AbandonRun),
            (GamePhase::TopScores, PlayerAction::ReturnToMenu) => Some(Transition::CloseTopScores),
            (GamePhase::NameInput, PlayerAction::NameKey(key)) => {
                Some(Transition::EditName(*key))
            }
            (GamePhase::NameInput, PlayerAction::SubmitName { name }) => {
                Some(Transition::SubmitName(name.clone()))
            }
            (
                GamePhase::NameInput,
                PlayerAction::CancelNameEntry | PlayerAction::ReturnToMenu,
            ) => Some(Transition::CancelNameEntry),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [PlayerAction; 6] = [
        PlayerAction::StartGame,
        PlayerAction::ReturnToMenu,
        PlayerAction::OpenLeaderboard,
        PlayerAction::NameKey(NameKey::Space),
        PlayerAction::SubmitName { name: None },
        PlayerAction::CancelNameEntry,
    ];

    #[test]
    fn when_on_splash_then_start_and_leaderboard_are_accepted() {
        let phase = GamePhase::Splash;
        assert_eq!(
            phase.on_action(&PlayerAction::StartGame),
            Some(Transition::StartRun)
        );
        assert_eq!(
            phase.on_action(&PlayerAction::OpenLeaderboard),
            Some(Transition::ShowTopScores)
        );
        assert_eq!(phase.on_action(&PlayerAction::ReturnToMenu), None);
    }

    #[test]
    fn when_playing_then_only_escape_is_accepted() {
        let phase = GamePhase::Playing;
        for action in ALL_ACTIONS {
            let expected = match action {
                PlayerAction::ReturnToMenu => Some(Transition::AbandonRun),
                _ => None,
            };
            assert_eq!(phase.on_action(&action), expected, "{action:?}");
        }
    }

    #[test]
    fn when_game_is_over_then_every_action_is_ignored() {
        let phase = GamePhase::GameOver { at_ms: 10 };
        for action in ALL_ACTIONS {
            assert_eq!(phase.on_action(&action), None, "{action:?}");
        }
    }

    #[test]
    fn when_entering_a_name_then_keys_and_exits_are_routed() {
        let phase = GamePhase::NameInput;
        assert_eq!(
            phase.on_action(&PlayerAction::NameKey(NameKey::Char('a'))),
            Some(Transition::EditName(NameKey::Char('a')))
        );
        assert_eq!(
            phase.on_action(&PlayerAction::SubmitName {
                name: Some("Ace".into())
            }),
            Some(Transition::SubmitName(Some("Ace".into())))
        );
        assert_eq!(
            phase.on_action(&PlayerAction::ReturnToMenu),
            Some(Transition::CancelNameEntry)
        );
        assert_eq!(phase.on_action(&PlayerAction::StartGame), None);
    }

    #[test]
    fn when_escape_is_pressed_on_top_scores_then_splash_returns() {
        assert_eq!(
            GamePhase::TopScores.on_action(&PlayerAction::ReturnToMenu),
            Some(Transition::CloseTopScores)
        );
        assert_eq!(GamePhase::TopScores.on_action(&PlayerAction::StartGame), None);
    }

    #[test]
    fn when_phase_is_not_playing_then_simulation_pauses() {
        assert!(GamePhase::Playing.is_simulating());
        assert!(!GamePhase::Splash.is_simulating());
        assert!(!GamePhase::GameOver { at_ms: 0 }.is_simulating());
        assert_eq!(GamePhase::GameOver { at_ms: 3 }.kind(), PhaseKind::GameOver);
    }
}
