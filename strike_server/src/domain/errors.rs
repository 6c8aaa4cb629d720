use std::fmt;

// Domain-level errors. Nothing inside the tick pipeline fails; these only surface at
// construction time and at the leaderboard boundary.

/// Reasons a `GameConfig` is refused at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDimension { field: &'static str },
    NegativeSpeed { field: &'static str },
    ZeroInterval { field: &'static str },
    InvertedFireInterval,
    ZeroMaxHealth,
    EntityTooLarge { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimension { field } => {
                write!(f, "{field} must be a positive, finite size")
            }
            ConfigError::NegativeSpeed { field } => {
                write!(f, "{field} must be a non-negative, finite value")
            }
            ConfigError::ZeroInterval { field } => write!(f, "{field} must be greater than zero"),
            ConfigError::InvertedFireInterval => {
                write!(f, "fire_interval_min must not exceed fire_interval_max")
            }
            ConfigError::ZeroMaxHealth => write!(f, "max_health must be greater than zero"),
            ConfigError::EntityTooLarge { field } => {
                write!(f, "{field} does not fit inside the playfield")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failures reported by a leaderboard store. Callers degrade these to "no scores".
#[derive(Debug)]
pub enum LeaderboardError {
    Unavailable(String),
    Rejected { status: u16, message: Option<String> },
    Decode(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderboardError::Unavailable(reason) => write!(f, "leaderboard unavailable: {reason}"),
            LeaderboardError::Rejected { status, message } => {
                if let Some(message) = message {
                    write!(f, "leaderboard rejected request ({status}): {message}")
                } else {
                    write!(f, "leaderboard rejected request ({status})")
                }
            }
            LeaderboardError::Decode(reason) => {
                write!(f, "leaderboard response decode error: {reason}")
            }
        }
    }
}

impl std::error::Error for LeaderboardError {}
