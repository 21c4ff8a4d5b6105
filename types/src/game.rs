use std::fmt;

/// Lifecycle of a single game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    NotStarted,
    Running,
    Finished,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::NotStarted => write!(f, "not started"),
            GameState::Running => write!(f, "running"),
            GameState::Finished => write!(f, "finished"),
        }
    }
}
