use thiserror::Error;

/// Fatal conditions of the game core. Misclicks, absent optional config
/// fields, and symbol exhaustion are normal control flow and never appear
/// here.
#[derive(Debug, Error)]
pub enum GameError {
    /// Rejection sampling ran out of attempts. The board is too crowded for
    /// the configured target count; the session cannot continue.
    #[error("no free spot found after {attempts} attempts")]
    BoardFull { attempts: u32 },

    /// A hit test ran against a target that has never been drawn. This is a
    /// construction-order bug in the caller, not a runtime condition.
    #[error("hit test before first draw (target '{label}')")]
    HitTestBeforeDraw { label: String },

    /// The requested (game type, difficulty) pair is not in the catalog.
    #[error("no preset for {game_type} at difficulty {difficulty}")]
    UnknownPreset {
        game_type: String,
        difficulty: String,
    },
}
