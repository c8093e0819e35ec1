use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::symbols::SymbolSpec;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum GameType {
    ClearTheBoard,
    Memory,
    InvisibleNumbers,
    Speed,
    /// Built from raw CLI fields, never from the catalog.
    #[value(skip)]
    Custom,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Difficulty slot for custom games.
    #[value(skip)]
    Unknown,
}

/// Immutable per-session game configuration. Every modifier is optional;
/// absent modifiers are normal play, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub game_type: GameType,
    pub difficulty: Difficulty,
    pub symbol_generator: SymbolSpec,
    /// Initial target count.
    pub amount: u32,
    #[serde(default)]
    pub add_number_on_misclick: bool,
    #[serde(default)]
    pub add_number_on_target_hit: bool,
    /// Seconds between automatic spawns.
    #[serde(default)]
    pub auto_add_number_interval: Option<u32>,
    /// Seconds until labels hide after setup.
    #[serde(default)]
    pub hide_numbers_after: Option<u32>,
    #[serde(default)]
    pub hide_after_first_click: bool,
    /// Seconds labels stay revealed after a miss.
    #[serde(default)]
    pub show_numbers_on_misclick: Option<u32>,
    /// Peek control reveal duration in seconds; None disables the control.
    #[serde(default)]
    pub enable_show_button: Option<u32>,
    /// None means unlimited.
    #[serde(default)]
    pub lives: Option<u32>,
}

impl GameConfig {
    fn base(
        game_type: GameType,
        difficulty: Difficulty,
        amount: u32,
        symbol_generator: SymbolSpec,
    ) -> Self {
        Self {
            game_type,
            difficulty,
            symbol_generator,
            amount,
            add_number_on_misclick: false,
            add_number_on_target_hit: false,
            auto_add_number_interval: None,
            hide_numbers_after: None,
            hide_after_first_click: false,
            show_numbers_on_misclick: None,
            enable_show_button: None,
            lives: None,
        }
    }
}

/// Static catalog of named presets. A combination outside the table is a
/// rejected configuration request; the session never starts.
pub fn preset(game_type: GameType, difficulty: Difficulty) -> Result<GameConfig, GameError> {
    use Difficulty::*;
    use GameType::*;

    let config = match (game_type, difficulty) {
        (ClearTheBoard, Easy) => {
            let mut c = GameConfig::base(game_type, difficulty, 5, SymbolSpec::NumericAsc);
            c.auto_add_number_interval = Some(5);
            c.hide_numbers_after = Some(3);
            c.hide_after_first_click = true;
            c.enable_show_button = Some(3);
            c
        }
        (ClearTheBoard, Medium) => {
            let mut c = GameConfig::base(game_type, difficulty, 10, SymbolSpec::NumericAsc);
            c.add_number_on_misclick = true;
            c.auto_add_number_interval = Some(4);
            c.hide_numbers_after = Some(4);
            c.hide_after_first_click = true;
            c.enable_show_button = Some(3);
            c
        }
        (ClearTheBoard, Hard) => {
            let mut c = GameConfig::base(game_type, difficulty, 10, SymbolSpec::NumericAsc);
            c.add_number_on_misclick = true;
            c.auto_add_number_interval = Some(3);
            c.hide_numbers_after = Some(3);
            c.hide_after_first_click = true;
            c.enable_show_button = Some(2);
            c
        }
        (Memory, Easy) => {
            let mut c = GameConfig::base(game_type, difficulty, 5, SymbolSpec::NumericAsc);
            c.hide_after_first_click = true;
            c
        }
        (Memory, Medium) => {
            let mut c = GameConfig::base(game_type, difficulty, 7, SymbolSpec::NumericAsc);
            c.hide_after_first_click = true;
            c
        }
        (Memory, Hard) => {
            let mut c = GameConfig::base(game_type, difficulty, 10, SymbolSpec::NumericAsc);
            c.hide_after_first_click = true;
            c
        }
        (InvisibleNumbers, Easy) => {
            let mut c = GameConfig::base(game_type, difficulty, 3, SymbolSpec::NumericAsc);
            c.add_number_on_target_hit = true;
            c.hide_numbers_after = Some(3);
            c.show_numbers_on_misclick = Some(2);
            c.lives = Some(5);
            c
        }
        (InvisibleNumbers, Medium) => {
            let mut c = GameConfig::base(game_type, difficulty, 4, SymbolSpec::NumericAsc);
            c.add_number_on_target_hit = true;
            c.hide_numbers_after = Some(2);
            c.show_numbers_on_misclick = Some(1);
            c.lives = Some(3);
            c
        }
        (InvisibleNumbers, Hard) => {
            let mut c = GameConfig::base(game_type, difficulty, 3, SymbolSpec::NumericAsc);
            c.add_number_on_target_hit = true;
            c.hide_numbers_after = Some(1);
            c.enable_show_button = Some(2);
            c.auto_add_number_interval = Some(10);
            c.lives = Some(2);
            c
        }
        (Speed, Easy) => GameConfig::base(game_type, difficulty, 10, SymbolSpec::NumericAsc),
        (Speed, Medium) => {
            GameConfig::base(game_type, difficulty, 20, SymbolSpec::NumericDesc { start: 20 })
        }
        (Speed, Hard) => GameConfig::base(game_type, difficulty, 20, SymbolSpec::MixAsc),
        (game_type, difficulty) => {
            return Err(GameError::UnknownPreset {
                game_type: game_type.to_string(),
                difficulty: difficulty.to_string(),
            })
        }
    };

    Ok(config)
}
