use rand::seq::SliceRandom;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Fixed 10-entry target palette.
// https://coolors.co/a86282-9a75a3-7998af-71afbb-6ac1c8-d3dcad-e9c6af-fab6ad-f6958e-f07270
pub const PALETTE: [Color; 10] = [
    Color::Rgb(0xA8, 0x62, 0x82),
    Color::Rgb(0x9A, 0x75, 0xA3),
    Color::Rgb(0x79, 0x98, 0xAF),
    Color::Rgb(0x71, 0xAF, 0xBB),
    Color::Rgb(0x6A, 0xC1, 0xC8),
    Color::Rgb(0xD3, 0xDC, 0xAD),
    Color::Rgb(0xE9, 0xC6, 0xAF),
    Color::Rgb(0xFA, 0xB6, 0xAD),
    Color::Rgb(0xF6, 0x95, 0x8E),
    Color::Rgb(0xF0, 0x72, 0x70),
];

/// Serializable selection of a symbol series. Kept as plain data so game
/// configs can be persisted alongside session records; `build()` resolves it
/// into a live generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SymbolSpec {
    NumericAsc,
    NumericDesc { start: u32 },
    AlphaAsc,
    AlphaDesc { start_letter: char },
    MixAsc,
}

impl SymbolSpec {
    /// Resolve into a generator with a freshly shuffled palette.
    pub fn build(&self) -> SymbolGenerator {
        let mut palette = PALETTE;
        palette.shuffle(&mut rand::thread_rng());
        SymbolGenerator {
            kind: Kind::from_spec(self),
            palette,
        }
    }
}

#[derive(Debug, Clone)]
enum Kind {
    /// Open-ended; the session's target count is the only bound.
    NumericAsc { current: i64 },
    NumericDesc { current: i64 },
    /// Cursor is a letter index, -1 meaning "before A".
    AlphaAsc { current: i32 },
    /// Cursor is a letter ordinal, A=1 .. Z=26; 0 is the exclusive bound.
    AlphaDesc { current: i32 },
    MixAsc { series: Vec<String>, current: usize },
}

impl Kind {
    fn from_spec(spec: &SymbolSpec) -> Self {
        match spec {
            SymbolSpec::NumericAsc => Kind::NumericAsc { current: 0 },
            SymbolSpec::NumericDesc { start } => Kind::NumericDesc {
                current: i64::from(*start) + 1,
            },
            SymbolSpec::AlphaAsc => Kind::AlphaAsc { current: -1 },
            SymbolSpec::AlphaDesc { start_letter } => Kind::AlphaDesc {
                current: letter_ordinal(*start_letter),
            },
            SymbolSpec::MixAsc => Kind::MixAsc {
                series: interleaved_series(),
                current: 0,
            },
        }
    }
}

/// Walks one label series. All variants share the same contract: the cursor
/// sits one step before the value `next()` will return, `is_last()` reports
/// whether the series is exhausted, and a `next()` call past the end leaves
/// the cursor untouched and repeats the final value.
#[derive(Debug, Clone)]
pub struct SymbolGenerator {
    kind: Kind,
    palette: [Color; 10],
}

impl SymbolGenerator {
    pub fn is_last(&self) -> bool {
        match &self.kind {
            Kind::NumericAsc { .. } => false,
            Kind::NumericDesc { current } => *current == 1,
            Kind::AlphaAsc { current } => *current == 25,
            Kind::AlphaDesc { current } => *current == 0,
            Kind::MixAsc { series, current } => current + 1 == series.len(),
        }
    }

    pub fn next(&mut self) -> String {
        let advance = !self.is_last();
        match &mut self.kind {
            Kind::NumericAsc { current } => {
                *current += 1;
                current.to_string()
            }
            Kind::NumericDesc { current } => {
                if advance {
                    *current -= 1;
                }
                current.to_string()
            }
            Kind::AlphaAsc { current } => {
                if advance {
                    *current += 1;
                }
                base36_upper(*current + 10)
            }
            Kind::AlphaDesc { current } => {
                if advance {
                    *current -= 1;
                }
                base36_upper(*current + 10)
            }
            Kind::MixAsc { series, current } => {
                if advance {
                    *current += 1;
                }
                series[*current].clone()
            }
        }
    }

    /// Palette entry for the current cursor (cursor mod 10).
    pub fn color(&self) -> Color {
        let cursor = match &self.kind {
            Kind::NumericAsc { current } | Kind::NumericDesc { current } => *current,
            Kind::AlphaAsc { current } | Kind::AlphaDesc { current } => i64::from(*current),
            Kind::MixAsc { current, .. } => *current as i64,
        };
        self.palette[cursor.rem_euclid(10) as usize]
    }
}

fn letter_ordinal(letter: char) -> i32 {
    (letter.to_ascii_lowercase() as i32) - ('a' as i32) + 1
}

fn base36_upper(digit: i32) -> String {
    char::from_digit(digit as u32, 36)
        .unwrap_or('?')
        .to_ascii_uppercase()
        .to_string()
}

/// Index strings interleaved with the alphabet: "0", "A", "1", "B", ...
fn interleaved_series() -> Vec<String> {
    let mut series = Vec::new();
    for (i, letter) in ('A'..='Z').enumerate() {
        series.push(i.to_string());
        series.push(letter.to_string());
    }
    series
}
