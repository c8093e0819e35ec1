use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::game_config::GameConfig;
use crate::util::{mean, median};

/// Time from the previous correct click (or session start) to the click that
/// cleared `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub label: String,
    pub duration_ms: i64,
}

/// Per-session click bookkeeping. Created at session start, mutated by every
/// click, finalized exactly once at session end.
#[derive(Debug)]
pub struct StatsRecorder {
    config: GameConfig,
    start: DateTime<Local>,
    end: DateTime<Local>,
    start_current: DateTime<Local>,
    clicks: u32,
    correct_clicks: u32,
    intervals: Vec<Interval>,
    finished: bool,
}

impl StatsRecorder {
    pub fn new(config: GameConfig) -> Self {
        let now = Local::now();
        Self {
            config,
            start: now,
            end: now,
            start_current: now,
            clicks: 0,
            correct_clicks: 0,
            intervals: Vec::new(),
            finished: false,
        }
    }

    pub fn click(&mut self) {
        self.clicks += 1;
    }

    pub fn correct(&mut self, label: &str) {
        self.correct_clicks += 1;
        let now = Local::now();
        self.intervals.push(Interval {
            label: label.to_string(),
            duration_ms: (now - self.start_current).num_milliseconds(),
        });
        self.start_current = now;
    }

    /// Stamps the end time and, when a store is given, appends this run to
    /// the persisted history under its game-type key. Repeat calls are
    /// no-ops.
    pub fn finish(&mut self, store: Option<&dyn HistoryStore>) -> std::io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.end = Local::now();

        if let Some(store) = store {
            let mut history = store.load();
            history
                .games
                .entry(self.config.game_type.to_string())
                .or_default()
                .push(self.to_record());
            store.save(&history)?;
        }
        Ok(())
    }

    fn to_record(&self) -> GameRecord {
        GameRecord {
            game_config: self.config.clone(),
            stats: RunTotals {
                start: self.start.timestamp_millis(),
                end: self.end.timestamp_millis(),
                clicks: self.clicks,
                correct_clicks: self.correct_clicks,
            },
            intervals: self.intervals.clone(),
        }
    }

    /// Human-readable end-of-session report.
    pub fn summary_text(&self) -> String {
        let mut res = format!(
            "Misclicks: {}\nTargets cleared: {}\nTotal duration: {:.1} sec\n\n",
            self.clicks - self.correct_clicks,
            self.correct_clicks,
            (self.end - self.start).num_milliseconds() as f64 / 1000.0,
        );

        for interval in &self.intervals {
            res.push_str(&format!(
                "{}: {:.1} sec\n",
                interval.label,
                interval.duration_ms as f64 / 1000.0
            ));
        }

        res
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn correct_clicks(&self) -> u32 {
        self.correct_clicks
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn start(&self) -> DateTime<Local> {
        self.start
    }

    pub fn end(&self) -> DateTime<Local> {
        self.end
    }
}

/// Aggregate counters of one finished run. Epoch-millisecond timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTotals {
    pub start: i64,
    pub end: i64,
    pub clicks: u32,
    pub correct_clicks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_config: GameConfig,
    pub stats: RunTotals,
    pub intervals: Vec<Interval>,
}

/// The whole persisted document: one record list per game type.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsHistory {
    pub games: HashMap<String, Vec<GameRecord>>,
}

/// Opaque key-value persistence for the stats history.
pub trait HistoryStore {
    fn load(&self) -> StatsHistory;
    fn save(&self, history: &StatsHistory) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::history_path().unwrap_or_else(|| PathBuf::from("tapnum_stats.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> StatsHistory {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(history) = serde_json::from_slice::<StatsHistory>(&bytes) {
                return history;
            }
        }
        StatsHistory::default()
    }

    fn save(&self, history: &StatsHistory) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(history).map_err(std::io::Error::from)?;
        fs::write(&self.path, data)
    }
}

/// Flattens the whole history into `;`-delimited rows with per-run interval
/// aggregates. Game types come out in sorted order for stable output.
pub fn export_csv(history: &StatsHistory) -> Result<String, Box<dyn std::error::Error>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer.write_record([
        "gameType",
        "difficulty",
        "start",
        "end",
        "clicks",
        "correctClicks",
        "average",
        "median",
        "min",
        "max",
    ])?;

    for (_, records) in history.games.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        for record in records {
            let durations: Vec<f64> = record
                .intervals
                .iter()
                .map(|i| i.duration_ms as f64)
                .collect();

            let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
            let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            writer.write_record([
                record.game_config.game_type.to_string(),
                record.game_config.difficulty.to_string(),
                record.stats.start.to_string(),
                record.stats.end.to_string(),
                record.stats.clicks.to_string(),
                record.stats.correct_clicks.to_string(),
                format!("{:.1}", mean(&durations).unwrap_or(0.0)),
                format!("{}", median(&durations).unwrap_or(0.0)),
                format!("{}", if min.is_finite() { min } else { 0.0 }),
                format!("{}", if max.is_finite() { max } else { 0.0 }),
            ])?;
        }
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}
