use std::time::Instant;

use tapnum::board::DisplayList;
use tapnum::game::{GameSession, NullView};
use tapnum::game_config::{preset, Difficulty, GameType};
use tapnum::stats::{export_csv, FileHistoryStore, HistoryStore};
use tapnum::symbols::SymbolSpec;

fn play_full_session(store: FileHistoryStore) {
    let mut config = preset(GameType::Speed, Difficulty::Easy).unwrap();
    config.symbol_generator = SymbolSpec::NumericAsc;
    config.amount = 2;

    let mut view = NullView;
    let now = Instant::now();
    let mut session =
        GameSession::new(config, 800, 460, now, &mut view, Some(Box::new(store))).unwrap();

    for label in ["1", "2"] {
        session.board.draw(&mut DisplayList::default());
        let (x, y) = session
            .board
            .targets
            .iter()
            .find(|t| t.label == label)
            .map(|t| (t.x, t.y))
            .unwrap();
        session.on_click(x, y, now, &mut view).unwrap();
    }

    assert!(session.is_finished());
}

#[test]
fn finished_session_lands_in_the_history_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.json");

    play_full_session(FileHistoryStore::with_path(path.clone()));

    let history = FileHistoryStore::with_path(path).load();
    let records = history.games.get("speed").expect("speed history missing");
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.stats.clicks, 2);
    assert_eq!(record.stats.correct_clicks, 2);
    assert!(record.stats.end >= record.stats.start);
    assert_eq!(record.intervals.len(), 2);
    assert_eq!(record.intervals[0].label, "1");
}

#[test]
fn repeated_sessions_append_to_the_same_game_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.json");

    play_full_session(FileHistoryStore::with_path(path.clone()));
    play_full_session(FileHistoryStore::with_path(path.clone()));

    let history = FileHistoryStore::with_path(path).load();
    assert_eq!(history.games.get("speed").unwrap().len(), 2);
}

#[test]
fn stored_history_exports_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.json");

    play_full_session(FileHistoryStore::with_path(path.clone()));

    let history = FileHistoryStore::with_path(path).load();
    let csv = export_csv(&history).unwrap();

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("gameType;difficulty;start;end;clicks;correctClicks;average;median;min;max")
    );
    let row = lines.next().expect("data row missing");
    assert!(row.starts_with("speed;easy;"));
    assert!(row.contains(";2;2;"));
}
