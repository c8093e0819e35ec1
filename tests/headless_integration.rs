use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use tapnum::board::DisplayList;
use tapnum::game::{ClickOutcome, GameSession, NullView, SessionOutcome};
use tapnum::game_config::{preset, Difficulty, GameType};
use tapnum::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use tapnum::symbols::SymbolSpec;

// Same cell-to-pixel convention the binary uses.
const PX_PER_COL: i32 = 10;
const PX_PER_ROW: i32 = 20;

fn cell_for(x: i32, y: i32) -> (u16, u16) {
    let column = (x / PX_PER_COL) as u16;
    let row = (y / PX_PER_ROW) as u16 + 1;
    (column, row)
}

fn board_pixel(column: u16, row: u16) -> (i32, i32) {
    let x = i32::from(column) * PX_PER_COL + PX_PER_COL / 2;
    let y = i32::from(row - 1) * PX_PER_ROW + PX_PER_ROW / 2;
    (x, y)
}

fn click_event(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

// Headless integration using the internal runtime + GameSession without a TTY.
// Verifies that a minimal click-through flow completes via Runner/TestEventSource.
#[test]
fn headless_click_flow_completes() {
    let mut config = preset(GameType::Speed, Difficulty::Easy).unwrap();
    config.symbol_generator = SymbolSpec::NumericAsc;
    config.amount = 3;

    let mut view = NullView;
    let now = Instant::now();
    let mut session = GameSession::new(config, 800, 460, now, &mut view, None).unwrap();
    session.board.draw(&mut DisplayList::default());

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    // Queue clicks on targets "1", "2", "3" in order, snapped to cell centers
    // the way real mouse input arrives.
    for label in ["1", "2", "3"] {
        let target = session
            .board
            .targets
            .iter()
            .find(|t| t.label == label)
            .expect("target missing");
        let (column, row) = cell_for(target.x, target.y);
        tx.send(AppEvent::Mouse(click_event(column, row))).unwrap();
    }

    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Tick => session.on_tick(Instant::now()).unwrap(),
            AppEvent::Resize | AppEvent::Key(_) => {}
            AppEvent::Mouse(mouse) => {
                session.board.draw(&mut DisplayList::default());
                let (x, y) = board_pixel(mouse.column, mouse.row);
                let outcome = session
                    .on_click(x, y, Instant::now(), &mut view)
                    .unwrap();
                assert_eq!(outcome, ClickOutcome::Hit);
                if session.is_finished() {
                    break;
                }
            }
        }
    }

    assert_eq!(session.outcome(), Some(SessionOutcome::Completed));
    assert_eq!(session.stats().clicks(), 3);
    assert_eq!(session.stats().correct_clicks(), 3);
}

// A cell center click is never further than half a cell from the target
// center, which is well inside the target radius.
#[test]
fn cell_snapping_stays_within_hit_radius() {
    let mut config = preset(GameType::Speed, Difficulty::Easy).unwrap();
    config.amount = 8;

    let mut view = NullView;
    let mut session =
        GameSession::new(config, 800, 460, Instant::now(), &mut view, None).unwrap();
    session.board.draw(&mut DisplayList::default());

    let centers: Vec<(i32, i32)> = session.board.targets.iter().map(|t| (t.x, t.y)).collect();
    for (x, y) in centers {
        let (column, row) = cell_for(x, y);
        let (sx, sy) = board_pixel(column, row);
        let hit = session.board.targets.find_hit(sx, sy).unwrap();
        assert!(hit.is_some(), "snapped click missed target at ({x}, {y})");
    }
}

// Timers fire through the tick path only; wall time alone must not
// advance the session.
#[test]
fn timers_advance_only_on_ticks() {
    let mut config = preset(GameType::Speed, Difficulty::Easy).unwrap();
    config.amount = 2;
    config.auto_add_number_interval = Some(1);

    let mut view = NullView;
    let now = Instant::now();
    let mut session = GameSession::new(config, 800, 460, now, &mut view, None).unwrap();
    assert_eq!(session.board.targets.len(), 2);

    session.on_tick(now + Duration::from_secs(1)).unwrap();
    assert_eq!(session.board.targets.len(), 3);
}
