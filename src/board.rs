use rand::Rng;
use ratatui::style::Color;

use crate::error::GameError;
use crate::target::{TargetQueue, RADIUS};

/// Bounded rejection sampling: fail fast instead of hanging the event loop
/// on an overfull board.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Drawing collaborator. The core only needs clear, circle fill/stroke, and
/// a centered label; the UI decides what those mean on screen.
pub trait Surface {
    fn clear(&mut self);
    fn fill_circle(&mut self, x: i32, y: i32, radius: f64, color: Color);
    fn stroke_circle(&mut self, x: i32, y: i32, radius: f64, color: Color);
    fn label(&mut self, x: i32, y: i32, text: &str);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    FillCircle {
        x: i32,
        y: i32,
        radius: f64,
        color: Color,
    },
    StrokeCircle {
        x: i32,
        y: i32,
        radius: f64,
        color: Color,
    },
    Label {
        x: i32,
        y: i32,
        text: String,
    },
}

/// Surface that records draw calls for later replay. The UI replays it into
/// a canvas widget; tests inspect it directly.
#[derive(Debug, Default)]
pub struct DisplayList {
    pub ops: Vec<DrawOp>,
}

impl Surface for DisplayList {
    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
    }

    fn fill_circle(&mut self, x: i32, y: i32, radius: f64, color: Color) {
        self.ops.push(DrawOp::FillCircle {
            x,
            y,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, x: i32, y: i32, radius: f64, color: Color) {
        self.ops.push(DrawOp::StrokeCircle {
            x,
            y,
            radius,
            color,
        });
    }

    fn label(&mut self, x: i32, y: i32, text: &str) {
        self.ops.push(DrawOp::Label {
            x,
            y,
            text: text.to_string(),
        });
    }
}

/// The play area: a pixel-space rectangle owning the live target queue and
/// the display-only label visibility flag.
#[derive(Debug)]
pub struct Board {
    pub targets: TargetQueue,
    pub width: u32,
    pub height: u32,
    pub numbers_hidden: bool,
}

impl Board {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            targets: TargetQueue::default(),
            width,
            height,
            numbers_hidden: false,
        }
    }

    /// Uniform rejection sampling for a non-overlapping circle center.
    /// Rejects positions whose circle (plus a 10% margin) would cross a board
    /// edge, and positions whose center falls within twice that margin of an
    /// existing target on both axes.
    pub fn find_free_spot<R: Rng>(&self, rng: &mut R) -> Result<(i32, i32), GameError> {
        let margin = RADIUS + RADIUS * 0.1;
        if f64::from(self.width) <= margin * 2.0 || f64::from(self.height) <= margin * 2.0 {
            return Err(GameError::BoardFull {
                attempts: MAX_PLACEMENT_ATTEMPTS,
            });
        }

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = rng.gen_range(0..self.width) as i32;
            let y = rng.gen_range(0..self.height) as i32;

            if f64::from(x) - margin < 0.0
                || f64::from(x) + margin > f64::from(self.width)
                || f64::from(y) - margin < 0.0
                || f64::from(y) + margin > f64::from(self.height)
            {
                continue;
            }

            if self.targets.any_collision(x, y, margin * 2.0) {
                continue;
            }

            return Ok((x, y));
        }

        Err(GameError::BoardFull {
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })
    }

    pub fn draw(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        self.targets.draw_all(surface, self.numbers_hidden);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn free_spots_respect_edges_and_spacing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new(500, 500);
        let margin = RADIUS + RADIUS * 0.1;

        for i in 0..30 {
            let (x, y) = board.find_free_spot(&mut rng).unwrap();

            assert!(f64::from(x) - margin >= 0.0);
            assert!(f64::from(x) + margin <= 500.0);
            assert!(f64::from(y) - margin >= 0.0);
            assert!(f64::from(y) + margin <= 500.0);
            assert!(!board.targets.any_collision(x, y, margin * 2.0));

            board
                .targets
                .add(Target::new(x, y, i.to_string(), Color::Red));
        }
    }

    #[test]
    fn board_too_small_for_one_circle_is_full() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = Board::new(40, 40);
        assert_matches!(
            board.find_free_spot(&mut rng),
            Err(GameError::BoardFull { .. })
        );
    }

    #[test]
    fn crowded_board_fails_within_the_attempt_bound() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = Board::new(120, 120);

        // Fill the small board until placement gives up; it must error out
        // rather than loop forever.
        let mut placed = 0;
        loop {
            match board.find_free_spot(&mut rng) {
                Ok((x, y)) => {
                    board
                        .targets
                        .add(Target::new(x, y, placed.to_string(), Color::Red));
                    placed += 1;
                    assert!(placed < 100);
                }
                Err(GameError::BoardFull { attempts }) => {
                    assert_eq!(attempts, MAX_PLACEMENT_ATTEMPTS);
                    break;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert!(placed >= 1);
    }

    #[test]
    fn draw_clears_before_repainting() {
        let mut board = Board::new(500, 500);
        board.targets.add(Target::new(100, 100, "1".into(), Color::Red));

        let mut list = DisplayList::default();
        board.draw(&mut list);
        board.draw(&mut list);

        assert_eq!(list.ops.first(), Some(&DrawOp::Clear));
        // Second draw replaced the first frame entirely.
        assert_eq!(
            list.ops.iter().filter(|op| **op == DrawOp::Clear).count(),
            1
        );
    }

    #[test]
    fn hidden_numbers_suppress_labels_only() {
        let mut board = Board::new(500, 500);
        board.targets.add(Target::new(100, 100, "1".into(), Color::Red));
        board.numbers_hidden = true;

        let mut list = DisplayList::default();
        board.draw(&mut list);

        assert!(list
            .ops
            .iter()
            .all(|op| !matches!(op, DrawOp::Label { .. })));
        assert!(list
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::FillCircle { .. })));
    }
}
