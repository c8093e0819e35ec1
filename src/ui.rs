use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context},
        Paragraph, Widget, Wrap,
    },
};

use crate::board::DrawOp;
use crate::{App, AppState, PX_PER_COL};

const FILL_RING_STEP: f64 = 3.0;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Playing => render_board(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn render_board(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let config = app.session.config();
    let mut spans = vec![
        Span::styled(
            format!("{}/{}", config.game_type, config.difficulty),
            bold_style,
        ),
        Span::styled(
            format!("   targets left: {}", app.session.board.targets.len()),
            dim_style,
        ),
    ];
    if let Some(lives) = app.hud.lives {
        spans.push(Span::styled(
            format!("   lives: {}", lives),
            bold_style.fg(Color::Red),
        ));
    }
    if app.hud.peek_visible {
        spans.push(Span::styled(
            "   [click this line to reveal]",
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }

    Paragraph::new(Line::from(spans)).render(chunks[0], buf);

    let width = f64::from(app.session.board.width);
    let height = f64::from(app.session.board.height);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| paint_ops(ctx, &app.display.ops, height));

    canvas.render(chunks[1], buf);
}

/// Replays recorded draw calls into the canvas. Board y grows downward,
/// canvas y upward, so every y is flipped here.
fn paint_ops(ctx: &mut Context, ops: &[DrawOp], height: f64) {
    for op in ops {
        match op {
            DrawOp::Clear => {}
            DrawOp::FillCircle {
                x,
                y,
                radius,
                color,
            } => {
                // Braille shapes have no fill; concentric rings approximate a disc.
                let mut r = *radius;
                while r > 0.0 {
                    ctx.draw(&Circle {
                        x: f64::from(*x),
                        y: height - f64::from(*y),
                        radius: r,
                        color: *color,
                    });
                    r -= FILL_RING_STEP;
                }
            }
            DrawOp::StrokeCircle {
                x,
                y,
                radius,
                color,
            } => {
                ctx.draw(&Circle {
                    x: f64::from(*x),
                    y: height - f64::from(*y),
                    radius: *radius,
                    color: *color,
                });
            }
            DrawOp::Label { .. } => {}
        }
    }

    // Labels go on a fresh layer so they overwrite the circle dots.
    ctx.layer();
    for op in ops {
        if let DrawOp::Label { x, y, text } = op {
            let offset = text.len() as f64 * f64::from(PX_PER_COL) / 2.0;
            ctx.print(
                f64::from(*x) - offset,
                height - f64::from(*y),
                Line::styled(
                    text.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            );
        }
    }
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(5)
        .vertical_margin(2)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let summary = app.hud.summary.as_deref().unwrap_or("session aborted");
    let summary_widget = Paragraph::new(summary.to_string())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    summary_widget.render(chunks[0], buf);

    let legend = Paragraph::new(Span::styled(
        "(r)estart / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ));
    legend.render(chunks[1], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DisplayList;
    use crate::game::GameSession;
    use crate::game_config::{preset, Difficulty, GameType};
    use crate::Hud;
    use ratatui::{buffer::Buffer, layout::Rect};
    use std::time::Instant;

    fn create_test_app(finished: bool) -> App {
        let config = preset(GameType::ClearTheBoard, Difficulty::Easy).unwrap();
        let mut hud = Hud::default();
        let session =
            GameSession::new(config, 800, 460, Instant::now(), &mut hud, None).unwrap();

        let mut app = App {
            cli: None,
            session,
            hud,
            display: DisplayList::default(),
            state: AppState::Playing,
        };
        app.record_frame();

        if finished {
            app.hud.summary = Some("Misclicks: 1\nTargets cleared: 5".to_string());
            app.state = AppState::Results;
        }

        app
    }

    fn rendered_text(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn playing_screen_shows_status_line() {
        let app = create_test_app(false);
        let rendered = rendered_text(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("clearTheBoard/easy"));
        assert!(rendered.contains("targets left: 5"));
    }

    #[test]
    fn playing_screen_draws_targets() {
        let app = create_test_app(false);
        let rendered = rendered_text(&app, Rect::new(0, 0, 80, 24));

        // Braille dots from the circles, plus at least one visible label.
        assert!(!rendered.trim().is_empty());
        assert!(rendered.contains('1'));
    }

    #[test]
    fn results_screen_shows_summary_and_legend() {
        let app = create_test_app(true);
        let rendered = rendered_text(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("Misclicks: 1"));
        assert!(rendered.contains("(r)estart"));
    }

    #[test]
    fn aborted_results_fall_back_to_placeholder() {
        let mut app = create_test_app(true);
        app.hud.summary = None;
        let rendered = rendered_text(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("session aborted"));
    }

    #[test]
    fn lives_and_peek_hint_show_up() {
        let mut app = create_test_app(false);
        app.hud.lives = Some(3);
        app.hud.peek_visible = true;
        let rendered = rendered_text(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("lives: 3"));
        assert!(rendered.contains("reveal"));
    }

    #[test]
    fn render_survives_extreme_areas() {
        let app = create_test_app(false);

        for area in [
            Rect::new(0, 0, 10, 3),
            Rect::new(0, 0, 200, 5),
            Rect::new(0, 0, 20, 50),
        ] {
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert!(*buffer.area() == area);
        }
    }
}
