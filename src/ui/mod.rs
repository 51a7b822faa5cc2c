//! Terminal rendering.

mod board_scene;

use rand::Rng;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use minesweep::progression::ProfileBackend;

use crate::app::App;

/// Smallest terminal the scene fits in: 10x10 board plus side panels.
const MIN_COLS: u16 = 60;
const MIN_ROWS: u16 = 20;

pub fn fits(cols: u16, rows: u16) -> bool {
    cols >= MIN_COLS && rows >= MIN_ROWS
}

/// Draw one frame.
pub fn draw<B: ProfileBackend, R: Rng>(frame: &mut Frame, app: &App<B, R>) {
    let area = frame.size();
    if !fits(area.width, area.height) {
        render_too_small(frame);
        return;
    }
    board_scene::render_board_scene(frame, area, app);
}

fn render_too_small(frame: &mut Frame) {
    let area = frame.size();
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Terminal too small",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Need {}x{}, have {}x{}",
            MIN_COLS, MIN_ROWS, area.width, area.height
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits() {
        assert!(fits(80, 24));
        assert!(fits(60, 20));
        assert!(!fits(59, 24));
        assert!(!fits(80, 19));
    }
}
