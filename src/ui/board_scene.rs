//! Minefield scene: board, info panel, ability panel and overlays.

use std::borrow::Cow;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use rand::Rng;

use minesweep::abilities::HighlightKind;
use minesweep::board::Cell;
use minesweep::progression::ProfileBackend;
use minesweep::session::{RoundStats, RoundStatus};

use crate::app::App;

/// Render the whole scene.
pub fn render_board_scene<B: ProfileBackend, R: Rng>(
    frame: &mut Frame,
    area: Rect,
    app: &App<B, R>,
) {
    frame.render_widget(Clear, area);

    // Split: grid on the left, side panels on the right (32 chars wide)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(24), Constraint::Length(32)])
        .split(area);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(8)])
        .split(chunks[1]);

    render_grid(frame, chunks[0], app);
    render_info_panel(frame, side[0], app);
    render_ability_panel(frame, side[1], app);

    if let Some(banner) = &app.banner {
        render_banner(frame, chunks[0], &banner.text);
    }

    if let Some(stats) = &app.summary {
        render_game_over_overlay(frame, chunks[0], stats);
    }
}

fn render_grid<B: ProfileBackend, R: Rng>(frame: &mut Frame, area: Rect, app: &App<B, R>) {
    let block = Block::default()
        .title(" Minesweep ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grid = app.session.grid();
    let round_over = app.session.status().is_over();

    // Each cell is 2 chars wide, 1 char tall
    let grid_width = (grid.width() * 2) as u16;
    let grid_height = grid.height() as u16;
    let x_offset = inner.x + (inner.width.saturating_sub(grid_width)) / 2;
    let y_offset = inner.y + (inner.height.saturating_sub(grid_height)) / 2;

    for row in 0..grid.height() {
        let mut spans = Vec::with_capacity(grid.width());

        for col in 0..grid.width() {
            let Some(cell) = grid.cell(row, col) else {
                continue;
            };
            let (text, mut style) = if app.session.is_shielded(row, col) {
                ("S ", Style::default().fg(Color::Cyan))
            } else {
                match (cell.is_revealed, app.is_highlighted((row, col))) {
                    (false, Some(HighlightKind::Mine)) => (
                        "! ",
                        Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
                    ),
                    (false, Some(HighlightKind::SafeCell)) => (
                        "+ ",
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    ),
                    _ => cell_display(cell),
                }
            };

            if app.cursor == (row, col) && !round_over {
                style = style.bg(Color::DarkGray);
            }
            spans.push(Span::styled(text, style));
        }

        if y_offset + row as u16 >= inner.y + inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(x_offset, y_offset + row as u16, grid_width.min(inner.width), 1),
        );
    }
}

/// Display text and style for a cell without overlays.
fn cell_display(cell: &Cell) -> (&'static str, Style) {
    if cell.is_flagged && !cell.is_revealed {
        return ("F ", Style::default().fg(Color::Red));
    }
    if !cell.is_revealed {
        return ("# ", Style::default().fg(Color::Gray));
    }
    if cell.is_mine {
        return ("* ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    }

    let (text, color) = match cell.neighbor_mines {
        0 => (". ", Color::DarkGray),
        1 => ("1 ", Color::Blue),
        2 => ("2 ", Color::Green),
        3 => ("3 ", Color::Red),
        4 => ("4 ", Color::Magenta),
        5 => ("5 ", Color::Yellow),
        6 => ("6 ", Color::Cyan),
        7 => ("7 ", Color::Gray),
        8 => ("8 ", Color::White),
        _ => ("? ", Color::White),
    };
    (text, Style::default().fg(color))
}

fn label<'a>(text: impl Into<Cow<'a, str>>) -> Span<'a> {
    Span::styled(text, Style::default().fg(Color::DarkGray))
}

fn render_info_panel<B: ProfileBackend, R: Rng>(frame: &mut Frame, area: Rect, app: &App<B, R>) {
    let block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let session = &app.session;
    let profile = session.profile();
    let info = session.level_info();

    let remaining = session.mines_remaining();
    let remaining_color = if remaining < 0 {
        Color::Red
    } else {
        Color::White
    };

    let mut time_spans = vec![
        label("Time: "),
        Span::styled(
            format!("{}s", session.elapsed_seconds()),
            Style::default().fg(Color::White),
        ),
    ];
    if session.timer().is_frozen() {
        time_spans.push(Span::styled(
            format!(" (frozen {}s)", session.timer().freeze_remaining().as_secs()),
            Style::default().fg(Color::Cyan),
        ));
    }

    let best = profile
        .best_time_seconds
        .map_or_else(|| "-".to_string(), |t| format!("{}s", t));

    let status = match session.status() {
        RoundStatus::Fresh => Span::styled("Reveal a cell to begin", Style::default().fg(Color::Yellow)),
        RoundStatus::InProgress => Span::styled("Sweeping...", Style::default().fg(Color::Green)),
        RoundStatus::Won => Span::styled("Cleared!", Style::default().fg(Color::Green)),
        RoundStatus::Lost => Span::styled("Boom!", Style::default().fg(Color::Red)),
    };

    let lines = vec![
        Line::from(time_spans),
        Line::from(vec![
            label("Mines left: "),
            Span::styled(format!("{}", remaining), Style::default().fg(remaining_color)),
        ]),
        Line::from(vec![
            label("Level: "),
            Span::styled(
                format!("{}", info.level),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            label(format!("  XP {}/{}", info.xp, info.xp_to_next_level)),
        ]),
        Line::from(vec![
            label("Score: "),
            Span::styled(
                format!("{}", profile.total_score),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            label("Best: "),
            Span::styled(best, Style::default().fg(Color::White)),
            label(format!("  Won {}/{}", profile.games_won, profile.games_played)),
        ]),
        Line::from(""),
        Line::from(status),
    ];

    let text_area = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(2));
    frame.render_widget(Paragraph::new(lines), text_area);

    if inner.height >= 2 {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .percent(info.progress_percent.min(100) as u16)
            .label(format!("{}%", info.progress_percent));
        frame.render_widget(
            gauge,
            Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
        );
    }
}

fn render_ability_panel<B: ProfileBackend, R: Rng>(
    frame: &mut Frame,
    area: Rect,
    app: &App<B, R>,
) {
    let block = Block::default()
        .title(" Abilities ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let round_over = app.session.status().is_over();
    let total_score = app.session.profile().total_score;
    let mut lines = Vec::new();

    for (slot, view) in app.session.ability_views().iter().enumerate() {
        let name_style = if view.available(round_over) {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let cost_style = if total_score >= view.level_up_cost {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", slot + 1), Style::default().fg(Color::Yellow)),
            Span::raw(format!("{} ", view.icon)),
            Span::styled(view.name, name_style),
            Span::styled(
                format!(" x{} L{}", view.uses, view.level),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("up: {} score", view.level_up_cost), cost_style),
        ]));
    }

    lines.push(Line::from(""));
    for hint in [
        "[Arrows] Move  [Enter] Reveal",
        "[F] Flag  [1-6] Use ability",
        "[Shift+1-6] Level up",
        "[R] New round  [Q] Quit",
    ] {
        lines.push(Line::from(label(hint)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_banner(frame: &mut Frame, area: Rect, text: &str) {
    if area.height < 3 {
        return;
    }
    let banner_area = Rect::new(area.x + 1, area.y + area.height - 2, area.width.saturating_sub(2), 1);
    frame.render_widget(Clear, banner_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        banner_area,
    );
}

fn render_game_over_overlay(frame: &mut Frame, area: Rect, stats: &RoundStats) {
    let (title, color) = if stats.won {
        ("Board Cleared!", Color::Green)
    } else {
        ("Mine Triggered!", Color::Red)
    };

    let width = 34.min(area.width);
    let height = 11.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Time: {}s", stats.time_seconds)),
        Line::from(format!("Round score: {}", stats.round_score)),
        Line::from(format!("Total score: {}", stats.total_score)),
        Line::from(format!(
            "Level {}  XP {}/{} (+{})",
            stats.level, stats.xp, stats.xp_to_next_level, stats.xp_gained
        )),
    ];
    if stats.new_best_time {
        lines.push(Line::from(Span::styled(
            "New best time!",
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(Span::styled(
        "[R] New round  [Any] Close",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
