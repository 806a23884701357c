//! UI rendering

use crate::render::{CardView, Display};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use ratatui_image::{StatefulImage, protocol::StatefulProtocol};
use std::time::Instant;

use super::app::App;

/// Cards stop growing past this width
const CARD_MAX_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 18;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input + button
            Constraint::Min(0),    // Display area
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let search_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(chunks[0]);

    render_search_input(frame, app, search_row[0]);
    render_search_button(frame, app, search_row[1]);
    render_display(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let cursor_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    let text_style = Style::default().fg(Color::White);

    let (before, after) = app.search_input.text.split_at(app.search_input.cursor);
    let cursor_char = after.chars().next();
    let after_cursor = if let Some(c) = cursor_char {
        &after[c.len_utf8()..]
    } else {
        ""
    };

    let mut spans = Vec::new();
    if !before.is_empty() {
        spans.push(Span::styled(before, text_style));
    }

    // Block cursor on the character under it, or a bar at the end
    if let Some(c) = cursor_char {
        spans.push(Span::styled(c.to_string(), cursor_style));
    } else {
        spans.push(Span::styled("█", Style::default().fg(Color::White)));
    }

    if !after_cursor.is_empty() {
        spans.push(Span::styled(after_cursor, text_style));
    }

    if app.search_input.text.is_empty() {
        spans.push(Span::styled(
            " name or number, e.g. pikachu",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Pokémon ", Style::default().fg(Color::Yellow)));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_search_button(frame: &mut Frame, app: &mut App, area: Rect) {
    app.search_button = area;

    let style = if app.controller.can_trigger() {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style);
    let label = Paragraph::new(Line::from(Span::styled(" Search ", style)))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(label, area);
}

fn render_display(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.controller.display() {
        Display::Empty => {
            if app.controller.can_trigger() {
                let hint = Paragraph::new(Line::from(Span::styled(
                    "Type a name and press Enter",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )))
                .alignment(Alignment::Center);
                frame.render_widget(hint, centered_row(area));
            }
        }
        Display::Error(message) => render_error(frame, message, area),
        Display::Card(card) => render_card(frame, card, &mut app.sprites, area),
    }
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(Color::Red));
    let para = Paragraph::new(Line::from(Span::styled(
        format!(" {}", message),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )))
    .block(block)
    .wrap(Wrap { trim: false });

    let area = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(1).min(3),
    };
    frame.render_widget(para, area);
}

fn render_card(
    frame: &mut Frame,
    card: &CardView,
    sprites: &mut [Option<StatefulProtocol>],
    area: Rect,
) {
    let width = area.width.min(CARD_MAX_WIDTH);
    let area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + 1u16.min(area.height),
        width,
        height: area.height.saturating_sub(1).min(CARD_HEIGHT),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            format!(" {} ", card.number),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Name
            Constraint::Length(1), // Type badges
            Constraint::Length(1), // Height / weight / xp
            Constraint::Length(1),
            Constraint::Min(0), // Image slots
        ])
        .split(inner);

    let name = Paragraph::new(Line::from(Span::styled(
        card.name.as_str(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(name, rows[0]);

    let mut badges = Vec::new();
    for (i, kind) in card.types.iter().enumerate() {
        if i > 0 {
            badges.push(Span::raw(" "));
        }
        badges.push(Span::styled(
            format!(" {} ", kind.to_uppercase()),
            Style::default()
                .fg(Color::Black)
                .bg(type_color(kind))
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(badges)).alignment(Alignment::Center),
        rows[1],
    );

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);
    let stats = Line::from(vec![
        Span::styled("HEIGHT ", label),
        Span::styled(card.height.as_str(), value),
        Span::styled("   WEIGHT ", label),
        Span::styled(card.weight.as_str(), value),
        Span::styled("   XP ", label),
        Span::styled(card.experience.as_str(), value),
    ]);
    frame.render_widget(
        Paragraph::new(stats).alignment(Alignment::Center),
        rows[2],
    );

    render_sprites(frame, card, sprites, rows[4]);
}

/// Three equal columns, one per image slot
fn render_sprites(
    frame: &mut Frame,
    card: &CardView,
    sprites: &mut [Option<StatefulProtocol>],
    area: Rect,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for ((slot, decoded), col) in card.sprites.iter().zip(sprites.iter_mut()).zip(cols.iter()) {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(*col);

        frame.render_widget(
            Paragraph::new(Span::styled(slot.label, Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Center),
            parts[0],
        );

        if let Some(protocol) = decoded.as_mut() {
            frame.render_stateful_widget(StatefulImage::default(), parts[1], protocol);
            continue;
        }

        let fallback = match slot.url.as_deref() {
            Some(url) => Span::styled(
                url.rsplit('/').next().unwrap_or(url).to_string(),
                Style::default().fg(Color::Gray),
            ),
            None => Span::styled(
                "(no image)",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        };
        frame.render_widget(
            Paragraph::new(fallback).alignment(Alignment::Center),
            centered_row(parts[1]),
        );
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::new();

    if let Some(busy) = app.controller.busy() {
        spans.push(Span::styled(
            format!(" {} Searching {}…", spinner_frame(busy.started_at), busy.query),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::DIM),
        ));
    } else {
        spans.push(Span::styled(" Ready", dim));
    }

    spans.push(Span::styled("   [Enter] search  [Esc] quit", dim));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Single row in the vertical middle of `area`
fn centered_row(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: area.height.min(1),
    }
}

fn type_color(kind: &str) -> Color {
    match kind {
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "grass" => Color::Rgb(120, 200, 80),
        "electric" => Color::Rgb(248, 208, 48),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "dark" => Color::Rgb(112, 88, 72),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        _ => Color::Gray,
    }
}

fn spinner_frame(started_at: Instant) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let elapsed = started_at.elapsed().as_millis() / 80;
    let idx = (elapsed as usize) % FRAMES.len();
    FRAMES[idx]
}
