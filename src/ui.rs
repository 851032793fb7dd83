use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::state::{Focus, State};

// Indigo theme
mod theme {
    use ratatui::style::Color;

    pub const ACCENT: Color = Color::Rgb(129, 140, 248); // indigo
    pub const ACCENT_ALT: Color = Color::Rgb(192, 132, 252); // purple, second-order badge

    pub const TEXT: Color = Color::Rgb(240, 240, 240);
    pub const TEXT_MUTED: Color = Color::Rgb(144, 144, 144);
    pub const ERROR: Color = Color::Rgb(224, 108, 117);

    pub const BG_BASE: Color = Color::Rgb(30, 30, 36);
    pub const BG_CHIP: Color = Color::Rgb(55, 55, 66);

    pub const BORDER: Color = Color::Rgb(70, 70, 82);
    pub const BORDER_FOCUS: Color = Color::Rgb(129, 140, 248);
}

mod chars {
    pub const DOT: &str = "●";
    pub const ARROW_RIGHT: &str = "▸";
    pub const CHECKED: &str = "[x]";
    pub const UNCHECKED: &str = "[ ]";
}

pub fn render(frame: &mut Frame, state: &State) {
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(theme::BG_BASE)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(3), // Suggestions
            Constraint::Min(3),    // Sources
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_input(frame, state, layout[0]);
    render_suggestions(frame, state, layout[1]);
    render_sources(frame, state, layout[2]);
    render_status(frame, state, layout[3]);
}

fn render_input(frame: &mut Frame, state: &State, area: Rect) {
    let border = if state.focus == Focus::Editor { theme::BORDER_FOCUS } else { theme::BORDER };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(" Input ", Style::default().fg(theme::ACCENT).bold()));
    let inner = block.inner(area);

    let input = Paragraph::new(state.input.as_str()).style(Style::default().fg(theme::TEXT)).block(block);
    frame.render_widget(input, area);

    // Terminal cursor at the byte cursor's display column
    if state.focus == Focus::Editor && inner.width > 0 {
        let column = state.input[..state.input_cursor].width() as u16;
        let x = inner.x + column.min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

fn render_suggestions(frame: &mut Frame, state: &State, area: Rect) {
    let badge_color = match state.order {
        crate::state::Order::First => theme::ACCENT_ALT,
        crate::state::Order::Second => theme::ACCENT,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .title(Span::styled(" Suggestions ", Style::default().fg(theme::ACCENT).bold()))
        .title(
            Line::from(Span::styled(format!(" {} ", state.order.label()), Style::default().fg(badge_color)))
                .right_aligned(),
        );

    let line = if state.suggestions.is_empty() {
        Line::from(Span::styled("No suggestions available", Style::default().fg(theme::TEXT_MUTED)))
    } else {
        let mut spans: Vec<Span> = Vec::new();
        for (i, suggestion) in state.suggestions.iter().enumerate() {
            let chip_style = if i == state.selected_suggestion {
                Style::default().fg(theme::BG_BASE).bg(theme::ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::TEXT).bg(theme::BG_CHIP)
            };
            spans.push(Span::styled(format!(" {} ", suggestion.word), chip_style));
            spans.push(Span::styled(
                format!("{:.0}% ", suggestion.probability),
                chip_style.add_modifier(Modifier::DIM),
            ));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_sources(frame: &mut Frame, state: &State, area: Rect) {
    let border = if state.focus == Focus::Sources { theme::BORDER_FOCUS } else { theme::BORDER };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(" Sources ", Style::default().fg(theme::ACCENT).bold()))
        .title(
            Line::from(Span::styled(
                format!(" {} active ", state.active_source_count()),
                Style::default().fg(theme::TEXT_MUTED),
            ))
            .right_aligned(),
        );

    let lines: Vec<Line> = if let Some(message) = &state.sources_error {
        vec![Line::from(Span::styled(
            format!("Error loading sources: {}", message),
            Style::default().fg(theme::ERROR),
        ))]
    } else if state.sources.is_empty() {
        vec![Line::from(Span::styled("Loading sources...", Style::default().fg(theme::TEXT_MUTED)))]
    } else {
        state
            .sources
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let selected = state.focus == Focus::Sources && i == state.selected_source;
                let marker = if selected { chars::ARROW_RIGHT } else { " " };
                let checkbox = if source.active { chars::CHECKED } else { chars::UNCHECKED };
                let name_style = if source.active {
                    Style::default().fg(theme::TEXT)
                } else {
                    Style::default().fg(theme::TEXT_MUTED)
                };
                Line::from(vec![
                    Span::styled(format!("{} ", marker), Style::default().fg(theme::ACCENT)),
                    Span::styled(format!("{} ", checkbox), name_style),
                    Span::styled(source.name.clone(), name_style),
                ])
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status(frame: &mut Frame, state: &State, area: Rect) {
    let status = if state.loading {
        Span::styled(format!("{} predicting", chars::DOT), Style::default().fg(theme::ACCENT))
    } else {
        Span::styled(format!("{} idle", chars::DOT), Style::default().fg(theme::TEXT_MUTED))
    };
    let hints = Span::styled(
        "  Tab cycle  Enter insert  ^T sources  ^R reset  ^Q quit",
        Style::default().fg(theme::TEXT_MUTED),
    );
    frame.render_widget(Paragraph::new(Line::from(vec![status, hints])), area);
}
