use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::engine::Outcome;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    if let Some(outcome) = app.last_outcome() {
        render_outcome(frame, chunks[1], outcome);
    }
    render_history(frame, chunks[2], app);
    render_controls(frame, chunks[3]);
}

fn render_outcome(frame: &mut Frame, area: Rect, outcome: &Outcome) {
    let row = |label: &str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(format!("{:<14}", label), Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().fg(color).bold()),
        ])
    };

    let content = vec![
        Line::from(Span::styled(
            "MATCH COMPLETE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        row("Final score", outcome.final_score.to_string(), Color::Yellow),
        row("Best streak", outcome.best_streak.to_string(), Color::Green),
        row("Coins earned", format!("+{}", outcome.coins_earned), Color::Yellow),
        row("XP earned", format!("+{}", outcome.xp_earned), Color::Magenta),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_history(frame: &mut Frame, area: Rect, app: &App) {
    let profile = app.profile();

    let mut lines = vec![
        Line::from(vec![
            Span::styled(profile.display_name.as_str(), Style::default().fg(Color::White).bold()),
            Span::styled(
                format!(
                    "  {} coins · {} xp · {} matches · best {}",
                    profile.coins,
                    profile.xp,
                    profile.total_matches,
                    profile.best_score().unwrap_or(0)
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
    ];

    for (index, outcome) in profile.recent.iter().rev().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!(
                    "{} pts · streak {} · +{} coins",
                    outcome.final_score, outcome.best_streak, outcome.coins_earned
                ),
                Style::default().fg(Color::Gray),
            ),
        ]));
    }

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("r play again  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
