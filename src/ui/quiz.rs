//! The live match screen.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::engine::{Phase, QuestionView, Snapshot};

const OPTION_LABELS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];
const LOW_TIME: u32 = 10;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(snapshot) = app.snapshot() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Status
        Constraint::Length(3), // Progress gauges
        Constraint::Length(5), // Question text
        Constraint::Min(6),    // Options
        Constraint::Length(1), // Error line
        Constraint::Length(1), // Controls
    ])
    .margin(1)
    .split(area);

    render_status(frame, chunks[0], &snapshot);
    render_gauges(frame, chunks[1], &snapshot);

    match &snapshot.question {
        Some(question) => {
            render_question_text(frame, chunks[2], question);
            render_options(frame, chunks[3], question, &snapshot, app.cursor());
        }
        None => {
            let settling = Paragraph::new("Match complete! Tallying rewards...")
                .alignment(Alignment::Center)
                .fg(Color::Yellow);
            frame.render_widget(settling, chunks[3]);
        }
    }

    if let Some(error) = app.last_error() {
        frame.render_widget(Paragraph::new(error).fg(Color::Red), chunks[4]);
    }
    render_controls(frame, chunks[5]);
}

fn render_status(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let question_number = (snapshot.current_index + 1).min(snapshot.total_questions);
    let time_style = if snapshot.phase == Phase::Active && snapshot.time_remaining <= LOW_TIME {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().fg(Color::White).bold()
    };

    let line = Line::from(vec![
        Span::styled(
            format!("Q {}/{}", question_number, snapshot.total_questions),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("   "),
        Span::styled(format!("{}s", snapshot.time_remaining), time_style),
        Span::raw("   "),
        Span::styled(
            format!("score {}", snapshot.score),
            Style::default().fg(Color::Yellow).bold(),
        ),
        Span::raw("   "),
        Span::styled(
            format!("streak {}", snapshot.streak),
            Style::default().fg(Color::Green).bold(),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_gauges(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let halves =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    frame.render_widget(
        progress_gauge(" You ", snapshot.player_progress, Color::Green),
        halves[0],
    );
    frame.render_widget(
        progress_gauge(" Opponent ", snapshot.opponent_progress, Color::Red),
        halves[1],
    );
}

fn progress_gauge(title: &str, progress: f64, color: Color) -> Gauge<'_> {
    let ratio = (progress / 100.0).clamp(0.0, 1.0);

    Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .title(title),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(format!("{:.0}%", progress))
}

fn render_question_text(frame: &mut Frame, area: Rect, question: &QuestionView) {
    let widget = Paragraph::new(question.text.as_str())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .title(format!(
                    " {} · {} · {} pts ",
                    question.subject, question.difficulty, question.points
                ))
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &QuestionView,
    snapshot: &Snapshot,
    cursor: usize,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let style = option_style(index, snapshot, cursor);
        let marker = if snapshot.phase == Phase::Active && index == cursor {
            ">"
        } else {
            " "
        };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('·');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Highlights the cursor while live; once revealing, the correct option is
/// green and a wrong pick is red.
fn option_style(index: usize, snapshot: &Snapshot, cursor: usize) -> Style {
    match snapshot.correct_option {
        Some(correct) if index == correct => Style::default().fg(Color::Green).bold(),
        Some(_) if snapshot.selected_option == Some(index) => {
            Style::default().fg(Color::Red).bold()
        }
        Some(_) => Style::default().fg(Color::DarkGray),
        None if index == cursor => Style::default().fg(Color::Cyan).bold(),
        None => Style::default().fg(Color::Gray),
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k navigate  ·  1-9 or enter answer  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
