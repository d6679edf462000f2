//! Rendering for the timer, heatmap, settings and help views.

use chrono::Datelike;
use ratatui::{prelude::*, widgets::*};

use crate::app::{App, SettingsField, View};
use crate::timer::{Phase, Status};

const ACCENT: Color = Color::Rgb(255, 160, 0);
const BORDER: Color = Color::Rgb(0, 150, 200);

// Empty cell plus four greens, darkest to brightest so heavy days pop on a
// dark terminal.
const HEAT_RAMP: [Color; 5] = [
    Color::Rgb(55, 58, 64),
    Color::Rgb(16, 69, 29),
    Color::Rgb(26, 116, 49),
    Color::Rgb(37, 162, 68),
    Color::Rgb(74, 214, 109),
];

pub fn render(f: &mut Frame, app: &App) {
    match app.view {
        View::Timer => render_timer(f, app),
        View::Heatmap => render_heatmap(f, app),
        View::Settings => render_settings(f, app),
        View::Help => render_help(f),
    }
}

fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Focus => Color::Rgb(100, 181, 246),
        Phase::Break => Color::Rgb(129, 199, 132),
    }
}

// Intensity bands are presentation only; thresholds are roughly hours of
// focus per day (0, <2h, <4h, <6h, 6h+).
fn heat_color(minutes: u64) -> Color {
    match minutes {
        0 => HEAT_RAMP[0],
        1..=119 => HEAT_RAMP[1],
        120..=239 => HEAT_RAMP[2],
        240..=359 => HEAT_RAMP[3],
        _ => HEAT_RAMP[4],
    }
}

fn render_timer(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(f.size());

    f.render_widget(header_block(), chunks[0]);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(15),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Percentage(15),
        ])
        .split(chunks[1]);

    let color = phase_color(app.timer.phase());

    f.render_widget(centered_line(app.timer.phase().name().into(), color), sections[1]);

    let time_color = if app.timer.elapsed_seconds() < 0 {
        Color::Red
    } else {
        color
    };
    f.render_widget(centered_line(app.timer.display_time(), time_color), sections[3]);

    let (status, status_color) = match app.timer.status() {
        Status::Idle => ("■ IDLE", Color::DarkGray),
        Status::Running => ("▶ RUNNING", Color::Green),
        Status::Paused => ("⏸ PAUSED", Color::Yellow),
    };
    f.render_widget(centered_line(status.into(), status_color), sections[5]);

    f.render_widget(
        Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent((app.timer.progress_ratio() * 100.0) as u16),
        sections[7],
    );

    let now = chrono::Local::now();
    let info = vec![
        Line::from(Span::styled(
            now.format("%A, %B %d, %Y").to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("Activity: {}", app.timer.config.activity_label),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(info).alignment(Alignment::Center),
        sections[9],
    );

    render_footer(
        f,
        app,
        chunks[2],
        &[
            ("Space", "Start/Pause"),
            ("R", "Reset"),
            ("B", "Focus/Break"),
            ("G", "Heatmap"),
            ("D", "Settings"),
            ("H", "Help"),
            ("Q", "Quit"),
        ],
    );
}

fn render_heatmap(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(f.size());

    f.render_widget(header_block(), chunks[0]);

    let series = &app.heatmap;

    // One column per week, Monday at the top; the first column is padded so
    // every date lands on its weekday row.
    let lead = series
        .first()
        .map(|(date, _)| date.weekday().num_days_from_monday())
        .unwrap_or(0) as usize;
    let weeks = (lead + series.len() + 6) / 7;

    let mut grid = vec![vec![None; weeks]; 7];
    for (i, (date, total)) in series.iter().enumerate() {
        let row = date.weekday().num_days_from_monday() as usize;
        grid[row][(lead + i) / 7] = Some(*total);
    }

    // Month names over the columns where a month begins. Cells are two
    // characters wide and months are at least four columns apart, so the
    // three-letter names never collide.
    let mut labels = vec![b' '; weeks * 2];
    for (i, (date, _)) in series.iter().enumerate() {
        if date.day() == 1 {
            let pos = (lead + i) / 7 * 2;
            let name = date.format("%b").to_string();
            if pos + name.len() <= labels.len() {
                labels[pos..pos + name.len()].copy_from_slice(name.as_bytes());
            }
        }
    }
    let month_line = String::from_utf8(labels).unwrap_or_default();

    let day_names = ["Mon", "", "Wed", "", "Fri", "", ""];
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("    {month_line}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    for (row, cells) in grid.iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!("{:<4}", day_names[row]),
            Style::default().fg(Color::DarkGray),
        )];
        for cell in cells {
            match cell {
                Some(total) => {
                    spans.push(Span::styled("■ ", Style::default().fg(heat_color(*total))))
                }
                None => spans.push(Span::raw("  ")),
            }
        }
        lines.push(Line::from(spans));
    }

    let total_minutes: u64 = series.iter().map(|(_, minutes)| minutes).sum();
    lines.push(Line::from(""));
    let mut legend = vec![Span::styled("    Less ", Style::default().fg(Color::DarkGray))];
    for color in HEAT_RAMP {
        legend.push(Span::styled("■ ", Style::default().fg(color)));
    }
    legend.push(Span::styled("More", Style::default().fg(Color::DarkGray)));
    lines.push(Line::from(legend));
    lines.push(Line::from(Span::styled(
        format!(
            "    {:.1} hours of focus in the past year",
            total_minutes as f64 / 60.0
        ),
        Style::default().fg(Color::Gray),
    )));

    f.render_widget(
        Paragraph::new(lines).block(titled_block(" Focus Heatmap (Past Year) ")),
        chunks[1],
    );

    render_footer(
        f,
        app,
        chunks[2],
        &[("G / Esc", "Back to timer"), ("R", "Reload"), ("Q", "Back")],
    );
}

fn render_settings(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 80, f.size());

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "⚙  SETTINGS",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  ↑↓/jk: Navigate  •  Enter: Edit  •  Esc: Back",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let config = &app.timer.config;
    let fields = [
        (
            SettingsField::FocusMinutes,
            "🎯 Focus Time",
            format!("{} min", config.focus_minutes),
        ),
        (
            SettingsField::BreakMinutes,
            "☕ Break Time",
            format!("{} min", config.break_minutes),
        ),
        (
            SettingsField::ActivityLabel,
            "🏷  Activity Label",
            config.activity_label.clone(),
        ),
    ];

    for (field, label, value) in fields {
        let selected = app.settings_field == field;
        let editing = selected && app.settings_editing;

        lines.push(Line::from(""));

        if editing {
            lines.push(Line::from(vec![
                Span::styled("  > ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(label, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    app.settings_input.clone(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", Style::default().fg(Color::Green)),
            ]));
        } else {
            let (prefix, label_style, value_style) = if selected {
                (
                    "  > ",
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )
            } else {
                (
                    "    ",
                    Style::default().fg(Color::Gray),
                    Style::default().fg(Color::DarkGray),
                )
            };

            lines.push(Line::from(vec![
                Span::styled(prefix, label_style),
                Span::styled(label, label_style),
            ]));
            lines.push(Line::from(vec![Span::raw("    "), Span::styled(value, value_style)]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Applied values are saved to config.json",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(Paragraph::new(lines).block(titled_block(" Settings ")), area);
}

fn render_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.size());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "⌨  KEYBOARD SHORTCUTS",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Timer:"),
        help_line("Space", "Start, pause or resume the countdown"),
        help_line("R", "Reset the current phase (focus progress is logged)"),
        help_line("B", "Switch between focus and break"),
        Line::from(""),
        Line::from("  Views:"),
        help_line("G", "Calendar heatmap of logged focus time"),
        help_line("D", "Settings (durations, activity label)"),
        help_line("H / ?", "Toggle this help"),
        Line::from(""),
        Line::from("  General:"),
        help_line("Q / Esc", "Quit (an in-progress focus run is logged)"),
        Line::from(""),
        Line::from(Span::styled(
            "  Focus minutes accumulate per day and per activity label",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Paragraph::new(lines).block(titled_block(" Help ")), area);
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(key, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", desc)),
    ])
}

fn render_footer(f: &mut Frame, app: &App, area: Rect, keys: &[(&str, &str)]) {
    let mut spans = Vec::new();
    for (i, (key, desc)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  •  "));
        }
        spans.push(Span::styled(
            *key,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {desc}")));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(message) = &app.message {
        lines.push(Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn centered_line(text: String, color: Color) -> Paragraph<'static> {
    Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
}

fn header_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            " ⏱ FOCUSGRID ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
}

fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - height) / 2),
            Constraint::Percentage(height),
            Constraint::Percentage((100 - height) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width) / 2),
            Constraint::Percentage(width),
            Constraint::Percentage((100 - width) / 2),
        ])
        .split(vertical[1])[1]
}
