//! Status bar rendering with keybindings and state indicators

use crate::controls::Direction;
use crate::lab::LabSnapshot;
use crate::render::RenderMode;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn badge(text: String, bg: Color) -> Span<'static> {
    Span::styled(
        text,
        Style::default()
            .bg(bg)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, message: &str, lab: &LabSnapshot) {
    let layout = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let failing = lab.stats.last_failure.is_some() || lab.last_warning.is_some();
    let left_spans = vec![
        badge(
            format!(" {} ", lab.name),
            if failing {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.primary
            },
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if failing {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
        Span::styled(
            format!(
                " t={:.1}s  {} drawn / {} skipped ",
                lab.seconds, lab.stats.painted, lab.stats.skipped
            ),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut hints: Vec<(&str, &str)> = vec![("a/d", "adjust"), ("q/e", "select"), (":", "set")];
    hints.extend(lab.key_hints.iter().copied());
    hints.push(("esc", "quit"));

    let mut right_spans = Vec::with_capacity(hints.len() * 4 + 2);
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }

    let indicator = match (lab.mode, lab.held, lab.running) {
        (_, Some(Direction::Decrease), _) => badge(" ◀ HOLD ".into(), DEFAULT_THEME.secondary),
        (_, Some(Direction::Increase), _) => badge(" HOLD ▶ ".into(), DEFAULT_THEME.secondary),
        (RenderMode::OnChange, None, _) => badge(" STATIC ".into(), DEFAULT_THEME.primary),
        (RenderMode::Continuous, None, true) => badge(" ▶ RUNNING ".into(), DEFAULT_THEME.success),
        (RenderMode::Continuous, None, false) => badge(" ⏸ PAUSED ".into(), DEFAULT_THEME.error),
    };
    right_spans.push(Span::styled("│", sep_style));
    right_spans.push(indicator);

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
