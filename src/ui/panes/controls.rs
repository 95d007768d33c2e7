//! Control list pane: one slider row per control, active row highlighted

use crate::lab::ControlView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

const LABEL_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 12;

fn block() -> Block<'static> {
    Block::default()
        .title(" Controls ")
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD),
        )
        .padding(Padding::new(1, 1, 0, 0))
}

/// Screen rows occupied by each control, in store order.
///
/// Rows that do not fit are omitted; the app uses these for mouse hits.
pub fn control_rows(area: Rect, count: usize) -> Vec<Rect> {
    let inner = block().inner(area);
    (0..count)
        .take_while(|&i| (i as u16) < inner.height)
        .map(|i| Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        })
        .collect()
}

fn slider(normalized: f64, width: usize) -> (String, String) {
    let filled = ((normalized.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    ("━".repeat(filled), "─".repeat(width - filled))
}

fn control_line(control: &ControlView, bar_width: usize) -> Line<'static> {
    let row_bg = if control.active {
        DEFAULT_THEME.current_line_bg
    } else {
        Color::Reset
    };
    let base = Style::default().bg(row_bg);
    let (label_fg, value_fg, fill_fg) = if !control.enabled {
        (
            DEFAULT_THEME.comment,
            DEFAULT_THEME.comment,
            DEFAULT_THEME.gauge_track,
        )
    } else if control.active {
        (
            DEFAULT_THEME.border_focused,
            DEFAULT_THEME.value,
            DEFAULT_THEME.gauge_fill,
        )
    } else {
        (DEFAULT_THEME.fg, DEFAULT_THEME.value, DEFAULT_THEME.gauge_fill)
    };

    let marker = if control.active { "▶ " } else { "  " };
    let label: String = control.label.chars().take(LABEL_WIDTH - 2).collect();
    let spring = if control.momentary { "⟲ " } else { "  " };
    let (filled, empty) = slider(control.normalized, bar_width);

    let mut label_style = base.fg(label_fg);
    if control.active {
        label_style = label_style.add_modifier(Modifier::BOLD);
    }
    if !control.enabled {
        label_style = label_style.add_modifier(Modifier::DIM);
    }

    Line::from(vec![
        Span::styled(marker, base.fg(DEFAULT_THEME.border_focused)),
        Span::styled(
            format!("{:<width$}", label, width = LABEL_WIDTH - 2),
            label_style,
        ),
        Span::styled(spring, base.fg(DEFAULT_THEME.momentary)),
        Span::styled(filled, base.fg(fill_fg)),
        Span::styled(empty, base.fg(DEFAULT_THEME.gauge_track)),
        Span::styled(
            format!(" {:>width$}", control.display, width = VALUE_WIDTH),
            base.fg(value_fg),
        ),
    ])
}

/// Render the control list
pub fn render_controls_pane(frame: &mut Frame, area: Rect, controls: &[ControlView]) {
    let block = block();
    let inner = block.inner(area);
    let bar_width = (inner.width as usize).saturating_sub(2 + LABEL_WIDTH + VALUE_WIDTH + 1);

    let lines: Vec<Line> = controls
        .iter()
        .map(|c| control_line(c, bar_width))
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_fill() {
        assert_eq!(slider(0.5, 10), ("━".repeat(5), "─".repeat(5)));
        assert_eq!(slider(1.4, 4).0, "━".repeat(4));
        assert_eq!(slider(0.0, 3).1, "─".repeat(3));
    }

    #[test]
    fn test_control_rows_clip_to_pane() {
        let area = Rect::new(0, 0, 40, 5);
        let rows = control_rows(area, 10);
        // borders take two rows
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].y, 1);
        assert_eq!(rows[0].x, 2);
    }
}
