//! Readout pane: derived quantities reported by the lab

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

pub fn render_readout_pane(frame: &mut Frame, area: Rect, readout: &[(String, String)]) {
    let block = Block::default()
        .title(" Readout ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    if readout.is_empty() {
        let paragraph = Paragraph::new("(nothing to report)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let key_width = readout
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0);
    let lines: Vec<Line> = readout
        .iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", key, width = key_width),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(value.clone(), Style::default().fg(DEFAULT_THEME.value)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(paragraph, area);
}
