//! Value prompt: a one-line text field for typing an exact control value.
//!
//! Keys typed here are tagged as text entry and never reach the lab's
//! key routing.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Text being typed for one control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePrompt {
    pub control_id: String,
    pub label: String,
    pub buffer: String,
}

impl ValuePrompt {
    pub fn new(control_id: impl Into<String>, label: impl Into<String>) -> Self {
        ValuePrompt {
            control_id: control_id.into(),
            label: label.into(),
            buffer: String::new(),
        }
    }

    /// Accept characters that can form a number
    pub fn push(&mut self, c: char) -> bool {
        if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
            self.buffer.push(c);
            true
        } else {
            false
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn parse(&self) -> Option<f64> {
        self.buffer.trim().parse::<f64>().ok()
    }
}

pub fn render_prompt(frame: &mut Frame, area: Rect, prompt: &ValuePrompt) {
    let spans = vec![
        Span::styled(
            " SET ",
            Style::default()
                .bg(DEFAULT_THEME.secondary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} = ", prompt.label),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
        Span::styled(
            prompt.buffer.clone(),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.value)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "▏",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.border_focused),
        ),
    ];
    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_filters_and_parses() {
        let mut prompt = ValuePrompt::new("energy", "Energy");
        for c in "0.x5a".chars() {
            prompt.push(c);
        }
        assert_eq!(prompt.buffer, "0.5");
        assert_eq!(prompt.parse(), Some(0.5));
        prompt.backspace();
        prompt.backspace();
        assert_eq!(prompt.parse(), Some(0.0));
        prompt.backspace();
        assert_eq!(prompt.parse(), None);
    }
}
