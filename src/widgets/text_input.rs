use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use tui_textarea::{CursorMove, Input, Key, TextArea};

use crate::config::Theme;

/// Event emitted by [`TextInput::handle_key`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputEvent {
    None,
    /// Enter pressed
    Submit,
    /// Esc pressed
    Cancel,
    /// The text changed
    Changed,
}

/// Single-line text input wrapping tui-textarea. Used for the file path
/// prompt and the table quick filter.
pub struct TextInput {
    textarea: TextArea<'static>,
    value: String,
    text_color: Option<Color>,
    background_color: Option<Color>,
    focused: bool,
}

impl TextInput {
    pub fn new() -> Self {
        let mut widget = Self {
            textarea: TextArea::default(),
            value: String::new(),
            text_color: None,
            background_color: None,
            focused: false,
        };
        widget.apply_style();
        widget
    }

    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.text_color = Some(theme.get("text_primary"));
        self.apply_style();
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self.apply_style();
        self
    }

    fn apply_style(&mut self) {
        let mut style = Style::default();
        if let Some(fg) = self.text_color {
            style = style.fg(fg);
        }
        if let Some(bg) = self.background_color {
            style = style.bg(bg);
        }
        self.textarea.set_style(style);
        // no underline on the cursor line
        self.textarea.set_cursor_line_style(Style::default());
        self.apply_cursor_style();
    }

    fn apply_cursor_style(&mut self) {
        if self.focused {
            self.textarea
                .set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        } else {
            // same style as the text hides the cursor
            let style = self.textarea.style();
            self.textarea.set_cursor_style(style);
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.apply_cursor_style();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text; newlines become spaces and the cursor moves to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.replace(['\n', '\r'], " ");
        self.textarea = TextArea::new(vec![self.value.clone()]);
        self.apply_style();
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn clear(&mut self) {
        self.set_value("");
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> TextInputEvent {
        match event.code {
            KeyCode::Enter => TextInputEvent::Submit,
            KeyCode::Esc => TextInputEvent::Cancel,
            // single line: vertical movement does nothing
            KeyCode::Up | KeyCode::Down => TextInputEvent::None,
            _ => {
                let before = self.value.len();
                let modified = self.textarea.input(key_event_to_input(event));
                self.value = self.textarea.lines().first().cloned().unwrap_or_default();
                if modified || before != self.value.len() {
                    TextInputEvent::Changed
                } else {
                    TextInputEvent::None
                }
            }
        }
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

fn key_event_to_input(event: &KeyEvent) -> Input {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        _ => Key::Null,
    };

    Input {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.textarea.render(area, buf);

        // tui-textarea underlines the cursor line on some terminals
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let cell = &mut buf[(x, y)];
                let style = cell.style().remove_modifier(Modifier::UNDERLINED);
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_updates_value() {
        let mut input = TextInput::new();
        assert_eq!(input.handle_key(&key(KeyCode::Char('a'))), TextInputEvent::Changed);
        input.handle_key(&key(KeyCode::Char('b')));
        assert_eq!(input.value(), "ab");
        input.handle_key(&key(KeyCode::Backspace));
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn enter_and_esc() {
        let mut input = TextInput::new();
        assert_eq!(input.handle_key(&key(KeyCode::Enter)), TextInputEvent::Submit);
        assert_eq!(input.handle_key(&key(KeyCode::Esc)), TextInputEvent::Cancel);
    }

    #[test]
    fn set_value_and_clear() {
        let mut input = TextInput::new();
        input.set_value("data.csv");
        assert_eq!(input.value(), "data.csv");
        input.handle_key(&key(KeyCode::Char('x')));
        assert_eq!(input.value(), "data.csvx");
        input.clear();
        assert!(input.is_empty());
    }

    #[test]
    fn focus_toggles() {
        let mut input = TextInput::new();
        assert!(!input.is_focused());
        input.set_focused(true);
        assert!(input.is_focused());
    }
}
