use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::action::Action;

pub struct CommandParser;

impl CommandParser {
    pub fn parse(event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => Self::parse_key(key),
            Event::Paste(text) => {
                let filtered: String = text.chars().filter(|c| *c != '\r').collect();
                Some(Action::Insert(filtered))
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => Some(Action::ScrollUp),
                MouseEventKind::ScrollDown => Some(Action::ScrollDown),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn parse_key(key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('c') if ctrl => Some(Action::Quit),
            KeyCode::Char('v') if ctrl => Some(Action::Paste),
            KeyCode::Char('u') if ctrl => Some(Action::ClearPrompt),
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Action::Insert("\n".to_string()))
            }
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Action::FocusPrev),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::PageUp => Some(Action::ScrollUp),
            KeyCode::PageDown => Some(Action::ScrollDown),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => Some(Action::Insert(c.to_string())),
            _ => None,
        }
    }
}
