use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::actions::Action;
use crate::state::{Focus, State};

/// Translate a terminal event into an action. `None` means quit.
pub fn handle_event(event: &Event, state: &State) -> Option<Action> {
    match event {
        Event::Key(key) => {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

            // Global Ctrl shortcuts (always handled first)
            if ctrl {
                match key.code {
                    KeyCode::Char('q') => return None, // Quit
                    KeyCode::Char('r') => return Some(Action::Reset),
                    KeyCode::Char('t') => return Some(Action::ToggleFocus),
                    _ => {}
                }
            }

            match state.focus {
                Focus::Sources => Some(handle_sources_key(key)),
                Focus::Editor => Some(handle_editor_key(key)),
            }
        }
        Event::Paste(text) => Some(Action::InsertText(text.clone())),
        _ => Some(Action::None),
    }
}

fn handle_editor_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputChar(c),
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Delete => Action::InputDelete,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::Home => Action::CursorHome,
        KeyCode::End => Action::CursorEnd,
        KeyCode::Tab => Action::NextSuggestion,
        KeyCode::BackTab => Action::PrevSuggestion,
        KeyCode::Enter => Action::AcceptSuggestion,
        _ => Action::None,
    }
}

/// Key handling while the source checklist has focus
fn handle_sources_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::FocusEditor,
        KeyCode::Up => Action::SourcePrev,
        KeyCode::Down => Action::SourceNext,
        KeyCode::Char(' ') | KeyCode::Enter => Action::ToggleSelectedSource,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn editor_keys_map_to_edit_actions() {
        let state = State::default();
        assert_eq!(handle_event(&key(KeyCode::Char('a')), &state), Some(Action::InputChar('a')));
        assert_eq!(handle_event(&key(KeyCode::Backspace), &state), Some(Action::InputBackspace));
        assert_eq!(handle_event(&key(KeyCode::Enter), &state), Some(Action::AcceptSuggestion));
        assert_eq!(handle_event(&key(KeyCode::Tab), &state), Some(Action::NextSuggestion));
    }

    #[test]
    fn ctrl_shortcuts_win_over_focus() {
        let mut state = State::default();
        assert_eq!(handle_event(&ctrl('q'), &state), None);
        assert_eq!(handle_event(&ctrl('r'), &state), Some(Action::Reset));
        state.focus = Focus::Sources;
        assert_eq!(handle_event(&ctrl('t'), &state), Some(Action::ToggleFocus));
    }

    #[test]
    fn source_focus_reroutes_keys() {
        let mut state = State::default();
        state.focus = Focus::Sources;
        assert_eq!(handle_event(&key(KeyCode::Down), &state), Some(Action::SourceNext));
        assert_eq!(
            handle_event(&key(KeyCode::Char(' ')), &state),
            Some(Action::ToggleSelectedSource)
        );
        assert_eq!(handle_event(&key(KeyCode::Esc), &state), Some(Action::FocusEditor));
    }

    #[test]
    fn paste_becomes_insert_text() {
        let state = State::default();
        assert_eq!(
            handle_event(&Event::Paste("two words".into()), &state),
            Some(Action::InsertText("two words".into()))
        );
    }
}
