use crate::insert::insert_word;
use crate::state::{Focus, Order, State};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    InputChar(char),
    InsertText(String),
    InputBackspace,
    InputDelete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    NextSuggestion,
    PrevSuggestion,
    AcceptSuggestion,
    Reset,
    ToggleFocus,
    FocusEditor,
    SourceNext,
    SourcePrev,
    ToggleSelectedSource,
}

/// What the event loop must do after the state change
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    Nothing,
    /// Re-arm the debouncer with the current input
    Schedule,
    /// Issue a prediction for the current input right away, bypassing the debouncer
    RequestNow,
    /// Send a source toggle, then re-predict with the current input
    Toggle { name: String, active: bool },
}

pub fn apply_action(state: &mut State, action: Action) -> ActionResult {
    if !matches!(action, Action::None) {
        state.dirty = true;
    }

    match action {
        Action::None => ActionResult::Nothing,

        Action::InputChar(c) => {
            state.input.insert(state.input_cursor, c);
            state.input_cursor += c.len_utf8();
            ActionResult::Schedule
        }
        Action::InsertText(text) => {
            if text.is_empty() {
                return ActionResult::Nothing;
            }
            state.input.insert_str(state.input_cursor, &text);
            state.input_cursor += text.len();
            ActionResult::Schedule
        }
        Action::InputBackspace => {
            if state.input_cursor == 0 {
                return ActionResult::Nothing;
            }
            // Find the previous character boundary
            let prev = state.input[..state.input_cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            state.input.remove(prev);
            state.input_cursor = prev;
            ActionResult::Schedule
        }
        Action::InputDelete => {
            if state.input_cursor >= state.input.len() {
                return ActionResult::Nothing;
            }
            state.input.remove(state.input_cursor);
            ActionResult::Schedule
        }
        Action::CursorLeft => {
            if state.input_cursor > 0 {
                state.input_cursor = state.input[..state.input_cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
            }
            ActionResult::Nothing
        }
        Action::CursorRight => {
            if let Some(c) = state.input[state.input_cursor..].chars().next() {
                state.input_cursor += c.len_utf8();
            }
            ActionResult::Nothing
        }
        Action::CursorHome => {
            state.input_cursor = 0;
            ActionResult::Nothing
        }
        Action::CursorEnd => {
            state.input_cursor = state.input.len();
            ActionResult::Nothing
        }

        Action::NextSuggestion => {
            if !state.suggestions.is_empty() {
                state.selected_suggestion = (state.selected_suggestion + 1) % state.suggestions.len();
            }
            ActionResult::Nothing
        }
        Action::PrevSuggestion => {
            if !state.suggestions.is_empty() {
                let len = state.suggestions.len();
                state.selected_suggestion = (state.selected_suggestion + len - 1) % len;
            }
            ActionResult::Nothing
        }
        Action::AcceptSuggestion => {
            let Some(suggestion) = state.suggestions.get(state.selected_suggestion) else {
                return ActionResult::Nothing;
            };
            let (text, cursor) = insert_word(&state.input, state.input_cursor, &suggestion.word);
            state.input = text;
            state.input_cursor = cursor;
            // Insertion is not terminal: refresh suggestions for the new context
            ActionResult::Schedule
        }

        Action::Reset => {
            state.input.clear();
            state.input_cursor = 0;
            state.suggestions.clear();
            state.selected_suggestion = 0;
            state.order = Order::First;
            ActionResult::RequestNow
        }

        Action::ToggleFocus => {
            state.focus = match state.focus {
                Focus::Editor => Focus::Sources,
                Focus::Sources => Focus::Editor,
            };
            ActionResult::Nothing
        }
        Action::FocusEditor => {
            state.focus = Focus::Editor;
            ActionResult::Nothing
        }
        Action::SourceNext => {
            if !state.sources.is_empty() {
                state.selected_source = (state.selected_source + 1).min(state.sources.len() - 1);
            }
            ActionResult::Nothing
        }
        Action::SourcePrev => {
            state.selected_source = state.selected_source.saturating_sub(1);
            ActionResult::Nothing
        }
        Action::ToggleSelectedSource => {
            let Some(source) = state.sources.get_mut(state.selected_source) else {
                return ActionResult::Nothing;
            };
            // Patch the cached entry in place; the list is never re-fetched
            source.active = !source.active;
            ActionResult::Toggle { name: source.name.clone(), active: source.active }
        }
    }
}
