//! Key mapping - raw key events to picker and form actions

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Actions understood by the list pickers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerAction {
    Up,
    Down,
    Select,
    StartFilter,
    FilterChar(char),
    FilterBackspace,
    /// Leave filter mode and drop the filter text
    ClearFilter,
    Cancel,
    Back,
    Quit,
}

/// Actions understood by the parameter form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormAction {
    NextField,
    PrevField,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    Home,
    End,
    Char(char),
    Backspace,
    Delete,
    Newline,
    ToggleRecording,
    Submit,
    Cancel,
    Quit,
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Map a key in a list picker; `filtering` is true while the filter is being typed
pub fn picker_action(key: KeyEvent, filtering: bool) -> Option<PickerAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if is_ctrl(&key, 'c') {
        return Some(PickerAction::Quit);
    }
    if is_ctrl(&key, 'b') {
        return Some(PickerAction::Back);
    }

    match key.code {
        KeyCode::Up => return Some(PickerAction::Up),
        KeyCode::Down => return Some(PickerAction::Down),
        KeyCode::Enter => return Some(PickerAction::Select),
        _ => {}
    }

    if filtering {
        return match key.code {
            KeyCode::Esc => Some(PickerAction::ClearFilter),
            KeyCode::Backspace => Some(PickerAction::FilterBackspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Some(PickerAction::FilterChar(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('k') => Some(PickerAction::Up),
        KeyCode::Char('j') => Some(PickerAction::Down),
        KeyCode::Char('/') => Some(PickerAction::StartFilter),
        KeyCode::Esc | KeyCode::Char('q') => Some(PickerAction::Cancel),
        _ => None,
    }
}

/// Map a key in the parameter form; `in_body` is true when the body has focus
pub fn form_action(key: KeyEvent, in_body: bool) -> Option<FormAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(FormAction::Quit),
            KeyCode::Char('s') => Some(FormAction::Submit),
            KeyCode::Char('r') => Some(FormAction::ToggleRecording),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(FormAction::Cancel),
        KeyCode::Tab => Some(FormAction::NextField),
        KeyCode::BackTab => Some(FormAction::PrevField),
        KeyCode::Up if in_body => Some(FormAction::CursorUp),
        KeyCode::Down if in_body => Some(FormAction::CursorDown),
        KeyCode::Up => Some(FormAction::PrevField),
        KeyCode::Down => Some(FormAction::NextField),
        KeyCode::Enter if in_body => Some(FormAction::Newline),
        KeyCode::Enter => Some(FormAction::Submit),
        KeyCode::Left => Some(FormAction::CursorLeft),
        KeyCode::Right => Some(FormAction::CursorRight),
        KeyCode::Home => Some(FormAction::Home),
        KeyCode::End => Some(FormAction::End),
        KeyCode::Backspace => Some(FormAction::Backspace),
        KeyCode::Delete => Some(FormAction::Delete),
        KeyCode::Char(c) => Some(FormAction::Char(c)),
        _ => None,
    }
}
