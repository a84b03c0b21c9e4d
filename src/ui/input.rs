//! Keyboard input handling.

use crate::app::App;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// What a key press asks for, independent of app state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Command {
    Quit,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    Top,
    Bottom,
    NextSource,
    PrevSource,
    /// Zero-based index into the source list.
    PickSource(usize),
}

pub(super) fn command_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let command = match code {
        KeyCode::Char('c') if ctrl => Command::Quit,
        KeyCode::Char('d') if ctrl => Command::PageDown,
        KeyCode::Char('u') if ctrl => Command::PageUp,
        _ if ctrl => return None,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('j') | KeyCode::Down => Command::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Command::ScrollUp,
        KeyCode::PageDown => Command::PageDown,
        KeyCode::PageUp => Command::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Command::Top,
        KeyCode::Char('G') | KeyCode::End => Command::Bottom,
        KeyCode::Tab | KeyCode::Char(']') => Command::NextSource,
        KeyCode::BackTab | KeyCode::Char('[') => Command::PrevSource,
        KeyCode::Char(c @ '1'..='9') => Command::PickSource(c as usize - '1' as usize),
        _ => return None,
    };
    Some(command)
}

/// Apply a key press to the app.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(command) = command_for_key(code, modifiers) else {
        return Action::Continue;
    };

    match command {
        Command::Quit => return Action::Quit,
        Command::ScrollDown => app.scroll_down(1),
        Command::ScrollUp => app.scroll_up(1),
        Command::PageDown => app.scroll_down(app.page_size()),
        Command::PageUp => app.scroll_up(app.page_size()),
        Command::Top => app.scroll_to_top(),
        Command::Bottom => app.scroll_to_bottom(),
        Command::NextSource => {
            app.next_source();
        }
        Command::PrevSource => {
            app.prev_source();
        }
        Command::PickSource(index) => {
            if index >= app.sources.len() {
                app.set_status(format!("No source {}", index + 1));
            } else {
                app.select_source(index);
            }
        }
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        for (code, mods) in [
            (KeyCode::Char('q'), KeyModifiers::NONE),
            (KeyCode::Esc, KeyModifiers::NONE),
            (KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(command_for_key(code, mods), Some(Command::Quit));
        }
    }

    #[test]
    fn test_ctrl_paging_does_not_shadow_plain_keys() {
        assert_eq!(
            command_for_key(KeyCode::Char('d'), KeyModifiers::CONTROL),
            Some(Command::PageDown)
        );
        assert_eq!(command_for_key(KeyCode::Char('d'), KeyModifiers::NONE), None);
        assert_eq!(command_for_key(KeyCode::Char('j'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn test_shifted_keys() {
        assert_eq!(
            command_for_key(KeyCode::Char('G'), KeyModifiers::SHIFT),
            Some(Command::Bottom)
        );
        assert_eq!(
            command_for_key(KeyCode::BackTab, KeyModifiers::SHIFT),
            Some(Command::PrevSource)
        );
    }

    #[test]
    fn test_digit_keys_pick_sources() {
        assert_eq!(
            command_for_key(KeyCode::Char('1'), KeyModifiers::NONE),
            Some(Command::PickSource(0))
        );
        assert_eq!(
            command_for_key(KeyCode::Char('9'), KeyModifiers::NONE),
            Some(Command::PickSource(8))
        );
        assert_eq!(command_for_key(KeyCode::Char('0'), KeyModifiers::NONE), None);
    }
}
