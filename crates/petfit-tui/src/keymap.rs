use crossterm::event::{KeyCode, KeyEvent};

pub(crate) fn is_back(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter)
}

pub(crate) fn is_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}

pub(crate) fn is_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

pub(crate) fn is_left(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Left | KeyCode::Char('h'))
}

pub(crate) fn is_right(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Right | KeyCode::Char('l'))
}

pub(crate) fn is_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(' '))
}

pub(crate) fn is_size_click(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('s'))
}

pub(crate) fn is_open(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('f'))
}

pub(crate) fn is_next_field(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Tab)
}

pub(crate) fn is_previous_field(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::BackTab)
}

pub(crate) fn is_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{
        is_back, is_confirm, is_down, is_left, is_next_field, is_open, is_previous_field, is_quit,
        is_right, is_size_click, is_toggle, is_up,
    };

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn vertical_keys_match_arrows_and_vim() {
        assert!(is_up(key(KeyCode::Up)));
        assert!(is_up(key(KeyCode::Char('k'))));
        assert!(is_down(key(KeyCode::Down)));
        assert!(is_down(key(KeyCode::Char('j'))));
        assert!(!is_up(key(KeyCode::Char('j'))));
    }

    #[test]
    fn horizontal_keys_match_arrows_and_vim() {
        assert!(is_left(key(KeyCode::Left)));
        assert!(is_left(key(KeyCode::Char('h'))));
        assert!(is_right(key(KeyCode::Right)));
        assert!(is_right(key(KeyCode::Char('l'))));
        assert!(!is_left(key(KeyCode::Char('l'))));
    }

    #[test]
    fn action_keys_match_contract() {
        assert!(is_confirm(key(KeyCode::Enter)));
        assert!(is_back(key(KeyCode::Esc)));
        assert!(is_toggle(key(KeyCode::Char(' '))));
        assert!(is_size_click(key(KeyCode::Char('s'))));
        assert!(is_open(key(KeyCode::Char('f'))));
        assert!(is_next_field(key(KeyCode::Tab)));
        assert!(is_previous_field(key(KeyCode::BackTab)));
        assert!(is_quit(key(KeyCode::Char('q'))));
        assert!(!is_back(key(KeyCode::Enter)));
    }
}
