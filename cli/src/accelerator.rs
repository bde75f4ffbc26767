use droptty_core::config::InputCombo;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use winit::keyboard::KeyCode;

/// Converts a configured combo into a hotkey the OS can register. None if the key has no
/// global equivalent.
pub fn combo_to_hotkey(combo: &InputCombo) -> Option<HotKey> {
    let code = winit_to_hotkey_code(&combo.key()?)?;

    let pressed = combo.modifiers();
    let mut modifiers = Modifiers::empty();
    if pressed.ctrl {
        modifiers |= Modifiers::CONTROL;
    }
    if pressed.shift {
        modifiers |= Modifiers::SHIFT;
    }
    if pressed.alt {
        modifiers |= Modifiers::ALT;
    }
    if pressed.meta {
        modifiers |= Modifiers::SUPER;
    }

    Some(HotKey::new(
        (!modifiers.is_empty()).then_some(modifiers),
        code,
    ))
}

fn winit_to_hotkey_code(key: &KeyCode) -> Option<Code> {
    match key {
        KeyCode::KeyA => Some(Code::KeyA),
        KeyCode::KeyB => Some(Code::KeyB),
        KeyCode::KeyC => Some(Code::KeyC),
        KeyCode::KeyD => Some(Code::KeyD),
        KeyCode::KeyE => Some(Code::KeyE),
        KeyCode::KeyF => Some(Code::KeyF),
        KeyCode::KeyG => Some(Code::KeyG),
        KeyCode::KeyH => Some(Code::KeyH),
        KeyCode::KeyI => Some(Code::KeyI),
        KeyCode::KeyJ => Some(Code::KeyJ),
        KeyCode::KeyK => Some(Code::KeyK),
        KeyCode::KeyL => Some(Code::KeyL),
        KeyCode::KeyM => Some(Code::KeyM),
        KeyCode::KeyN => Some(Code::KeyN),
        KeyCode::KeyO => Some(Code::KeyO),
        KeyCode::KeyP => Some(Code::KeyP),
        KeyCode::KeyQ => Some(Code::KeyQ),
        KeyCode::KeyR => Some(Code::KeyR),
        KeyCode::KeyS => Some(Code::KeyS),
        KeyCode::KeyT => Some(Code::KeyT),
        KeyCode::KeyU => Some(Code::KeyU),
        KeyCode::KeyV => Some(Code::KeyV),
        KeyCode::KeyW => Some(Code::KeyW),
        KeyCode::KeyX => Some(Code::KeyX),
        KeyCode::KeyY => Some(Code::KeyY),
        KeyCode::KeyZ => Some(Code::KeyZ),
        KeyCode::Digit0 => Some(Code::Digit0),
        KeyCode::Digit1 => Some(Code::Digit1),
        KeyCode::Digit2 => Some(Code::Digit2),
        KeyCode::Digit3 => Some(Code::Digit3),
        KeyCode::Digit4 => Some(Code::Digit4),
        KeyCode::Digit5 => Some(Code::Digit5),
        KeyCode::Digit6 => Some(Code::Digit6),
        KeyCode::Digit7 => Some(Code::Digit7),
        KeyCode::Digit8 => Some(Code::Digit8),
        KeyCode::Digit9 => Some(Code::Digit9),
        KeyCode::Space => Some(Code::Space),
        KeyCode::Enter => Some(Code::Enter),
        KeyCode::Tab => Some(Code::Tab),
        KeyCode::Escape => Some(Code::Escape),
        KeyCode::Backspace => Some(Code::Backspace),
        KeyCode::Delete => Some(Code::Delete),
        KeyCode::Backquote => Some(Code::Backquote),
        KeyCode::ArrowUp => Some(Code::ArrowUp),
        KeyCode::ArrowDown => Some(Code::ArrowDown),
        KeyCode::ArrowLeft => Some(Code::ArrowLeft),
        KeyCode::ArrowRight => Some(Code::ArrowRight),
        KeyCode::F1 => Some(Code::F1),
        KeyCode::F2 => Some(Code::F2),
        KeyCode::F3 => Some(Code::F3),
        KeyCode::F4 => Some(Code::F4),
        KeyCode::F5 => Some(Code::F5),
        KeyCode::F6 => Some(Code::F6),
        KeyCode::F7 => Some(Code::F7),
        KeyCode::F8 => Some(Code::F8),
        KeyCode::F9 => Some(Code::F9),
        KeyCode::F10 => Some(Code::F10),
        KeyCode::F11 => Some(Code::F11),
        KeyCode::F12 => Some(Code::F12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_with_modifiers() {
        let hotkey = combo_to_hotkey(&InputCombo::parse("Option+Space")).unwrap();
        assert_eq!(hotkey, HotKey::new(Some(Modifiers::ALT), Code::Space));

        let hotkey = combo_to_hotkey(&InputCombo::parse("ctrl+shift+`")).unwrap();
        assert_eq!(
            hotkey,
            HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::Backquote)
        );
    }

    #[test]
    fn test_combo_without_modifiers() {
        let hotkey = combo_to_hotkey(&InputCombo::parse("F12")).unwrap();
        assert_eq!(hotkey, HotKey::new(None, Code::F12));
    }

    #[test]
    fn test_combo_without_key() {
        assert!(combo_to_hotkey(&InputCombo::parse("ctrl+shift")).is_none());
    }
}
