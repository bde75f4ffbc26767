use serde::de::Visitor;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::Display;
use winit::keyboard::KeyCode;

/// A global hotkey such as `Option+Space` or `ctrl+shift+f12`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InputCombo {
    modifiers: Modifiers,
    key: Option<KeyCode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.meta
    }
}

impl InputCombo {
    pub fn parse(s: &str) -> Self {
        let mut combo = InputCombo::default();
        for part in s.split('+') {
            let part_lower = part.trim().to_ascii_lowercase();
            match part_lower.as_str() {
                "ctrl" | "control" => combo.modifiers.ctrl = true,
                "shift" => combo.modifiers.shift = true,
                "alt" | "option" => combo.modifiers.alt = true,
                "super" | "win" | "cmd" | "command" | "meta" => combo.modifiers.meta = true,
                "cmdorctrl" | "commandorcontrol" => {
                    if cfg!(target_os = "macos") {
                        combo.modifiers.meta = true;
                    } else {
                        combo.modifiers.ctrl = true;
                    }
                }
                "" => {}
                _ => {
                    if let Some(keycode) = Self::parse_key(&part_lower) {
                        combo.key = Some(keycode);
                    }
                }
            }
        }
        combo
    }

    fn parse_key(s: &str) -> Option<KeyCode> {
        use winit::keyboard::KeyCode::*;
        match s {
            "a" => Some(KeyA),
            "b" => Some(KeyB),
            "c" => Some(KeyC),
            "d" => Some(KeyD),
            "e" => Some(KeyE),
            "f" => Some(KeyF),
            "g" => Some(KeyG),
            "h" => Some(KeyH),
            "i" => Some(KeyI),
            "j" => Some(KeyJ),
            "k" => Some(KeyK),
            "l" => Some(KeyL),
            "m" => Some(KeyM),
            "n" => Some(KeyN),
            "o" => Some(KeyO),
            "p" => Some(KeyP),
            "q" => Some(KeyQ),
            "r" => Some(KeyR),
            "s" => Some(KeyS),
            "t" => Some(KeyT),
            "u" => Some(KeyU),
            "v" => Some(KeyV),
            "w" => Some(KeyW),
            "x" => Some(KeyX),
            "y" => Some(KeyY),
            "z" => Some(KeyZ),
            "0" => Some(Digit0),
            "1" => Some(Digit1),
            "2" => Some(Digit2),
            "3" => Some(Digit3),
            "4" => Some(Digit4),
            "5" => Some(Digit5),
            "6" => Some(Digit6),
            "7" => Some(Digit7),
            "8" => Some(Digit8),
            "9" => Some(Digit9),
            "space" => Some(Space),
            "enter" | "return" => Some(Enter),
            "tab" => Some(Tab),
            "escape" | "esc" => Some(Escape),
            "backspace" => Some(Backspace),
            "delete" => Some(Delete),
            "`" | "backquote" | "grave" => Some(Backquote),
            "up" | "arrowup" => Some(ArrowUp),
            "down" | "arrowdown" => Some(ArrowDown),
            "left" | "arrowleft" => Some(ArrowLeft),
            "right" | "arrowright" => Some(ArrowRight),
            "f1" => Some(F1),
            "f2" => Some(F2),
            "f3" => Some(F3),
            "f4" => Some(F4),
            "f5" => Some(F5),
            "f6" => Some(F6),
            "f7" => Some(F7),
            "f8" => Some(F8),
            "f9" => Some(F9),
            "f10" => Some(F10),
            "f11" => Some(F11),
            "f12" => Some(F12),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn key(&self) -> Option<KeyCode> {
        self.key
    }

    /// A combo without a key cannot be registered with the OS.
    pub fn is_valid(&self) -> bool {
        self.key.is_some()
    }
}

impl Serialize for InputCombo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for InputCombo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ComboVisitor;
        impl<'de> Visitor<'de> for ComboVisitor {
            type Value = InputCombo;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a hotkey string like 'Option+Space'")
            }
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let combo = InputCombo::parse(v);
                if !combo.is_valid() {
                    return Err(E::custom(format!("hotkey '{v}' must contain a key")));
                }
                Ok(combo)
            }
        }
        deserializer.deserialize_str(ComboVisitor)
    }
}

impl Display for InputCombo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        // Modifiers first (in standard order)
        if self.modifiers.ctrl {
            parts.push("ctrl");
        }
        if self.modifiers.shift {
            parts.push("shift");
        }
        if self.modifiers.alt {
            parts.push("alt");
        }
        if self.modifiers.meta {
            parts.push("cmd");
        }

        if let Some(key_str) = self.key.as_ref().and_then(key_to_string) {
            parts.push(key_str);
        }

        write!(f, "{}", parts.join("+"))
    }
}

fn key_to_string(key: &KeyCode) -> Option<&'static str> {
    use winit::keyboard::KeyCode::*;
    match key {
        KeyA => Some("a"),
        KeyB => Some("b"),
        KeyC => Some("c"),
        KeyD => Some("d"),
        KeyE => Some("e"),
        KeyF => Some("f"),
        KeyG => Some("g"),
        KeyH => Some("h"),
        KeyI => Some("i"),
        KeyJ => Some("j"),
        KeyK => Some("k"),
        KeyL => Some("l"),
        KeyM => Some("m"),
        KeyN => Some("n"),
        KeyO => Some("o"),
        KeyP => Some("p"),
        KeyQ => Some("q"),
        KeyR => Some("r"),
        KeyS => Some("s"),
        KeyT => Some("t"),
        KeyU => Some("u"),
        KeyV => Some("v"),
        KeyW => Some("w"),
        KeyX => Some("x"),
        KeyY => Some("y"),
        KeyZ => Some("z"),
        Digit0 => Some("0"),
        Digit1 => Some("1"),
        Digit2 => Some("2"),
        Digit3 => Some("3"),
        Digit4 => Some("4"),
        Digit5 => Some("5"),
        Digit6 => Some("6"),
        Digit7 => Some("7"),
        Digit8 => Some("8"),
        Digit9 => Some("9"),
        Space => Some("space"),
        Enter => Some("enter"),
        Tab => Some("tab"),
        Escape => Some("escape"),
        Backspace => Some("backspace"),
        Delete => Some("delete"),
        Backquote => Some("backquote"),
        ArrowUp => Some("up"),
        ArrowDown => Some("down"),
        ArrowLeft => Some("left"),
        ArrowRight => Some("right"),
        F1 => Some("f1"),
        F2 => Some("f2"),
        F3 => Some("f3"),
        F4 => Some("f4"),
        F5 => Some("f5"),
        F6 => Some("f6"),
        F7 => Some("f7"),
        F8 => Some("f8"),
        F9 => Some("f9"),
        F10 => Some("f10"),
        F11 => Some("f11"),
        F12 => Some("f12"),
        _ => None,
    }
}

impl From<&str> for InputCombo {
    fn from(value: &str) -> Self {
        InputCombo::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        let combo = InputCombo::parse("Option+Space");
        assert!(combo.modifiers().alt);
        assert_eq!(combo.key(), Some(KeyCode::Space));

        let combo = InputCombo::parse("Control+Shift+Escape");
        assert!(combo.modifiers().ctrl);
        assert!(combo.modifiers().shift);
        assert!(!combo.modifiers().alt);
        assert_eq!(combo.key(), Some(KeyCode::Escape));
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(InputCombo::parse("Space+Alt").to_string(), "alt+space");
        assert_eq!(InputCombo::parse("shift+CTRL+f12").to_string(), "ctrl+shift+f12");
        assert_eq!(InputCombo::parse("Command+`").to_string(), "cmd+backquote");
    }

    #[test]
    fn test_combo_without_key_is_invalid() {
        assert!(!InputCombo::parse("ctrl+shift").is_valid());
        assert!(!InputCombo::parse("ctrl+nonsense").is_valid());
        assert!(InputCombo::parse("f1").is_valid());
    }

    #[test]
    fn test_deserialize_rejects_modifier_only() {
        let result: Result<InputCombo, _> = serde_yaml::from_str("ctrl+alt");
        assert!(result.is_err());

        let combo: InputCombo = serde_yaml::from_str("Shift+Escape").unwrap();
        assert_eq!(combo, InputCombo::parse("shift+esc"));
    }
}
