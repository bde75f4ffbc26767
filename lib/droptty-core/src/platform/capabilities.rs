use crate::config::{Hotkeys, InputCombo};
use cfg_if::cfg_if;

/// What the running platform can do, resolved once at startup and handed to the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformCapabilities {
    /// The tray icon blinks while the overlay is open
    pub supports_tray_blink: bool,
    /// Hiding the overlay can hand focus back to the previously active application
    pub reactivates_previous_app: bool,
    pub default_hotkeys: Hotkeys,
}

impl PlatformCapabilities {
    pub fn current() -> Self {
        cfg_if! {
            if #[cfg(target_os = "macos")] {
                Self::mac()
            } else {
                Self::other()
            }
        }
    }

    pub fn mac() -> Self {
        Self {
            supports_tray_blink: true,
            reactivates_previous_app: true,
            default_hotkeys: Hotkeys {
                open: vec![InputCombo::parse("Option+Space")],
                close: vec![InputCombo::parse("Option+Escape")],
            },
        }
    }

    pub fn other() -> Self {
        Self {
            supports_tray_blink: false,
            reactivates_previous_app: false,
            default_hotkeys: Hotkeys {
                open: vec![InputCombo::parse("Control+Space")],
                close: vec![InputCombo::parse("Shift+Escape")],
            },
        }
    }
}
