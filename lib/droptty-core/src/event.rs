use crate::platform::WindowId;

/// What a registered global hotkey does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    Toggle,
    Hide,
}

/// Identifies one scheduled timer. Tokens are never reused by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Signals the host feeds into `OverlayController::handle_event`.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    Hotkey(HotkeyAction),
    TrayClicked,
    ConfigChanged,
    WindowBlurred(WindowId),
    WindowResized(WindowId),
    WindowClosed(WindowId),
    TimerFired(TimerToken),
}
