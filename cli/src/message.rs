use droptty_core::TimerToken;
use tray_icon::menu::MenuId;

/// Everything other threads hand to the event loop.
#[derive(Debug, Clone)]
pub enum HostMessage {
    /// A global hotkey was pressed. Carries the hotkey id.
    Hotkey(u32),
    TrayClicked,
    Menu(MenuId),
    ConfigChanged,
    TimerFired(TimerToken),
    Shutdown,
}
