use crate::config::{InputCombo, UserConfig};
use crate::event::{HotkeyAction, TimerToken};
use crate::platform::{Bounds, Display, PlatformResult, Position, Size, WindowId};
use crate::tray::TrayImage;
use crate::window::WindowRequest;
use std::fmt::Debug;
use std::time::Duration;

/// A handle to a host window. Should be lightweight, and freely copyable.
pub trait OverlayWindowImpl
where
    Self: Sized + Clone + Debug,
{
    fn id(&self) -> WindowId;
    fn is_visible(&self) -> bool;
    fn is_focused(&self) -> bool;
    fn size(&self) -> Size;
    /// Whether the window still holds live terminal content. Closed windows have none.
    fn has_sessions(&self) -> bool;

    fn show(&self) -> PlatformResult<()>;
    fn hide(&self) -> PlatformResult<()>;
    fn focus(&self) -> PlatformResult<()>;
    fn blur(&self) -> PlatformResult<()>;
    fn close(&self) -> PlatformResult<()>;

    /// Moves and resizes the window. With `animate` the host interpolates towards the target.
    fn set_bounds(&self, bounds: &Bounds, animate: bool) -> PlatformResult<()>;
    fn set_has_shadow(&self, has_shadow: bool) -> PlatformResult<()>;
    fn set_resizable(&self, resizable: bool) -> PlatformResult<()>;
    fn set_always_on_top(&self, always_on_top: bool) -> PlatformResult<()>;

    /// Asks the host to open a terminal session inside the window.
    fn attach_session(&self) -> PlatformResult<()>;
}

pub trait HostAppImpl {
    type Window: OverlayWindowImpl;

    /// The user's `overlay` configuration section, if there is one.
    fn user_config(&self) -> PlatformResult<Option<UserConfig>>;

    /// Starts delivering `OverlayEvent::ConfigChanged` whenever the configuration changes.
    fn subscribe_config(&mut self) -> PlatformResult<()>;

    /// Requests a new window. The host builds its options through
    /// `OverlayController::decorate_window_options`, announces it through
    /// `OverlayController::register_window` and finally hands it back through
    /// `OverlayController::window_created`, passing `request` along each time.
    fn create_window(&mut self, request: WindowRequest) -> PlatformResult<()>;

    /// Every window the host currently has open.
    fn windows(&self) -> Vec<Self::Window>;

    fn focused_window(&self) -> Option<Self::Window>;

    fn set_dock_visible(&mut self, visible: bool) -> PlatformResult<()>;

    /// Hands focus back to whichever application was active before ours.
    fn activate_previous_app(&mut self) -> PlatformResult<()>;
}

pub trait DisplayServiceImpl {
    fn cursor_position(&self) -> PlatformResult<Position>;
    fn display_nearest_point(&self, position: &Position) -> PlatformResult<Display>;
    fn primary_display(&self) -> PlatformResult<Display>;
}

/// Process-wide global hotkey table. A pressed hotkey comes back as `OverlayEvent::Hotkey`.
pub trait HotkeyServiceImpl {
    fn register_hotkey(&mut self, combo: &InputCombo, action: HotkeyAction) -> PlatformResult<()>;
    fn unregister_all_hotkeys(&mut self) -> PlatformResult<()>;
}

/// A tray icon. Clicks come back as `OverlayEvent::TrayClicked`.
pub trait TrayIconImpl {
    fn set_tooltip(&mut self, tooltip: &str) -> PlatformResult<()>;
    fn set_image(&mut self, image: TrayImage) -> PlatformResult<()>;
    fn set_pressed_image(&mut self, image: TrayImage) -> PlatformResult<()>;
    fn destroy(self) -> PlatformResult<()>;
}

pub trait TrayServiceImpl {
    type Tray: TrayIconImpl;

    fn create_tray(&mut self, image: TrayImage) -> PlatformResult<Self::Tray>;
}

/// Timers fire on the controller's thread as `OverlayEvent::TimerFired(token)`.
pub trait TimerServiceImpl {
    fn start_timer(&mut self, token: TimerToken, delay: Duration, repeat: bool)
        -> PlatformResult<()>;
    fn cancel_timer(&mut self, token: TimerToken);
}

/// Everything the overlay controller needs from its host.
pub trait Host:
    HostAppImpl + DisplayServiceImpl + HotkeyServiceImpl + TrayServiceImpl + TimerServiceImpl
{
}

impl<T> Host for T where
    T: HostAppImpl + DisplayServiceImpl + HotkeyServiceImpl + TrayServiceImpl + TimerServiceImpl
{
}
