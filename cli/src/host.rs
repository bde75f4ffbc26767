use crate::config_store::ConfigStore;
use crate::hotkeys::HotkeyRegistry;
use crate::message::HostMessage;
use crate::timers::TimerService;
use crate::tray::DesktopTray;
use crate::window::DesktopWindow;
use droptty_core::config::InputCombo;
use droptty_core::platform::{
    Bounds, Display, DisplayServiceImpl, HostAppImpl, HotkeyServiceImpl, OverlayWindowImpl,
    PlatformResult, Position, TimerServiceImpl, TrayServiceImpl,
};
use droptty_core::tray::TrayImage;
use droptty_core::{HotkeyAction, TimerToken, UserConfig, WindowRequest};
use log::{debug, trace};
use notify::RecommendedWatcher;
use std::collections::VecDeque;
use std::error::Error;
use std::time::{Duration, Instant};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::monitor::MonitorHandle;

/// Work the host can only do with the event loop at hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    /// Open a window. Overlay windows carry their request.
    CreateWindow(Option<WindowRequest>),
    HideApplication,
}

pub struct DesktopHost {
    config: ConfigStore,
    watcher: Option<RecommendedWatcher>,
    proxy: EventLoopProxy<HostMessage>,
    windows: Vec<DesktopWindow>,
    actions: VecDeque<HostAction>,
    displays: Vec<Display>,
    primary: Option<Display>,
    primary_scale: f64,
    cursor: Position,
    hotkeys: HotkeyRegistry,
    timers: TimerService,
}

impl DesktopHost {
    pub fn new(
        config: ConfigStore,
        proxy: EventLoopProxy<HostMessage>,
    ) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            config,
            watcher: None,
            hotkeys: HotkeyRegistry::new(proxy.clone())?,
            timers: TimerService::new(proxy.clone())?,
            proxy,
            windows: Vec::new(),
            actions: VecDeque::new(),
            displays: Vec::new(),
            primary: None,
            primary_scale: 1.0,
            cursor: Position::new(0, 0),
        })
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    pub fn queue(&mut self, action: HostAction) {
        trace!("Queued {action:?}");
        self.actions.push_back(action);
    }

    pub fn next_action(&mut self) -> Option<HostAction> {
        self.actions.pop_front()
    }

    pub fn add_window(&mut self, window: DesktopWindow) {
        self.windows.push(window);
    }

    pub fn window(&self, winit_id: winit::window::WindowId) -> Option<&DesktopWindow> {
        self.windows.iter().find(|w| w.winit_id() == winit_id)
    }

    /// Drops windows that have been closed, from either side.
    pub fn prune_windows(&mut self) -> Vec<DesktopWindow> {
        let (closed, open): (Vec<_>, Vec<_>) =
            self.windows.drain(..).partition(|w| w.is_closed());
        self.windows = open;
        closed
    }

    pub fn hotkey_action(&self, id: u32) -> Option<HotkeyAction> {
        self.hotkeys.action(id)
    }

    pub fn timer_fired(&mut self, token: TimerToken) -> bool {
        self.timers.fired(token)
    }

    pub fn track_cursor(&mut self, position: Position) {
        self.cursor = position;
    }

    /// Steps every running window animation and returns when the next frame is due.
    pub fn step_animations(&self, now: Instant) -> Option<Instant> {
        let mut animating = false;
        for window in &self.windows {
            animating |= window.step_animation(now);
        }
        animating.then(|| now + Duration::from_millis(16))
    }

    pub fn refresh_displays(&mut self, event_loop: &ActiveEventLoop) {
        self.displays = event_loop
            .available_monitors()
            .enumerate()
            .map(|(index, monitor)| monitor_to_display(index as u32, &monitor))
            .collect();

        let primary = event_loop.primary_monitor();
        self.primary_scale = primary.as_ref().map_or(1.0, |m| m.scale_factor());
        self.primary = primary.and_then(|monitor| {
            let position = monitor.position();
            self.displays
                .iter()
                .find(|d| d.bounds.position == Position::new(position.x, position.y))
                .cloned()
        });
    }

    #[cfg(target_os = "windows")]
    fn system_cursor_position(&self) -> Option<Position> {
        use windows::Win32::Foundation::POINT;
        use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point).ok()? };
        Some(Position::new(point.x, point.y))
    }

    #[cfg(target_os = "macos")]
    fn system_cursor_position(&self) -> Option<Position> {
        use objc2_app_kit::NSEvent;

        // Cocoa measures in points from the bottom of the primary screen.
        let location = unsafe { NSEvent::mouseLocation() };
        let primary = self.primary.as_ref().or(self.displays.first())?;
        let scale = self.primary_scale;
        let screen_height = primary.bounds.size.height as f64 / scale;
        Some(Position::new(
            (location.x * scale).round() as i32,
            ((screen_height - location.y) * scale).round() as i32,
        ))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    fn system_cursor_position(&self) -> Option<Position> {
        None
    }
}

fn monitor_to_display(id: u32, monitor: &MonitorHandle) -> Display {
    let position = monitor.position();
    let size = monitor.size();
    let bounds = Bounds::new(position.x, position.y, size.width, size.height);
    Display {
        id,
        name: monitor.name().unwrap_or_else(|| format!("Display {id}")),
        work_area: system_work_area(monitor, &bounds).unwrap_or_else(|| bounds.clone()),
        bounds,
    }
}

#[cfg(target_os = "windows")]
fn system_work_area(monitor: &MonitorHandle, _bounds: &Bounds) -> Option<Bounds> {
    use windows::Win32::Graphics::Gdi::{GetMonitorInfoW, HMONITOR, MONITORINFO};
    use winit::platform::windows::MonitorHandleExtWindows;

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    let handle = HMONITOR(monitor.hmonitor() as *mut _);
    if !unsafe { GetMonitorInfoW(handle, &mut info) }.as_bool() {
        return None;
    }

    let work = info.rcWork;
    Some(Bounds::new(
        work.left,
        work.top,
        (work.right - work.left) as u32,
        (work.bottom - work.top) as u32,
    ))
}

#[cfg(target_os = "macos")]
fn system_work_area(monitor: &MonitorHandle, bounds: &Bounds) -> Option<Bounds> {
    use objc2_app_kit::NSScreen;
    use winit::platform::macos::MonitorHandleExtMacOS;

    let screen = monitor.ns_screen()?;
    let screen = unsafe { &*(screen as *const NSScreen) };
    #[allow(unused_unsafe)]
    let (frame, visible) = unsafe { (screen.frame(), screen.visibleFrame()) };

    // Cocoa's y axis points up, so the menu bar is the gap above the visible frame.
    let insets = Insets {
        left: visible.origin.x - frame.origin.x,
        top: (frame.origin.y + frame.size.height) - (visible.origin.y + visible.size.height),
        right: (frame.origin.x + frame.size.width) - (visible.origin.x + visible.size.width),
        bottom: visible.origin.y - frame.origin.y,
    };
    Some(insets.apply(bounds, monitor.scale_factor()))
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn system_work_area(_monitor: &MonitorHandle, _bounds: &Bounds) -> Option<Bounds> {
    None
}

/// Space taken from each edge of a screen by the menu bar and dock, in points.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Insets {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
impl Insets {
    fn apply(&self, bounds: &Bounds, scale: f64) -> Bounds {
        let pixels = |points: f64| (points.max(0.0) * scale).round() as u32;
        let (left, top) = (pixels(self.left), pixels(self.top));
        let width = bounds
            .size
            .width
            .saturating_sub(left + pixels(self.right));
        let height = bounds
            .size
            .height
            .saturating_sub(top + pixels(self.bottom));
        Bounds::new(
            bounds.position.x + left as i32,
            bounds.position.y + top as i32,
            width,
            height,
        )
    }
}

impl HostAppImpl for DesktopHost {
    type Window = DesktopWindow;

    fn user_config(&self) -> PlatformResult<Option<UserConfig>> {
        Ok(self.config.current().cloned())
    }

    fn subscribe_config(&mut self) -> PlatformResult<()> {
        self.watcher = self
            .config
            .watch(self.proxy.clone())
            .map_err(|e| format!("Failed to watch config file: {e}"))?;
        if let Some(path) = self.config.path() {
            debug!("Watching {} for changes", path.display());
        }
        Ok(())
    }

    fn create_window(&mut self, request: WindowRequest) -> PlatformResult<()> {
        self.queue(HostAction::CreateWindow(Some(request)));
        Ok(())
    }

    fn windows(&self) -> Vec<Self::Window> {
        self.windows
            .iter()
            .filter(|w| !w.is_closed())
            .cloned()
            .collect()
    }

    fn focused_window(&self) -> Option<Self::Window> {
        self.windows.iter().find(|w| w.is_focused()).cloned()
    }

    #[cfg(target_os = "macos")]
    fn set_dock_visible(&mut self, visible: bool) -> PlatformResult<()> {
        use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy};
        use objc2_foundation::MainThreadMarker;

        let mtm = MainThreadMarker::new().ok_or("The dock can only change on the main thread")?;
        let policy = if visible {
            NSApplicationActivationPolicy::Regular
        } else {
            NSApplicationActivationPolicy::Accessory
        };
        let app = NSApplication::sharedApplication(mtm);
        #[allow(unused_unsafe)]
        unsafe {
            app.setActivationPolicy(policy)
        };
        Ok(())
    }

    #[cfg(not(target_os = "macos"))]
    fn set_dock_visible(&mut self, visible: bool) -> PlatformResult<()> {
        trace!("No dock to change (visible: {visible})");
        Ok(())
    }

    fn activate_previous_app(&mut self) -> PlatformResult<()> {
        self.queue(HostAction::HideApplication);
        Ok(())
    }
}

impl DisplayServiceImpl for DesktopHost {
    fn cursor_position(&self) -> PlatformResult<Position> {
        Ok(self
            .system_cursor_position()
            .unwrap_or_else(|| self.cursor.clone()))
    }

    fn display_nearest_point(&self, position: &Position) -> PlatformResult<Display> {
        self.displays
            .iter()
            .min_by_key(|d| d.bounds.distance_squared(position))
            .cloned()
            .ok_or_else(|| "No displays found".into())
    }

    fn primary_display(&self) -> PlatformResult<Display> {
        self.primary
            .clone()
            .or_else(|| self.displays.first().cloned())
            .ok_or_else(|| "No displays found".into())
    }
}

impl HotkeyServiceImpl for DesktopHost {
    fn register_hotkey(&mut self, combo: &InputCombo, action: HotkeyAction) -> PlatformResult<()> {
        self.hotkeys.register(combo, action)
    }

    fn unregister_all_hotkeys(&mut self) -> PlatformResult<()> {
        self.hotkeys.unregister_all()
    }
}

impl TrayServiceImpl for DesktopHost {
    type Tray = DesktopTray;

    fn create_tray(&mut self, image: TrayImage) -> PlatformResult<Self::Tray> {
        DesktopTray::new(image)
    }
}

impl TimerServiceImpl for DesktopHost {
    fn start_timer(
        &mut self,
        token: TimerToken,
        delay: Duration,
        repeat: bool,
    ) -> PlatformResult<()> {
        self.timers.start(token, delay, repeat);
        Ok(())
    }

    fn cancel_timer(&mut self, token: TimerToken) {
        self.timers.cancel(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insets_remove_menu_bar_and_dock() {
        let screen = Bounds::new(0, 0, 2880, 1800);
        let insets = Insets {
            top: 25.0,
            bottom: 70.0,
            ..Default::default()
        };
        assert_eq!(insets.apply(&screen, 2.0), Bounds::new(0, 50, 2880, 1610));
    }

    #[test]
    fn test_insets_follow_secondary_screen_origin() {
        let screen = Bounds::new(-1920, 200, 1920, 1080);
        let insets = Insets {
            left: 60.0,
            ..Default::default()
        };
        assert_eq!(insets.apply(&screen, 1.0), Bounds::new(-1860, 200, 1860, 1080));
    }

    #[test]
    fn test_empty_insets_keep_bounds() {
        let screen = Bounds::new(1920, 0, 2560, 1440);
        assert_eq!(Insets::default().apply(&screen, 1.5), screen);
    }
}
