use crate::config::{InputCombo, UserConfig};
use crate::event::{HotkeyAction, TimerToken};
use crate::platform::{
    Bounds, Display, DisplayServiceImpl, HostAppImpl, HotkeyServiceImpl, OverlayWindowImpl,
    PlatformResult, Position, Size, TimerServiceImpl, TrayIconImpl, TrayServiceImpl, WindowId,
};
use crate::tray::TrayImage;
use crate::window::WindowRequest;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MockWindowState {
    pub visible: bool,
    pub focused: bool,
    pub closed: bool,
    pub sessions: usize,
    pub size: Size,
    pub bounds: Vec<(Bounds, bool)>,
    pub has_shadow: Option<bool>,
    pub resizable: Option<bool>,
    pub always_on_top: Option<bool>,
    pub blurred: usize,
    pub focus_calls: usize,
}

#[derive(Debug, Clone)]
pub struct MockWindow {
    pub id: WindowId,
    pub state: Rc<RefCell<MockWindowState>>,
}

impl MockWindow {
    pub fn new(id: WindowId) -> Self {
        Self {
            id,
            state: Rc::new(RefCell::new(MockWindowState::default())),
        }
    }

    pub fn last_bounds(&self) -> Option<Bounds> {
        self.state.borrow().bounds.last().map(|(b, _)| b.clone())
    }

    pub fn bounds_history(&self) -> Vec<(Bounds, bool)> {
        self.state.borrow().bounds.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }
}

impl OverlayWindowImpl for MockWindow {
    fn id(&self) -> WindowId {
        self.id
    }
    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }
    fn is_focused(&self) -> bool {
        self.state.borrow().focused
    }
    fn size(&self) -> Size {
        self.state.borrow().size.clone()
    }
    fn has_sessions(&self) -> bool {
        let state = self.state.borrow();
        !state.closed && state.sessions > 0
    }
    fn show(&self) -> PlatformResult<()> {
        self.state.borrow_mut().visible = true;
        Ok(())
    }
    fn hide(&self) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        state.visible = false;
        state.focused = false;
        Ok(())
    }
    fn focus(&self) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        state.focused = true;
        state.focus_calls += 1;
        Ok(())
    }
    fn blur(&self) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        state.focused = false;
        state.blurred += 1;
        Ok(())
    }
    fn close(&self) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        state.closed = true;
        state.visible = false;
        Ok(())
    }
    fn set_bounds(&self, bounds: &Bounds, animate: bool) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        state.size = bounds.size.clone();
        state.bounds.push((bounds.clone(), animate));
        Ok(())
    }
    fn set_has_shadow(&self, has_shadow: bool) -> PlatformResult<()> {
        self.state.borrow_mut().has_shadow = Some(has_shadow);
        Ok(())
    }
    fn set_resizable(&self, resizable: bool) -> PlatformResult<()> {
        self.state.borrow_mut().resizable = Some(resizable);
        Ok(())
    }
    fn set_always_on_top(&self, always_on_top: bool) -> PlatformResult<()> {
        self.state.borrow_mut().always_on_top = Some(always_on_top);
        Ok(())
    }
    fn attach_session(&self) -> PlatformResult<()> {
        self.state.borrow_mut().sessions += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockTrayState {
    pub image: Option<TrayImage>,
    pub pressed_image: Option<TrayImage>,
    pub tooltip: String,
    pub destroyed: bool,
    pub image_changes: usize,
}

#[derive(Debug, Clone)]
pub struct MockTray {
    pub state: Rc<RefCell<MockTrayState>>,
}

impl TrayIconImpl for MockTray {
    fn set_tooltip(&mut self, tooltip: &str) -> PlatformResult<()> {
        self.state.borrow_mut().tooltip = tooltip.to_string();
        Ok(())
    }
    fn set_image(&mut self, image: TrayImage) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        state.image = Some(image);
        state.image_changes += 1;
        Ok(())
    }
    fn set_pressed_image(&mut self, image: TrayImage) -> PlatformResult<()> {
        self.state.borrow_mut().pressed_image = Some(image);
        Ok(())
    }
    fn destroy(self) -> PlatformResult<()> {
        self.state.borrow_mut().destroyed = true;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockTimer {
    pub delay: Duration,
    pub repeat: bool,
}

/// A host that records every collaborator call for inspection in tests.
#[derive(Debug)]
pub struct MockHost {
    pub user_config: Option<UserConfig>,
    pub subscriptions: usize,
    pub window_requests: Vec<WindowRequest>,
    pub windows: Vec<MockWindow>,
    pub focused: Option<MockWindow>,
    pub dock_visible: bool,
    pub previous_app_activations: usize,
    pub cursor: Position,
    pub displays: Vec<Display>,
    pub hotkeys: Vec<(InputCombo, HotkeyAction)>,
    pub trays: Vec<MockTray>,
    pub timers: HashMap<TimerToken, MockTimer>,
    pub fail_tray: bool,
    next_window_id: WindowId,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            user_config: None,
            subscriptions: 0,
            window_requests: Vec::new(),
            windows: Vec::new(),
            focused: None,
            dock_visible: true,
            previous_app_activations: 0,
            cursor: Position::new(100, 100),
            displays: vec![
                Self::display(1, Bounds::new(0, 0, 1920, 1080)),
                Self::display(2, Bounds::new(1920, 0, 2560, 1440)),
            ],
            hotkeys: Vec::new(),
            trays: Vec::new(),
            timers: HashMap::new(),
            fail_tray: false,
            next_window_id: 1,
        }
    }

    pub fn display(id: u32, work_area: Bounds) -> Display {
        Display {
            id,
            name: format!("Display {id}"),
            bounds: work_area.clone(),
            work_area,
        }
    }

    /// Opens a window the way the host would, without any overlay involvement.
    pub fn open_window(&mut self) -> MockWindow {
        let window = MockWindow::new(self.next_window_id);
        self.next_window_id += 1;
        window.attach_session().ok();
        window.show().ok();
        self.windows.push(window.clone());
        window
    }

    /// A window for a pending request, listed in `windows` the way the host would list it.
    pub fn build_window(&mut self) -> MockWindow {
        let window = MockWindow::new(self.next_window_id);
        self.next_window_id += 1;
        self.windows.push(window.clone());
        window
    }

    pub fn live_windows(&self) -> Vec<MockWindow> {
        self.windows
            .iter()
            .filter(|w| !w.is_closed())
            .cloned()
            .collect()
    }

    pub fn live_trays(&self) -> Vec<MockTray> {
        self.trays
            .iter()
            .filter(|t| !t.state.borrow().destroyed)
            .cloned()
            .collect()
    }

    pub fn timer_tokens(&self, repeat: bool) -> Vec<TimerToken> {
        let mut tokens: Vec<_> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.repeat == repeat)
            .map(|(token, _)| *token)
            .collect();
        tokens.sort();
        tokens
    }
}

impl HostAppImpl for MockHost {
    type Window = MockWindow;

    fn user_config(&self) -> PlatformResult<Option<UserConfig>> {
        Ok(self.user_config.clone())
    }

    fn subscribe_config(&mut self) -> PlatformResult<()> {
        self.subscriptions += 1;
        Ok(())
    }

    fn create_window(&mut self, request: WindowRequest) -> PlatformResult<()> {
        self.window_requests.push(request);
        Ok(())
    }

    fn windows(&self) -> Vec<Self::Window> {
        self.live_windows()
    }

    fn focused_window(&self) -> Option<Self::Window> {
        self.focused.clone()
    }

    fn set_dock_visible(&mut self, visible: bool) -> PlatformResult<()> {
        self.dock_visible = visible;
        Ok(())
    }

    fn activate_previous_app(&mut self) -> PlatformResult<()> {
        self.previous_app_activations += 1;
        Ok(())
    }
}

impl DisplayServiceImpl for MockHost {
    fn cursor_position(&self) -> PlatformResult<Position> {
        Ok(self.cursor.clone())
    }

    fn display_nearest_point(&self, position: &Position) -> PlatformResult<Display> {
        self.displays
            .iter()
            .min_by_key(|d| d.bounds.distance_squared(position))
            .cloned()
            .ok_or_else(|| "No displays".into())
    }

    fn primary_display(&self) -> PlatformResult<Display> {
        self.displays
            .first()
            .cloned()
            .ok_or_else(|| "No displays".into())
    }
}

impl HotkeyServiceImpl for MockHost {
    fn register_hotkey(&mut self, combo: &InputCombo, action: HotkeyAction) -> PlatformResult<()> {
        if self.hotkeys.iter().any(|(c, _)| c == combo) {
            return Err(format!("{combo} is already registered").into());
        }
        self.hotkeys.push((combo.clone(), action));
        Ok(())
    }

    fn unregister_all_hotkeys(&mut self) -> PlatformResult<()> {
        self.hotkeys.clear();
        Ok(())
    }
}

impl TrayServiceImpl for MockHost {
    type Tray = MockTray;

    fn create_tray(&mut self, image: TrayImage) -> PlatformResult<Self::Tray> {
        if self.fail_tray {
            return Err("No system tray".into());
        }
        let tray = MockTray {
            state: Rc::new(RefCell::new(MockTrayState {
                image: Some(image),
                ..Default::default()
            })),
        };
        self.trays.push(tray.clone());
        Ok(tray)
    }
}

impl TimerServiceImpl for MockHost {
    fn start_timer(
        &mut self,
        token: TimerToken,
        delay: Duration,
        repeat: bool,
    ) -> PlatformResult<()> {
        self.timers.insert(token, MockTimer { delay, repeat });
        Ok(())
    }

    fn cancel_timer(&mut self, token: TimerToken) {
        self.timers.remove(&token);
    }
}
