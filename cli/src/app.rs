use crate::host::{DesktopHost, HostAction};
use crate::message::HostMessage;
use crate::tray::{
    MENU_NEW_WINDOW, MENU_OPEN_CONFIG, MENU_OPEN_LOG, MENU_QUIT, MENU_RELOAD_CONFIG, MENU_TOGGLE,
};
use crate::window::{window_attributes, DesktopWindow};
use droptty_core::paths;
use droptty_core::platform::OverlayWindowImpl;
use droptty_core::{
    HotkeyAction, OverlayController, OverlayEvent, PlatformCapabilities, WindowOptions,
    WindowRequest,
};
use log::{error, info, trace, warn};
use std::path::Path;
use std::time::Instant;
use tray_icon::menu::MenuId;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::WindowId;

pub struct DropttyApp {
    controller: OverlayController<DesktopHost>,
    registered: bool,
}

impl DropttyApp {
    pub fn new(host: DesktopHost, capabilities: PlatformCapabilities) -> Self {
        Self {
            controller: OverlayController::new(host, capabilities),
            registered: false,
        }
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: OverlayEvent) {
        trace!("Dispatching {event:?}");
        self.controller.host_mut().refresh_displays(event_loop);
        if let Err(e) = self.controller.handle_event(event.clone()) {
            error!("Failed to handle {event:?}: {e}");
        }
        self.run_actions(event_loop);
    }

    fn run_actions(&mut self, event_loop: &ActiveEventLoop) {
        while let Some(action) = self.controller.host_mut().next_action() {
            match action {
                HostAction::CreateWindow(request) => self.create_window(event_loop, request),
                HostAction::HideApplication => hide_application(event_loop),
            }
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop, request: Option<WindowRequest>) {
        let options = self
            .controller
            .decorate_window_options(WindowOptions::default(), request);

        let window = match event_loop.create_window(window_attributes(&options)) {
            Ok(window) => DesktopWindow::new(window, options.show),
            Err(e) => {
                error!("Failed to create window: {e}");
                return;
            }
        };
        self.controller.host_mut().add_window(window.clone());

        if let Err(e) = self.controller.register_window(&window, request) {
            warn!("Failed to register window {}: {e}", window.id());
        }

        let result = match request {
            Some(request) => self.controller.window_created(request, window),
            None if window.is_closed() => Ok(()),
            None => window.attach_session().map_err(Into::into),
        };
        if let Err(e) = result {
            error!("Failed to set up window: {e}");
        }
        self.controller.host_mut().prune_windows();
    }

    fn handle_menu(&mut self, event_loop: &ActiveEventLoop, id: MenuId) {
        match id.0.as_str() {
            MENU_TOGGLE => self.dispatch(event_loop, OverlayEvent::Hotkey(HotkeyAction::Toggle)),
            MENU_NEW_WINDOW => {
                self.controller.host_mut().queue(HostAction::CreateWindow(None));
                self.run_actions(event_loop);
            }
            MENU_RELOAD_CONFIG => {
                self.controller.host_mut().config_mut().reload();
                self.dispatch(event_loop, OverlayEvent::ConfigChanged);
            }
            MENU_OPEN_CONFIG => {
                if let Some(path) = self.controller.host().config().path() {
                    open_path(path);
                }
            }
            MENU_OPEN_LOG => {
                if let Some(path) = paths::log_file_path() {
                    open_path(&path);
                }
            }
            MENU_QUIT => self.shutdown(event_loop),
            other => trace!("No handler for menu item: {other}"),
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        info!("Shutting down");
        if let Err(e) = self.controller.destroy() {
            warn!("Failed to tear down overlay: {e}");
        }
        event_loop.exit();
    }
}

impl ApplicationHandler<HostMessage> for DropttyApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.registered {
            return;
        }
        self.registered = true;

        self.controller.host_mut().refresh_displays(event_loop);
        if let Err(e) = self.controller.register_app() {
            error!("Failed to start overlay: {e}");
        }
        self.run_actions(event_loop);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, message: HostMessage) {
        match message {
            HostMessage::Hotkey(id) => {
                if let Some(action) = self.controller.host().hotkey_action(id) {
                    self.dispatch(event_loop, OverlayEvent::Hotkey(action));
                }
            }
            HostMessage::TrayClicked => self.dispatch(event_loop, OverlayEvent::TrayClicked),
            HostMessage::Menu(id) => self.handle_menu(event_loop, id),
            HostMessage::ConfigChanged => {
                if self.controller.host_mut().config_mut().reload() {
                    self.dispatch(event_loop, OverlayEvent::ConfigChanged);
                }
            }
            HostMessage::TimerFired(token) => {
                if self.controller.host_mut().timer_fired(token) {
                    self.dispatch(event_loop, OverlayEvent::TimerFired(token));
                }
            }
            HostMessage::Shutdown => self.shutdown(event_loop),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(window) = self.controller.host().window(id).cloned() else {
            return;
        };

        match event {
            WindowEvent::Focused(focused) => {
                window.set_focused(focused);
                if !focused {
                    self.dispatch(event_loop, OverlayEvent::WindowBlurred(window.id()));
                }
            }
            WindowEvent::Resized(_) => {
                self.dispatch(event_loop, OverlayEvent::WindowResized(window.id()))
            }
            WindowEvent::CloseRequested => {
                close_window(&window);
                self.controller.host_mut().prune_windows();
                self.dispatch(event_loop, OverlayEvent::WindowClosed(window.id()));
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(position) = window.to_screen(position) {
                    self.controller.host_mut().track_cursor(position);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let host = self.controller.host_mut();
        for window in host.prune_windows() {
            trace!("Window {} is gone", window.id());
        }

        match host.step_animations(Instant::now()) {
            Some(next_frame) => event_loop.set_control_flow(ControlFlow::WaitUntil(next_frame)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Err(e) = self.controller.destroy() {
            warn!("Failed to tear down overlay: {e}");
        }
    }
}

/// Closes a window on the user's behalf. Returns false when the host refused.
fn close_window(window: &impl OverlayWindowImpl) -> bool {
    match window.close() {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to close window {}: {e}", window.id());
            false
        }
    }
}

fn open_path(path: &Path) {
    if let Err(e) = open::that(path) {
        warn!("Failed to open {}: {e}", path.display());
    }
}

#[cfg(target_os = "macos")]
fn hide_application(event_loop: &ActiveEventLoop) {
    use winit::platform::macos::ActiveEventLoopExtMacOS;
    event_loop.hide_application();
}

#[cfg(not(target_os = "macos"))]
fn hide_application(_event_loop: &ActiveEventLoop) {}

#[cfg(test)]
mod tests {
    use super::*;
    use droptty_core::platform::{Bounds, PlatformResult, Size, WindowId};

    #[derive(Debug, Clone)]
    struct StuckWindow;

    impl OverlayWindowImpl for StuckWindow {
        fn id(&self) -> WindowId {
            7
        }
        fn is_visible(&self) -> bool {
            true
        }
        fn is_focused(&self) -> bool {
            false
        }
        fn size(&self) -> Size {
            Size::default()
        }
        fn has_sessions(&self) -> bool {
            true
        }
        fn show(&self) -> PlatformResult<()> {
            Ok(())
        }
        fn hide(&self) -> PlatformResult<()> {
            Ok(())
        }
        fn focus(&self) -> PlatformResult<()> {
            Ok(())
        }
        fn blur(&self) -> PlatformResult<()> {
            Ok(())
        }
        fn close(&self) -> PlatformResult<()> {
            Err("Window refused to close".into())
        }
        fn set_bounds(&self, _bounds: &Bounds, _animate: bool) -> PlatformResult<()> {
            Ok(())
        }
        fn set_has_shadow(&self, _has_shadow: bool) -> PlatformResult<()> {
            Ok(())
        }
        fn set_resizable(&self, _resizable: bool) -> PlatformResult<()> {
            Ok(())
        }
        fn set_always_on_top(&self, _always_on_top: bool) -> PlatformResult<()> {
            Ok(())
        }
        fn attach_session(&self) -> PlatformResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_close_window_reports_refusal() {
        assert!(!close_window(&StuckWindow));
    }
}
