use crate::animation::{Direction, Transition, ANIMATION_DURATION};
use crate::config::OverlayConfig;
use crate::event::{HotkeyAction, OverlayEvent, TimerToken};
use crate::geometry::{end_bounds, remember_size, start_bounds};
use crate::platform::{
    Bounds, Host, HostAppImpl, OverlayWindowImpl, PlatformCapabilities, PlatformError,
    TrayIconImpl, WindowId,
};
use crate::tray::{TrayBlink, TrayImage, BLINK_INTERVAL, TOOLTIP_CLOSE, TOOLTIP_OPEN};
use crate::window::{WindowOptions, WindowRequest};
use log::{debug, info, trace, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

pub type OverlayResult<T> = Result<T, OverlayError>;

/// Where the overlay is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Hidden,
    Showing,
    Visible,
    Hiding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterCreate {
    /// Show only if this is the first launch and `startup` is set, or a reload asked for it
    Startup { first_launch: bool },
    Show,
}

#[derive(Debug, Clone, Copy)]
struct PendingWindow {
    request: WindowRequest,
    then: AfterCreate,
}

type HostWindow<H> = <H as HostAppImpl>::Window;

/// Owns the single overlay window and everything attached to it: configuration, hotkeys,
/// tray icon and the show/hide transitions.
pub struct OverlayController<H: Host> {
    host: H,
    capabilities: PlatformCapabilities,
    config: Option<OverlayConfig>,
    window: Option<HostWindow<H>>,
    tray: Option<H::Tray>,
    tray_blink: Option<TrayBlink>,
    subscribed: bool,
    pending: Option<PendingWindow>,
    decorating: Option<WindowRequest>,
    transition: Transition,
    last_focus: Option<HostWindow<H>>,
    force_startup: bool,
    next_id: u64,
}

impl<H: Host> OverlayController<H> {
    pub fn new(host: H, capabilities: PlatformCapabilities) -> Self {
        Self {
            host,
            capabilities,
            config: None,
            window: None,
            tray: None,
            tray_blink: None,
            subscribed: false,
            pending: None,
            decorating: None,
            transition: Transition::Idle,
            last_focus: None,
            force_startup: false,
            next_id: 1,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn capabilities(&self) -> &PlatformCapabilities {
        &self.capabilities
    }

    /// The active configuration. None until the overlay window exists, and after `destroy`.
    pub fn config(&self) -> Option<&OverlayConfig> {
        self.config.as_ref()
    }

    pub fn window(&self) -> Option<&HostWindow<H>> {
        self.window.as_ref()
    }

    pub fn state(&self) -> OverlayState {
        let Some(window) = &self.window else {
            return OverlayState::Closed;
        };
        match self.transition.direction() {
            Some(Direction::Show) => OverlayState::Showing,
            Some(Direction::Hide) => OverlayState::Hiding,
            None if window.is_visible() => OverlayState::Visible,
            None => OverlayState::Hidden,
        }
    }

    /// The host application is ready. Subscribes to configuration changes the first time,
    /// then creates the overlay window.
    pub fn register_app(&mut self) -> OverlayResult<()> {
        let mut first_launch = false;
        if !self.subscribed {
            self.host.subscribe_config()?;
            self.subscribed = true;
            first_launch = true;
        }

        self.create(AfterCreate::Startup { first_launch })
    }

    /// Called by the host for every window it opens. `request` is the token the window was
    /// created for, if any. In unique mode every window that isn't the overlay is closed.
    pub fn register_window(
        &mut self,
        window: &HostWindow<H>,
        request: Option<WindowRequest>,
    ) -> OverlayResult<()> {
        let own = request.is_some() && self.pending.map(|p| p.request) == request;

        if !own && self.config.as_ref().is_some_and(|c| c.unique) {
            info!("Closing window {} (unique mode)", window.id());
            window.close()?;
            return Ok(());
        }

        if own && self.decorating == request {
            self.decorating = None;
        }

        Ok(())
    }

    /// Strips the window down to a bare, hidden surface if it is the one the overlay asked for.
    pub fn decorate_window_options(
        &self,
        options: WindowOptions,
        request: Option<WindowRequest>,
    ) -> WindowOptions {
        match (self.decorating, request) {
            (Some(decorating), Some(request)) if decorating == request => options.into_overlay(),
            _ => options,
        }
    }

    /// The host finished creating the window for `request`.
    pub fn window_created(
        &mut self,
        request: WindowRequest,
        window: HostWindow<H>,
    ) -> OverlayResult<()> {
        let pending = match self.pending {
            Some(pending) if pending.request == request => pending,
            _ => {
                debug!("Closing window {} for a stale request", window.id());
                window.close()?;
                return Ok(());
            }
        };

        info!("Overlay window {} created", window.id());
        self.window = Some(window.clone());

        self.refresh_config(false)?;
        self.apply_window_flags(&window)?;

        window.hide()?;
        window.attach_session()?;

        self.pending = None;
        self.decorating = None;

        let show = match pending.then {
            AfterCreate::Show => true,
            AfterCreate::Startup { first_launch } => {
                (first_launch && self.config.as_ref().is_some_and(|c| c.startup))
                    || self.force_startup
            }
        };

        if show {
            self.show()?;
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: OverlayEvent) -> OverlayResult<()> {
        match event {
            OverlayEvent::Hotkey(HotkeyAction::Toggle) | OverlayEvent::TrayClicked => {
                self.interact()
            }
            OverlayEvent::Hotkey(HotkeyAction::Hide) => self.hide(),
            OverlayEvent::ConfigChanged => {
                if self.window.is_some() {
                    self.refresh_config(true)?;
                }
                Ok(())
            }
            OverlayEvent::WindowBlurred(id) => {
                if self.is_overlay(id) && self.config.as_ref().is_some_and(|c| c.hide_on_blur) {
                    self.hide()?;
                }
                Ok(())
            }
            OverlayEvent::WindowResized(id) => {
                if self.is_overlay(id) {
                    self.window_resized();
                }
                Ok(())
            }
            OverlayEvent::WindowClosed(id) => {
                if self.is_overlay(id) {
                    self.window_closed()?;
                }
                Ok(())
            }
            OverlayEvent::TimerFired(token) => self.timer_fired(token),
        }
    }

    /// Opens the overlay if it is hidden, hides it if it is open, and creates it if it doesn't
    /// exist.
    pub fn interact(&mut self) -> OverlayResult<()> {
        let Some(window) = self.window.clone() else {
            return self.create(AfterCreate::Show);
        };

        if window.is_visible() {
            self.hide()
        } else {
            self.show()
        }
    }

    pub fn show(&mut self) -> OverlayResult<()> {
        let Some(window) = self.window.clone() else {
            return Ok(());
        };
        if self.transition.is_animating() || window.is_visible() {
            return Ok(());
        }
        let Some(config) = self.config.clone() else {
            return Ok(());
        };

        debug!("Showing overlay");
        self.last_focus = self.host.focused_window();

        let work_area = self.work_area(&config)?;

        if config.animate {
            let token = self.next_token();
            self.transition.begin(Direction::Show, token);
            self.host.start_timer(token, ANIMATION_DURATION, false)?;
            window.set_bounds(
                &start_bounds(&work_area, config.position, &config.size),
                config.animate,
            )?;
        }

        window.show()?;
        window.focus()?;

        window.set_bounds(
            &end_bounds(&work_area, config.position, &config.size),
            config.animate,
        )?;

        self.animate_tray()?;
        Ok(())
    }

    pub fn hide(&mut self) -> OverlayResult<()> {
        let Some(window) = self.window.clone() else {
            return Ok(());
        };
        if self.transition.is_animating() || !window.is_visible() {
            return Ok(());
        }
        let Some(config) = self.config.clone() else {
            return Ok(());
        };

        debug!("Hiding overlay");

        if config.animate {
            let token = self.next_token();
            self.transition.begin(Direction::Hide, token);
            self.host.start_timer(token, ANIMATION_DURATION, false)?;

            let work_area = self.work_area(&config)?;
            window.set_bounds(
                &start_bounds(&work_area, config.position, &config.size),
                config.animate,
            )?;
        } else {
            self.finish_hide(&window)?;
        }

        self.clear_tray_animation()?;
        Ok(())
    }

    /// Tears everything down. If the overlay was open it opens again on the next
    /// `register_app`, which is what a plugin reload looks like.
    pub fn destroy(&mut self) -> OverlayResult<()> {
        if let Some(blink) = self.tray_blink.take() {
            self.host.cancel_timer(blink.token);
        }
        if let Some(tray) = self.tray.take() {
            tray.destroy()?;
        }

        if let Some(token) = self.transition.cancel() {
            self.host.cancel_timer(token);
        }

        if let Some(window) = self.window.take() {
            self.force_startup = window.is_visible();
            info!("Destroying overlay window {}", window.id());
            window.close()?;
        }

        self.host.unregister_all_hotkeys()?;

        self.pending = None;
        self.decorating = None;
        self.config = None;
        self.last_focus = None;
        Ok(())
    }

    fn create(&mut self, then: AfterCreate) -> OverlayResult<()> {
        if self.window.is_some() {
            return Ok(());
        }

        if let Some(pending) = &mut self.pending {
            if then == AfterCreate::Show {
                pending.then = AfterCreate::Show;
            }
            trace!("Overlay window is already being created");
            return Ok(());
        }

        let request = WindowRequest(self.next_id());
        self.pending = Some(PendingWindow { request, then });
        self.decorating = Some(request);

        if let Err(e) = self.host.create_window(request) {
            self.pending = None;
            self.decorating = None;
            return Err(e.into());
        }

        Ok(())
    }

    fn refresh_config(&mut self, reapply: bool) -> OverlayResult<()> {
        let user_config = self.host.user_config()?;
        let config = OverlayConfig::resolve(&self.capabilities, user_config.as_ref());
        let previous = self.config.as_ref();

        if config.hides_dock() {
            self.host.set_dock_visible(false)?;
        } else if previous.is_some_and(|c| c.hides_dock()) {
            self.host.set_dock_visible(true)?;
        }

        let unique_enabled = config.unique && !previous.is_some_and(|c| c.unique);
        if unique_enabled || (config.start_alone && !reapply) {
            self.close_other_windows()?;
        }

        debug!("Applying overlay configuration (reapply: {reapply})");
        self.config = Some(config);

        self.register_hotkeys()?;
        let tray_created = self.sync_tray()?;

        if reapply {
            if let (Some(window), Some(config)) = (self.window.clone(), self.config.clone()) {
                self.apply_window_flags(&window)?;
                let work_area = self.work_area(&config)?;
                window.set_bounds(
                    &end_bounds(&work_area, config.position, &config.size),
                    config.animate,
                )?;
                if window.is_visible() && tray_created {
                    self.animate_tray()?;
                }
            }
        }

        Ok(())
    }

    fn close_other_windows(&mut self) -> OverlayResult<()> {
        let overlay = self.window.as_ref().map(|w| w.id());
        for window in self.host.windows() {
            if Some(window.id()) != overlay {
                info!("Closing window {}", window.id());
                window.close()?;
            }
        }
        Ok(())
    }

    fn register_hotkeys(&mut self) -> OverlayResult<()> {
        self.host.unregister_all_hotkeys()?;

        let Some(config) = &self.config else {
            return Ok(());
        };

        let bindings = config
            .hotkeys
            .open
            .iter()
            .map(|combo| (combo, HotkeyAction::Toggle))
            .chain(config.hotkeys.close.iter().map(|combo| (combo, HotkeyAction::Hide)));

        for (combo, action) in bindings {
            if let Err(e) = self.host.register_hotkey(combo, action) {
                warn!("Could not register hotkey {combo}: {e}");
            }
        }

        Ok(())
    }

    /// Creates or destroys the tray icon to match the configuration. Returns true if a new
    /// icon was created.
    fn sync_tray(&mut self) -> OverlayResult<bool> {
        let wants_tray = self.config.as_ref().is_some_and(|c| c.tray);

        if wants_tray && self.tray.is_none() {
            let mut tray = match self.host.create_tray(TrayImage::Idle) {
                Ok(tray) => tray,
                Err(e) => {
                    warn!("Continuing without tray icon: {e}");
                    return Ok(false);
                }
            };
            tray.set_tooltip(TOOLTIP_OPEN)?;
            tray.set_pressed_image(TrayImage::Active)?;
            self.tray = Some(tray);
            info!("Tray icon created");
            return Ok(true);
        }

        if !wants_tray && self.tray.is_some() {
            self.clear_tray_animation()?;
            if let Some(tray) = self.tray.take() {
                tray.destroy()?;
                info!("Tray icon destroyed");
            }
        }

        Ok(false)
    }

    fn apply_window_flags(&self, window: &HostWindow<H>) -> OverlayResult<()> {
        let Some(config) = &self.config else {
            return Ok(());
        };
        window.set_has_shadow(config.has_shadow)?;
        window.set_resizable(config.resizable)?;
        window.set_always_on_top(config.always_on_top)?;
        Ok(())
    }

    fn work_area(&self, config: &OverlayConfig) -> OverlayResult<Bounds> {
        let display = if config.primary_display {
            self.host.primary_display()?
        } else {
            let cursor = self.host.cursor_position()?;
            self.host.display_nearest_point(&cursor)?
        };
        Ok(display.work_area)
    }

    fn finish_hide(&mut self, window: &HostWindow<H>) -> OverlayResult<()> {
        self.restore_focus(window)?;
        window.blur()?;
        window.hide()?;
        Ok(())
    }

    /// Gives focus back to the window that had it before the overlay opened, or to the
    /// previous application when that window is gone.
    fn restore_focus(&mut self, window: &HostWindow<H>) -> OverlayResult<()> {
        if !window.is_focused() {
            return Ok(());
        }

        match self.last_focus.as_ref().filter(|w| w.has_sessions()) {
            Some(previous) => previous.focus()?,
            None if self.capabilities.reactivates_previous_app => {
                self.host.activate_previous_app()?
            }
            None => {}
        }
        Ok(())
    }

    fn window_resized(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        if self.pending.is_some() || self.transition.is_animating() || !window.is_visible() {
            return;
        }
        let Some(config) = &mut self.config else {
            return;
        };
        if !config.resizable {
            return;
        }

        let size = window.size();
        remember_size(config.position, &mut config.size, &size);
        trace!("Overlay resized to {}x{}", size.width, size.height);
    }

    fn window_closed(&mut self) -> OverlayResult<()> {
        info!("Overlay window closed");
        self.window = None;
        if let Some(token) = self.transition.cancel() {
            self.host.cancel_timer(token);
        }
        self.clear_tray_animation()
    }

    fn timer_fired(&mut self, token: TimerToken) -> OverlayResult<()> {
        if let Some(direction) = self.transition.complete(token) {
            if direction == Direction::Hide {
                if let Some(window) = self.window.clone() {
                    self.finish_hide(&window)?;
                }
            }
            return Ok(());
        }

        if let Some(blink) = &mut self.tray_blink {
            if blink.token == token {
                let image = blink.tick();
                if let Some(tray) = &mut self.tray {
                    tray.set_image(image)?;
                }
                return Ok(());
            }
        }

        trace!("Ignoring stale timer {token:?}");
        Ok(())
    }

    fn animate_tray(&mut self) -> OverlayResult<()> {
        if !self.config.as_ref().is_some_and(|c| c.tray) {
            return Ok(());
        }
        let Some(tray) = &mut self.tray else {
            return Ok(());
        };

        tray.set_tooltip(TOOLTIP_CLOSE)?;

        if self.capabilities.supports_tray_blink {
            if let Some(blink) = self.tray_blink.take() {
                self.host.cancel_timer(blink.token);
            }
            let token = self.next_token();
            self.host.start_timer(token, BLINK_INTERVAL, true)?;
            self.tray_blink = Some(TrayBlink::new(token));
        }

        Ok(())
    }

    fn clear_tray_animation(&mut self) -> OverlayResult<()> {
        if let Some(blink) = self.tray_blink.take() {
            self.host.cancel_timer(blink.token);
        }

        if let Some(tray) = &mut self.tray {
            tray.set_tooltip(TOOLTIP_OPEN)?;
            if self.capabilities.supports_tray_blink {
                tray.set_image(TrayImage::Idle)?;
            }
        }

        Ok(())
    }

    fn is_overlay(&self, id: WindowId) -> bool {
        self.window.as_ref().is_some_and(|w| w.id() == id)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn next_token(&mut self) -> TimerToken {
        TimerToken(self.next_id())
    }
}
