use droptty_core::animation::{Animator, ANIMATION_DURATION};
use droptty_core::platform::{Bounds, OverlayWindowImpl, PlatformResult, Position, Size, WindowId};
use droptty_core::window::{TitleBarStyle, WindowOptions};
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::{Window, WindowAttributes, WindowButtons, WindowLevel};

#[derive(Debug)]
struct WindowState {
    /// None once the window has been closed.
    window: RefCell<Option<Window>>,
    visible: Cell<bool>,
    focused: Cell<bool>,
    sessions: Cell<usize>,
    animation: RefCell<Option<Animator<Bounds>>>,
}

/// A winit window shared between the host and the overlay controller. Clones refer to the
/// same window.
#[derive(Debug, Clone)]
pub struct DesktopWindow {
    id: WindowId,
    winit_id: winit::window::WindowId,
    state: Rc<WindowState>,
}

impl DesktopWindow {
    pub fn new(window: Window, visible: bool) -> Self {
        let winit_id = window.id();
        Self {
            id: u64::from(winit_id),
            winit_id,
            state: Rc::new(WindowState {
                window: RefCell::new(Some(window)),
                visible: Cell::new(visible),
                focused: Cell::new(false),
                sessions: Cell::new(0),
                animation: RefCell::new(None),
            }),
        }
    }

    pub fn winit_id(&self) -> winit::window::WindowId {
        self.winit_id
    }

    pub fn is_closed(&self) -> bool {
        self.state.window.borrow().is_none()
    }

    pub fn set_focused(&self, focused: bool) {
        self.state.focused.set(focused);
    }

    /// Converts a position inside the window into screen coordinates.
    pub fn to_screen(&self, position: PhysicalPosition<f64>) -> Option<Position> {
        let origin = self.with_window(|w| w.inner_position().ok()).ok()??;
        Some(Position::new(
            origin.x + position.x as i32,
            origin.y + position.y as i32,
        ))
    }

    /// Advances a running bounds animation. Returns true while there is more to come.
    pub fn step_animation(&self, now: Instant) -> bool {
        let mut animation = self.state.animation.borrow_mut();
        let Some(animator) = animation.as_mut() else {
            return false;
        };

        if let Some(bounds) = animator.update(now) {
            let _ = self.with_window(|w| apply_bounds(w, &bounds));
        }

        if animator.is_animating() {
            true
        } else {
            *animation = None;
            false
        }
    }

    fn with_window<R>(&self, f: impl FnOnce(&Window) -> R) -> PlatformResult<R> {
        let window = self.state.window.borrow();
        let window = window.as_ref().ok_or("Window has been closed")?;
        Ok(f(window))
    }

    fn current_bounds(&self) -> Option<Bounds> {
        self.with_window(|w| {
            let position = w.outer_position().ok()?;
            let size = w.inner_size();
            Some(Bounds::new(position.x, position.y, size.width, size.height))
        })
        .ok()?
    }
}

impl OverlayWindowImpl for DesktopWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.state.visible.get()
    }

    fn is_focused(&self) -> bool {
        self.state.focused.get()
    }

    fn size(&self) -> Size {
        self.with_window(|w| {
            let size = w.inner_size();
            Size::new(size.width, size.height)
        })
        .unwrap_or_default()
    }

    fn has_sessions(&self) -> bool {
        !self.is_closed() && self.state.sessions.get() > 0
    }

    fn show(&self) -> PlatformResult<()> {
        self.with_window(|w| w.set_visible(true))?;
        self.state.visible.set(true);
        Ok(())
    }

    fn hide(&self) -> PlatformResult<()> {
        // A slide still in flight settles on its target so no frame lands after hiding.
        if let Some(animator) = self.state.animation.borrow_mut().take() {
            self.with_window(|w| apply_bounds(w, animator.target()))?;
        }
        self.with_window(|w| w.set_visible(false))?;
        self.state.visible.set(false);
        self.state.focused.set(false);
        Ok(())
    }

    fn focus(&self) -> PlatformResult<()> {
        self.with_window(|w| w.focus_window())?;
        self.state.focused.set(true);
        Ok(())
    }

    fn blur(&self) -> PlatformResult<()> {
        // winit cannot hand focus away, hiding the window does that.
        self.state.focused.set(false);
        Ok(())
    }

    fn close(&self) -> PlatformResult<()> {
        if let Some(window) = self.state.window.borrow_mut().take() {
            debug!("Closing window {}", self.id);
            drop(window);
        }
        self.state.animation.borrow_mut().take();
        self.state.visible.set(false);
        self.state.focused.set(false);
        Ok(())
    }

    fn set_bounds(&self, bounds: &Bounds, animate: bool) -> PlatformResult<()> {
        let from = self.current_bounds().filter(|_| animate && self.is_visible());

        match from {
            Some(from) => {
                let animator = Animator::start(from, bounds.clone(), ANIMATION_DURATION, Instant::now());
                *self.state.animation.borrow_mut() = Some(animator);
            }
            None => {
                self.state.animation.borrow_mut().take();
                self.with_window(|w| apply_bounds(w, bounds))?;
            }
        }
        Ok(())
    }

    fn set_has_shadow(&self, has_shadow: bool) -> PlatformResult<()> {
        #[cfg(target_os = "macos")]
        {
            use winit::platform::macos::WindowExtMacOS;
            self.with_window(|w| w.set_has_shadow(has_shadow))?;
        }
        #[cfg(not(target_os = "macos"))]
        let _ = has_shadow;
        Ok(())
    }

    fn set_resizable(&self, resizable: bool) -> PlatformResult<()> {
        self.with_window(|w| w.set_resizable(resizable))
    }

    fn set_always_on_top(&self, always_on_top: bool) -> PlatformResult<()> {
        let level = if always_on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };
        self.with_window(|w| w.set_window_level(level))
    }

    fn attach_session(&self) -> PlatformResult<()> {
        let sessions = self.state.sessions.get() + 1;
        self.state.sessions.set(sessions);
        self.with_window(|w| w.set_title(&format!("droptty ({sessions})")))
    }
}

fn apply_bounds(window: &Window, bounds: &Bounds) {
    window.set_outer_position(PhysicalPosition::new(
        bounds.position.x,
        bounds.position.y,
    ));
    let _ = window.request_inner_size(PhysicalSize::new(bounds.size.width, bounds.size.height));
}

/// Translates host window options into winit attributes.
pub fn window_attributes(options: &WindowOptions) -> WindowAttributes {
    let mut buttons = WindowButtons::CLOSE;
    if options.maximizable {
        buttons |= WindowButtons::MAXIMIZE;
    }
    if options.minimizable {
        buttons |= WindowButtons::MINIMIZE;
    }

    let mut attributes = Window::default_attributes()
        .with_title(options.title.clone())
        .with_decorations(options.frame)
        .with_visible(options.show)
        .with_enabled_buttons(buttons);

    if let Some(size) = &options.size {
        attributes = attributes.with_inner_size(PhysicalSize::new(size.width, size.height));
    }
    if let Some(size) = &options.min_size {
        attributes = attributes.with_min_inner_size(PhysicalSize::new(size.width, size.height));
    }

    #[cfg(target_os = "macos")]
    {
        use winit::platform::macos::WindowAttributesExtMacOS;
        let hidden = options.title_bar_style == TitleBarStyle::Hidden;
        attributes = attributes
            .with_titlebar_hidden(hidden)
            .with_title_hidden(hidden)
            .with_movable_by_window_background(options.movable);
    }
    #[cfg(not(target_os = "macos"))]
    {
        if options.title_bar_style == TitleBarStyle::Hidden {
            attributes = attributes.with_decorations(false);
        }
    }

    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_window_attributes() {
        let attributes = window_attributes(&WindowOptions::default());
        assert!(attributes.decorations);
        assert!(attributes.visible);
        assert_eq!(attributes.title, "droptty");
        assert_eq!(attributes.enabled_buttons, WindowButtons::all());
    }

    #[test]
    fn test_overlay_window_attributes() {
        let attributes = window_attributes(&WindowOptions::default().into_overlay());
        assert!(!attributes.decorations);
        assert!(!attributes.visible);
        assert_eq!(attributes.enabled_buttons, WindowButtons::CLOSE);
        assert_eq!(
            attributes.min_inner_size,
            Some(PhysicalSize::new(0u32, 0u32).into())
        );
    }
}
