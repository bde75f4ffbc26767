use crate::message::HostMessage;
use droptty_core::platform::{PlatformResult, TrayIconImpl};
use droptty_core::tray::{TrayImage, TOOLTIP_OPEN};
use log::trace;
use std::sync::Mutex;
use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{
    Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent,
};
use winit::event_loop::EventLoopProxy;

pub const MENU_TOGGLE: &str = "toggle";
pub const MENU_NEW_WINDOW: &str = "new-window";
pub const MENU_RELOAD_CONFIG: &str = "reload-config";
pub const MENU_OPEN_CONFIG: &str = "open-config";
pub const MENU_OPEN_LOG: &str = "open-log";
pub const MENU_QUIT: &str = "quit";

const ICON_SIZE: u32 = 32;

// language=SVG
const IDLE_SVG: &str = r#"
    <svg width="32" height="32" viewBox="0 0 32 32" xmlns="http://www.w3.org/2000/svg">
      <rect x="3" y="5" width="26" height="22" rx="4" ry="4" fill="none" stroke="white" stroke-width="2.5"/>
      <path d="M9 12 L14 16 L9 20" fill="none" stroke="white" stroke-width="2.5" stroke-linecap="round" stroke-linejoin="round"/>
      <rect x="16" y="19" width="7" height="2.5" rx="1" fill="white"/>
    </svg>"#;

// language=SVG
const ACTIVE_SVG: &str = r#"
    <svg width="32" height="32" viewBox="0 0 32 32" xmlns="http://www.w3.org/2000/svg">
      <defs>
        <mask id="prompt">
          <rect x="0" y="0" width="32" height="32" fill="white"/>
          <path d="M9 12 L14 16 L9 20" fill="none" stroke="black" stroke-width="2.5" stroke-linecap="round" stroke-linejoin="round"/>
          <rect x="16" y="19" width="7" height="2.5" rx="1" fill="black"/>
        </mask>
      </defs>
      <rect x="3" y="5" width="26" height="22" rx="4" ry="4" fill="white" mask="url(#prompt)"/>
    </svg>"#;

/// Routes tray clicks and menu picks to the event loop. Must be called once, before the
/// first tray is created.
pub fn install_event_handlers(proxy: EventLoopProxy<HostMessage>) {
    let click_proxy = Mutex::new(proxy.clone());
    TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
        if let TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        } = event
        {
            if let Ok(proxy) = click_proxy.lock() {
                let _ = proxy.send_event(HostMessage::TrayClicked);
            }
        }
    }));

    let menu_proxy = Mutex::new(proxy);
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        trace!("Menu event received: {:?}", event);
        if let Ok(proxy) = menu_proxy.lock() {
            let _ = proxy.send_event(HostMessage::Menu(event.id));
        }
    }));
}

pub struct DesktopTray {
    icon: TrayIcon,
    pressed_image: Option<TrayImage>,
}

impl DesktopTray {
    pub fn new(image: TrayImage) -> PlatformResult<Self> {
        let menu = build_menu().map_err(|e| format!("Failed to build tray menu: {e}"))?;

        let icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_menu_on_left_click(false)
            .with_tooltip(TOOLTIP_OPEN)
            .with_icon(icon_for(image)?)
            .build()
            .map_err(|e| format!("Failed to create tray icon: {e}"))?;

        Ok(Self {
            icon,
            pressed_image: None,
        })
    }
}

impl TrayIconImpl for DesktopTray {
    fn set_tooltip(&mut self, tooltip: &str) -> PlatformResult<()> {
        self.icon
            .set_tooltip(Some(tooltip))
            .map_err(|e| format!("Failed to set tray tooltip: {e}").into())
    }

    fn set_image(&mut self, image: TrayImage) -> PlatformResult<()> {
        self.icon
            .set_icon(Some(icon_for(image)?))
            .map_err(|e| format!("Failed to set tray icon: {e}").into())
    }

    fn set_pressed_image(&mut self, image: TrayImage) -> PlatformResult<()> {
        // Status items highlight themselves when pressed, so the image is only remembered.
        self.pressed_image = Some(image);
        Ok(())
    }

    fn destroy(self) -> PlatformResult<()> {
        trace!("Removing tray icon (pressed image {:?})", self.pressed_image);
        drop(self.icon);
        Ok(())
    }
}

fn build_menu() -> Result<Menu, tray_icon::menu::Error> {
    let menu = Menu::new();
    menu.append_items(&[
        &MenuItem::new(format!("droptty {}", droptty_core::version()), false, None),
        &PredefinedMenuItem::separator(),
        &MenuItem::with_id(MENU_TOGGLE, "Toggle Overlay", true, None),
        &MenuItem::with_id(MENU_NEW_WINDOW, "New Window", true, None),
        &PredefinedMenuItem::separator(),
        &MenuItem::with_id(MENU_RELOAD_CONFIG, "Reload Config", true, None),
        &MenuItem::with_id(MENU_OPEN_CONFIG, "Open Config", true, None),
        &MenuItem::with_id(MENU_OPEN_LOG, "Open Log", true, None),
        &PredefinedMenuItem::separator(),
        &MenuItem::with_id(MENU_QUIT, "Quit", true, None),
    ])?;
    Ok(menu)
}

fn icon_for(image: TrayImage) -> PlatformResult<Icon> {
    let svg = match image {
        TrayImage::Idle => IDLE_SVG,
        TrayImage::Active => ACTIVE_SVG,
    };
    let rgba = render_svg(svg).map_err(|e| format!("Failed to render tray icon: {e}"))?;
    Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE)
        .map_err(|e| format!("Invalid tray icon: {e}").into())
}

fn render_svg(svg: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let options = resvg::usvg::Options::default();
    let tree = resvg::usvg::Tree::from_data(svg.as_bytes(), &options)?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(ICON_SIZE, ICON_SIZE)
        .ok_or("Failed to create pixmap")?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );

    Ok(pixmap.data().to_vec())
}
