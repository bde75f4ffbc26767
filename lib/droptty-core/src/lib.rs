pub mod animation;
pub mod config;
mod controller;
pub mod event;
pub mod geometry;
pub mod paths;
pub mod platform;
pub mod tray;
pub mod window;

pub use config::{ConfigFile, OverlayConfig, UserConfig};
pub use controller::{OverlayController, OverlayError, OverlayResult, OverlayState};
pub use event::{HotkeyAction, OverlayEvent, TimerToken};
pub use platform::PlatformCapabilities;
pub use window::{WindowOptions, WindowRequest};

pub fn version() -> &'static str {
    option_env!("VERSION").unwrap_or("v0.0.0-dev")
}
