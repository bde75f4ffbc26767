use crate::event::TimerToken;
use std::time::Duration;

pub const TOOLTIP_OPEN: &str = "Open Overlay";
pub const TOOLTIP_CLOSE: &str = "Close Overlay";
pub const BLINK_INTERVAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrayImage {
    Idle,
    Active,
}

impl TrayImage {
    pub fn toggled(self) -> Self {
        match self {
            TrayImage::Idle => TrayImage::Active,
            TrayImage::Active => TrayImage::Idle,
        }
    }
}

/// The repeating timer that blinks the tray icon while the overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrayBlink {
    pub token: TimerToken,
    pub image: TrayImage,
}

impl TrayBlink {
    pub fn new(token: TimerToken) -> Self {
        Self {
            token,
            image: TrayImage::Idle,
        }
    }

    /// Advances one blink and returns the image to show.
    pub fn tick(&mut self) -> TrayImage {
        self.image = self.image.toggled();
        self.image
    }
}
