use crate::platform::Size;

/// Correlates a window creation request with the window the host eventually delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowRequest(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleBarStyle {
    #[default]
    Default,
    Hidden,
}

/// Options the host creates a window with.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub title: String,
    pub size: Option<Size>,
    pub min_size: Option<Size>,
    pub frame: bool,
    pub title_bar_style: TitleBarStyle,
    pub maximizable: bool,
    pub minimizable: bool,
    pub movable: bool,
    pub show: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "droptty".to_string(),
            size: Some(Size::new(800, 500)),
            min_size: Some(Size::new(200, 100)),
            frame: true,
            title_bar_style: TitleBarStyle::Default,
            maximizable: true,
            minimizable: true,
            movable: true,
            show: true,
        }
    }
}

impl WindowOptions {
    /// The same options, stripped down to a bare, hidden surface for the overlay.
    pub fn into_overlay(self) -> Self {
        Self {
            min_size: Some(Size::new(0, 0)),
            frame: false,
            title_bar_style: TitleBarStyle::Hidden,
            maximizable: false,
            minimizable: false,
            movable: false,
            show: false,
            ..self
        }
    }
}
