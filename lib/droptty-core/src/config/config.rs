use crate::config::config_serializer::serialize_config;
use crate::config::InputCombo;
use crate::platform::PlatformCapabilities;
use log::{trace, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where the overlay docks on the active display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::Top,
        Anchor::Bottom,
        Anchor::Left,
        Anchor::Right,
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
        Anchor::Center,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SizeSpec {
    /// Pixels when greater than 1, otherwise a fraction of the work-area width
    pub width: f64,
    /// Pixels when greater than 1, otherwise a fraction of the work-area height
    pub height: f64,
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self {
            width: 0.4,
            height: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Hotkeys {
    /// Hotkeys that toggle the overlay
    #[schemars(with = "Vec<String>")]
    pub open: Vec<InputCombo>,
    /// Hotkeys that hide the overlay
    #[schemars(with = "Vec<String>")]
    pub close: Vec<InputCombo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Keep the overlay above every other window
    pub always_on_top: bool,
    /// Slide the overlay in and out instead of popping it
    pub animate: bool,
    /// Draw the native window shadow
    pub has_shadow: bool,
    /// Hide the dock icon while unique mode is on
    pub hide_dock: bool,
    /// Hide the overlay when it loses focus
    pub hide_on_blur: bool,
    /// Global hotkeys
    pub hotkeys: Hotkeys,
    /// Anchor: top, bottom, left, right, topLeft, topRight, bottomLeft, bottomRight or center
    pub position: Anchor,
    /// Open on the primary display instead of the display under the pointer
    pub primary_display: bool,
    /// Let the overlay be resized; the new size is kept until the next reload
    pub resizable: bool,
    /// Overlay size
    pub size: SizeSpec,
    /// Close every other window when the overlay is created
    pub start_alone: bool,
    /// Show the overlay when the application starts
    pub startup: bool,
    /// Show a tray icon
    pub tray: bool,
    /// Only the overlay window may exist
    pub unique: bool,
}

impl OverlayConfig {
    pub fn defaults(capabilities: &PlatformCapabilities) -> Self {
        Self {
            always_on_top: true,
            animate: true,
            has_shadow: false,
            hide_dock: false,
            hide_on_blur: false,
            hotkeys: capabilities.default_hotkeys.clone(),
            position: Anchor::Top,
            primary_display: false,
            resizable: true,
            size: SizeSpec::default(),
            start_alone: false,
            startup: false,
            tray: true,
            unique: false,
        }
    }

    /// Defaults with the user's overrides laid on top. Top-level fields replace the defaults
    /// wholesale.
    pub fn resolve(capabilities: &PlatformCapabilities, user: Option<&UserConfig>) -> Self {
        let mut config = Self::defaults(capabilities);
        if let Some(user) = user {
            user.apply_to(&mut config);
        }
        config
    }

    pub fn hides_dock(&self) -> bool {
        self.unique && self.hide_dock
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::defaults(&PlatformCapabilities::current())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialHotkeys {
    pub open: Option<Vec<InputCombo>>,
    pub close: Option<Vec<InputCombo>>,
}

/// The `overlay` section as the user wrote it. Anything left out keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_dock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_on_blur: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotkeys: Option<PartialHotkeys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Anchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<PartialSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_alone: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
}

impl UserConfig {
    fn apply_to(&self, config: &mut OverlayConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut config.always_on_top, &self.always_on_top);
        set(&mut config.animate, &self.animate);
        set(&mut config.has_shadow, &self.has_shadow);
        set(&mut config.hide_dock, &self.hide_dock);
        set(&mut config.hide_on_blur, &self.hide_on_blur);
        set(&mut config.position, &self.position);
        set(&mut config.primary_display, &self.primary_display);
        set(&mut config.resizable, &self.resizable);
        set(&mut config.start_alone, &self.start_alone);
        set(&mut config.startup, &self.startup);
        set(&mut config.tray, &self.tray);
        set(&mut config.unique, &self.unique);

        if let Some(hotkeys) = &self.hotkeys {
            let defaults = config.hotkeys.clone();
            config.hotkeys = Hotkeys {
                open: hotkeys.open.clone().unwrap_or(defaults.open),
                close: hotkeys.close.clone().unwrap_or(defaults.close),
            };
        }

        if let Some(size) = &self.size {
            let defaults = SizeSpec::default();
            config.size = SizeSpec {
                width: valid_dimension(size.width, defaults.width, "width"),
                height: valid_dimension(size.height, defaults.height, "height"),
            };
        }
    }
}

fn valid_dimension(value: Option<f64>, default: f64, name: &str) -> f64 {
    match value {
        Some(value) if value.is_finite() && value > 0.0 => value,
        Some(value) => {
            warn!("Ignoring overlay size {name} {value}, using {default}");
            default
        }
        None => default,
    }
}

/// The whole configuration file. Only the `overlay` section belongs to the overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub overlay: Option<UserConfig>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: ConfigFile = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Loads the file, writing a documented default one first if it doesn't exist yet.
    pub fn load_or_create(
        path: &Path,
        capabilities: &PlatformCapabilities,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            Self::create_default(path, capabilities)?;
            trace!("Created default config file at: {}", path.display());
        }

        Self::load(path)
    }

    pub fn create_default(
        path: &Path,
        capabilities: &PlatformCapabilities,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serialize_config(&OverlayConfig::defaults(capabilities))?;
        fs::write(path, contents)?;
        Ok(())
    }
}
