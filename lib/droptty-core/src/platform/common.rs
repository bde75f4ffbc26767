use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::fmt;
use std::fmt::Debug;

#[derive(Debug)]
pub struct PlatformError {
    pub error_type: PlatformErrorType,
    pub backtrace: Backtrace,
}

#[derive(Debug)]
pub enum PlatformErrorType {
    Unknown,
    Error(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_type {
            PlatformErrorType::Unknown => write!(f, "unknown platform error"),
            PlatformErrorType::Error(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for PlatformError {}

impl From<PlatformErrorType> for PlatformError {
    fn from(error_type: PlatformErrorType) -> Self {
        Self {
            error_type,
            backtrace: Backtrace::capture(),
        }
    }
}

impl From<&str> for PlatformError {
    fn from(error: &str) -> Self {
        PlatformErrorType::Error(error.to_string()).into()
    }
}

impl From<String> for PlatformError {
    fn from(error: String) -> Self {
        PlatformErrorType::Error(error).into()
    }
}

impl From<()> for PlatformError {
    fn from(_: ()) -> Self {
        PlatformErrorType::Unknown.into()
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;

pub type DisplayId = u32;
pub type WindowId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Bounds {
    pub position: Position,
    pub size: Size,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            position: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_position(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    pub fn right(&self) -> i32 {
        self.position.x + self.size.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.position.y + self.size.height as i32
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.position.x + self.size.width as i32 / 2,
            self.position.y + self.size.height as i32 / 2,
        )
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.x >= self.position.x
            && position.x < self.right()
            && position.y >= self.position.y
            && position.y < self.bottom()
    }

    /// Whether `other` lies entirely inside these bounds. Touching edges count as inside.
    pub fn encloses(&self, other: &Bounds) -> bool {
        other.position.x >= self.position.x
            && other.position.y >= self.position.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Squared distance from `position` to the nearest point of these bounds.
    pub fn distance_squared(&self, position: &Position) -> i64 {
        let dx = if position.x < self.position.x {
            self.position.x - position.x
        } else if position.x >= self.right() {
            position.x - self.right() + 1
        } else {
            0
        } as i64;
        let dy = if position.y < self.position.y {
            self.position.y - position.y
        } else if position.y >= self.bottom() {
            position.y - self.bottom() + 1
        } else {
            0
        } as i64;
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    pub id: DisplayId,
    pub name: String,
    pub bounds: Bounds,
    /// The usable part of the display, without taskbars, docks and menu bars
    pub work_area: Bounds,
}
