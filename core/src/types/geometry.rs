//! Window sizing rules.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: i32 = 640;
pub const DEFAULT_HEIGHT: i32 = 480;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// A constraint is only in effect when both components are positive.
    pub fn is_set(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Substitutes the default for each zero component.
    pub fn or_default_window(self) -> Self {
        Self {
            width: if self.width == 0 {
                DEFAULT_WIDTH
            } else {
                self.width
            },
            height: if self.height == 0 {
                DEFAULT_HEIGHT
            } else {
                self.height
            },
        }
    }
}

/// How [`SizeConstraints::apply`] treats a requested size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeHint {
    /// Resize; the user may resize afterwards.
    #[default]
    None,
    /// Resize and drop the resizable frame.
    Fixed,
    /// Record a minimum track size.
    Min,
    /// Record a maximum size.
    Max,
}

impl SizeHint {
    /// Whether the window keeps its thick frame and maximize box.
    pub fn is_resizable(self) -> bool {
        self != SizeHint::Fixed
    }
}

/// Min/max limits answered to `WM_GETMINMAXINFO`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeConstraints {
    min: Size,
    max: Size,
}

impl SizeConstraints {
    /// Records `size` for `Min`/`Max` hints. Returns `true` when the hint
    /// asks for the window itself to be resized to `size`.
    pub fn apply(&mut self, hint: SizeHint, size: Size) -> bool {
        match hint {
            SizeHint::Min => {
                self.min = size;
                false
            }
            SizeHint::Max => {
                self.max = size;
                false
            }
            SizeHint::None | SizeHint::Fixed => true,
        }
    }

    pub fn min_track(&self) -> Option<Size> {
        self.min.is_set().then_some(self.min)
    }

    pub fn max_track(&self) -> Option<Size> {
        self.max.is_set().then_some(self.max)
    }
}

/// Top-left corner that centers `window` on `screen`, clamped to the screen
/// origin when the window is larger.
pub fn centered_origin(screen: Size, window: Size) -> (i32, i32) {
    (
        ((screen.width - window.width) / 2).max(0),
        ((screen.height - window.height) / 2).max(0),
    )
}
