use crate::types::geometry::Size;
use serde::{Deserialize, Serialize};

/// Window created to host the browser.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub title: String,
    /// Zero means 640.
    pub width: i32,
    /// Zero means 480.
    pub height: i32,
    /// Icon resource id in the executable. Zero uses the stock application icon.
    pub icon_id: u16,
    /// Centers the window on the primary screen instead of letting the
    /// system place it.
    pub center: bool,
    pub min_size: Option<Size>,
    pub max_size: Option<Size>,
}

impl WindowOptions {
    /// Initial outer size after defaults.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height).or_default_window()
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.width < 0 || self.height < 0 {
            errors.push("window width and height must not be negative".to_string());
        }

        if let (Some(min), Some(max)) = (self.min_size, self.max_size)
            && min.is_set()
            && max.is_set()
            && (min.width > max.width || min.height > max.height)
        {
            errors.push("min_size must not exceed max_size".to_string());
        }

        errors
    }

    pub fn with_defaults_for_invalid(&self) -> Self {
        let mut repaired = self.clone();
        if repaired.width < 0 {
            repaired.width = 0;
        }
        if repaired.height < 0 {
            repaired.height = 0;
        }
        if let (Some(min), Some(max)) = (repaired.min_size, repaired.max_size)
            && min.is_set()
            && max.is_set()
            && (min.width > max.width || min.height > max.height)
        {
            repaired.min_size = None;
            repaired.max_size = None;
        }
        repaired
    }
}
