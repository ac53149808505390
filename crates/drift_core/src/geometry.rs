//! Document-space geometry
//!
//! Elements are positioned in document coordinates (y grows downwards from
//! the top of the page). The scroll position is the document y coordinate
//! shown at the top edge of the viewport.

/// Layout bounds of an element in document coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    /// X position (absolute, after layout)
    pub x: f32,
    /// Y position (absolute, after layout)
    pub y: f32,
    /// Computed width
    pub width: f32,
    /// Computed height
    pub height: f32,
}

impl Bounds {
    /// Create new bounds
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge in document coordinates
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Bounds relative to the viewport for the given scroll position
    pub fn relative_to(&self, scroll_position: f32) -> Bounds {
        Bounds {
            y: self.y - scroll_position,
            ..*self
        }
    }

    /// Check if any part of the bounds is visible in the viewport
    pub fn intersects_viewport(&self, scroll_position: f32, viewport: &Viewport) -> bool {
        let rel = self.relative_to(scroll_position);
        rel.y < viewport.height && rel.bottom() > 0.0
    }
}

/// The visible window onto the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_bounds() {
        let bounds = Bounds::new(0.0, 1200.0, 400.0, 300.0);
        let rel = bounds.relative_to(1000.0);
        assert_eq!(rel.y, 200.0);
        assert_eq!(rel.height, 300.0);
    }

    #[test]
    fn test_viewport_intersection() {
        let viewport = Viewport::new(1280.0, 800.0);
        let bounds = Bounds::new(0.0, 1200.0, 400.0, 300.0);

        assert!(!bounds.intersects_viewport(0.0, &viewport));
        assert!(bounds.intersects_viewport(500.0, &viewport));
        assert!(!bounds.intersects_viewport(1500.0, &viewport));
    }
}
