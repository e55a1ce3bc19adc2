//! Contextual-help popover placement.
//!
//! Pure geometry for the inline help system: given the trigger's rectangle,
//! the rendered content size, and the viewport, pick a side and an origin.
//! Below the trigger is preferred; the popover flips above only when the
//! space underneath cannot hold it and the space above is larger. The
//! horizontal position centers on the trigger and is clamped so the content
//! never leaves the viewport.

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Which side of the trigger the popover landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HelpPlacement {
    /// Under the trigger (preferred).
    #[default]
    Below,
    /// Over the trigger (flip when below lacks room).
    Above,
}

/// A resolved popover position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedHelp {
    /// Top-left corner of the content.
    pub origin: Point,
    /// The side chosen.
    pub placement: HelpPlacement,
}

/// Gap between the trigger and the popover.
const GAP: f32 = 8.0;

/// Place help content relative to its trigger.
///
/// Vertical: below unless the space under the trigger cannot hold the
/// content and the space above it is larger. Horizontal: centered on the
/// trigger, shifted as needed to stay inside the viewport.
pub fn place(anchor: Rect, content: Size, viewport: Rect) -> PlacedHelp {
    let space_below = viewport.bottom() - anchor.bottom();
    let space_above = anchor.y - viewport.y;

    let placement = if space_below >= content.height + GAP || space_below >= space_above {
        HelpPlacement::Below
    } else {
        HelpPlacement::Above
    };

    let y = match placement {
        HelpPlacement::Below => anchor.bottom() + GAP,
        HelpPlacement::Above => anchor.y - content.height - GAP,
    };

    let mut x = anchor.center_x() - content.width / 2.0;
    if x < viewport.x {
        x = viewport.x;
    } else if x + content.width > viewport.right() {
        x = viewport.right() - content.width;
    }

    PlacedHelp {
        origin: Point::new(x, y),
        placement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 1024.0,
        height: 768.0,
    };

    #[test]
    fn test_prefers_below_when_room() {
        let anchor = Rect::new(500.0, 100.0, 24.0, 24.0);
        let placed = place(anchor, Size::new(200.0, 120.0), VIEWPORT);
        assert_eq!(placed.placement, HelpPlacement::Below);
        assert_eq!(placed.origin.y, anchor.bottom() + 8.0);
        // Centered on the trigger.
        assert!((placed.origin.x - (anchor.center_x() - 100.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_flips_above_near_the_bottom_edge() {
        let anchor = Rect::new(500.0, 730.0, 24.0, 24.0);
        let placed = place(anchor, Size::new(200.0, 120.0), VIEWPORT);
        assert_eq!(placed.placement, HelpPlacement::Above);
        assert_eq!(placed.origin.y, anchor.y - 120.0 - 8.0);
    }

    #[test]
    fn test_stays_below_when_below_has_more_room() {
        // Neither side fits, but below has more space than above.
        let anchor = Rect::new(500.0, 50.0, 24.0, 24.0);
        let placed = place(anchor, Size::new(200.0, 900.0), VIEWPORT);
        assert_eq!(placed.placement, HelpPlacement::Below);
    }

    #[test]
    fn test_clamps_at_viewport_edges() {
        let left = place(Rect::new(4.0, 100.0, 24.0, 24.0), Size::new(200.0, 80.0), VIEWPORT);
        assert_eq!(left.origin.x, 0.0);

        let right = place(
            Rect::new(1000.0, 100.0, 24.0, 24.0),
            Size::new(200.0, 80.0),
            VIEWPORT,
        );
        assert_eq!(right.origin.x, 1024.0 - 200.0);
    }
}
