//! Focus-trap cycling for overlay panels.
//!
//! A [`FocusRing`] is a snapshot of the focusable controls inside one
//! container, in traversal order. While an overlay is up, Tab and Shift+Tab
//! cycle through the ring with wrap-around at both ends: forward from the
//! last control lands on the first, backward from the first lands on the
//! last. The ring never lets tab order escape the container.
//!
//! Rings are cheap to capture, so the overlay stack recaptures on every tab
//! keypress; this keeps the trap honest when the host shows or hides step
//! containers underneath it.

use crate::surface::FormSurface;

/// An ordered ring of focusable control names.
#[derive(Debug, Clone, Default)]
pub struct FocusRing {
    order: Vec<String>,
}

impl FocusRing {
    /// Snapshot the focusables of `container` on the given surface.
    pub fn capture<S: FormSurface + ?Sized>(surface: &S, container: &str) -> Self {
        Self {
            order: surface.focusables(container),
        }
    }

    /// Whether the ring holds no controls.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of controls in the ring.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// First control in traversal order.
    pub fn first(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// Last control in traversal order.
    pub fn last(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }

    /// The control after `current`, wrapping from the last to the first.
    ///
    /// With no current focus, or focus on a control outside the ring, the
    /// first control is returned so the trap recaptures focus.
    pub fn next_after(&self, current: Option<&str>) -> Option<&str> {
        if self.order.is_empty() {
            return None;
        }

        match current.and_then(|c| self.position(c)) {
            Some(pos) => {
                let next = (pos + 1) % self.order.len();
                Some(self.order[next].as_str())
            }
            None => self.first(),
        }
    }

    /// The control before `current`, wrapping from the first to the last.
    ///
    /// With no current focus, or focus outside the ring, the last control is
    /// returned (mirroring backward entry into the trap).
    pub fn prev_before(&self, current: Option<&str>) -> Option<&str> {
        if self.order.is_empty() {
            return None;
        }

        match current.and_then(|c| self.position(c)) {
            Some(pos) => {
                let prev = if pos == 0 { self.order.len() - 1 } else { pos - 1 };
                Some(self.order[prev].as_str())
            }
            None => self.last(),
        }
    }

    fn position(&self, control: &str) -> Option<usize> {
        self.order.iter().position(|c| c == control)
    }
}
