//! Overlay panel management.
//!
//! This module provides [`OverlayStack`], which tracks open overlay panels
//! and enforces a closed focus loop while one is visible.
//!
//! Overlays are ordered in a stack: the most recently opened panel traps
//! focus, and closing it reactivates the trap of the panel underneath. The
//! stack is an instance owned by the page controller, not ambient state, so
//! independent pages get independent overlay discipline.
//!
//! # Lifecycle
//!
//! - [`open`](OverlayStack::open) records the control focused at that
//!   moment, shows the panel, and locks background scroll. Focusable
//!   enumeration is deferred to [`settle`](OverlayStack::settle), one layout
//!   tick later, so the host can let the panel render before it is measured.
//! - [`handle_tab`](OverlayStack::handle_tab) cycles the trap;
//!   [`handle_escape`](OverlayStack::handle_escape) closes the active panel
//!   unconditionally.
//! - [`close`](OverlayStack::close) hides the panel, unlocks scroll once the
//!   stack drains, and restores focus to the recorded control if it still
//!   exists. A vanished restore target leaves focus unset; that is accepted
//!   degradation, not an error.

use crate::focus::FocusRing;
use crate::surface::FormSurface;

/// One open overlay panel.
#[derive(Debug, Clone)]
pub struct OverlayHandle {
    /// Container name of the panel.
    panel: String,
    /// Control focused just before the panel opened.
    restore_to: Option<String>,
    /// Whether the deferred first-focus pass has run.
    settled: bool,
}

impl OverlayHandle {
    /// Container name of the panel.
    pub fn panel(&self) -> &str {
        &self.panel
    }

    /// The control focus returns to when this panel closes.
    pub fn restore_to(&self) -> Option<&str> {
        self.restore_to.as_deref()
    }
}

/// Stack of open overlays with focus trapping on the topmost.
#[derive(Debug, Default)]
pub struct OverlayStack {
    stack: Vec<OverlayHandle>,
}

impl OverlayStack {
    /// Create an empty overlay stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a panel: record the focused control, show the panel, lock
    /// background scroll.
    ///
    /// Focus does not move yet; call [`settle`](Self::settle) on the next
    /// layout tick. Returns `false` (and changes nothing) if the panel
    /// container is unknown to the surface.
    pub fn open<S: FormSurface + ?Sized>(&mut self, surface: &mut S, panel: &str) -> bool {
        let restore_to = surface.focused();

        if !surface.set_visible(panel, true) {
            tracing::warn!(panel, "overlay container missing, skipping open");
            return false;
        }
        surface.set_scroll_locked(true);

        self.stack.push(OverlayHandle {
            panel: panel.to_string(),
            restore_to,
            settled: false,
        });
        tracing::debug!(panel, depth = self.stack.len(), "overlay opened");
        true
    }

    /// Run the deferred first-focus pass for the active panel.
    ///
    /// Enumerates the panel's focusables now that layout has settled and
    /// moves focus to the first one. Idempotent per panel.
    pub fn settle<S: FormSurface + ?Sized>(&mut self, surface: &mut S) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if top.settled {
            return;
        }
        top.settled = true;

        let ring = FocusRing::capture(surface, &top.panel);
        match ring.first() {
            Some(first) => {
                surface.focus(first);
            }
            None => {
                tracing::warn!(panel = %top.panel, "overlay has no focusable controls");
            }
        }
    }

    /// Cycle the focus trap of the active panel.
    ///
    /// `backward` selects Shift+Tab behavior. Returns `true` if the keypress
    /// was consumed (an overlay is open).
    pub fn handle_tab<S: FormSurface + ?Sized>(&mut self, surface: &mut S, backward: bool) -> bool {
        let Some(top) = self.stack.last() else {
            return false;
        };

        // Recapture each keypress: step containers under the panel come and
        // go, and the trap must follow the live set.
        let ring = FocusRing::capture(surface, &top.panel);
        let current = surface.focused();
        let target = if backward {
            ring.prev_before(current.as_deref())
        } else {
            ring.next_after(current.as_deref())
        };

        if let Some(target) = target {
            surface.focus(target);
        }
        true
    }

    /// Close the active panel in response to an escape signal.
    ///
    /// Returns the closed handle, or `None` when no overlay is open.
    pub fn handle_escape<S: FormSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Option<OverlayHandle> {
        let top = self.stack.last()?.panel.clone();
        self.close(surface, &top)
    }

    /// Close a panel by name.
    ///
    /// Hides the panel, detaches its trap, restores focus, and unlocks
    /// background scroll once no overlay remains. Returns the removed
    /// handle, or `None` if the panel was not open.
    pub fn close<S: FormSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        panel: &str,
    ) -> Option<OverlayHandle> {
        let pos = self.stack.iter().position(|h| h.panel == panel)?;
        let handle = self.stack.remove(pos);

        surface.set_visible(&handle.panel, false);
        if self.stack.is_empty() {
            surface.set_scroll_locked(false);
        }

        match handle.restore_to.as_deref() {
            Some(control) if surface.contains(control) => {
                surface.focus(control);
            }
            Some(control) => {
                tracing::debug!(control, "restore target gone, leaving focus unset");
                surface.clear_focus();
            }
            None => surface.clear_focus(),
        }

        tracing::debug!(panel, depth = self.stack.len(), "overlay closed");
        Some(handle)
    }

    /// The panel currently trapping focus.
    pub fn active(&self) -> Option<&str> {
        self.stack.last().map(|h| h.panel.as_str())
    }

    /// Whether a specific panel is open at any depth.
    pub fn is_open(&self, panel: &str) -> bool {
        self.stack.iter().any(|h| h.panel == panel)
    }

    /// Number of open overlays.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
