//! In-memory reference surface.

use std::collections::HashMap;

use super::FormSurface;

#[derive(Debug, Clone)]
struct Container {
    name: String,
    parent: Option<String>,
    visible: bool,
}

#[derive(Debug, Clone)]
struct Control {
    name: String,
    container: String,
    focusable: bool,
    enabled: bool,
    value: String,
    error: Option<String>,
}

/// A memory-backed [`FormSurface`].
///
/// Hosts without a real page (tests, server-side rendering previews) build
/// the control tree with [`add_container`](Self::add_container) and
/// [`add_control`](Self::add_control); traversal order is insertion order,
/// the way document order drives a real page.
#[derive(Debug, Default)]
pub struct MemorySurface {
    containers: Vec<Container>,
    controls: Vec<Control>,
    focused: Option<String>,
    scroll_locked: bool,
    announcements: Vec<String>,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container, optionally nested inside another. Containers
    /// start visible.
    pub fn add_container(&mut self, name: &str, parent: Option<&str>) -> &mut Self {
        self.containers.push(Container {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            visible: true,
        });
        self
    }

    /// Register a focusable control inside a container.
    pub fn add_control(&mut self, container: &str, name: &str) -> &mut Self {
        self.controls.push(Control {
            name: name.to_string(),
            container: container.to_string(),
            focusable: true,
            enabled: true,
            value: String::new(),
            error: None,
        });
        self
    }

    /// Register a non-focusable control (static text, hidden input).
    pub fn add_static(&mut self, container: &str, name: &str) -> &mut Self {
        self.add_control(container, name);
        self.controls.last_mut().expect("just pushed").focusable = false;
        self
    }

    /// Remove a control entirely, as if the host tore it out of the page.
    pub fn remove_control(&mut self, name: &str) {
        self.controls.retain(|c| c.name != name);
        if self.focused.as_deref() == Some(name) {
            self.focused = None;
        }
    }

    /// The validation message currently attached to a field.
    pub fn field_error(&self, name: &str) -> Option<&str> {
        self.control(name).and_then(|c| c.error.as_deref())
    }

    /// Whether a container is currently visible (its chain included).
    pub fn is_visible(&self, container: &str) -> bool {
        self.chain_visible(container)
    }

    /// Whether background scroll is locked.
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Whether a control is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.control(name).is_some_and(|c| c.enabled)
    }

    /// Everything announced so far, oldest first.
    pub fn announcements(&self) -> &[String] {
        &self.announcements
    }

    /// The most recent announcement.
    pub fn last_announcement(&self) -> Option<&str> {
        self.announcements.last().map(String::as_str)
    }

    fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.name == name)
    }

    fn container(&self, name: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.name == name)
    }

    /// Visibility of a container including every ancestor.
    fn chain_visible(&self, name: &str) -> bool {
        let mut current = Some(name.to_string());
        while let Some(container_name) = current {
            let Some(container) = self.container(&container_name) else {
                return false;
            };
            if !container.visible {
                return false;
            }
            current = container.parent.clone();
        }
        true
    }

    /// Whether `candidate` is `ancestor` or nested inside it.
    fn is_within(&self, candidate: &str, ancestor: &str) -> bool {
        let mut current = Some(candidate.to_string());
        while let Some(container_name) = current {
            if container_name == ancestor {
                return true;
            }
            current = self
                .container(&container_name)
                .and_then(|c| c.parent.clone());
        }
        false
    }
}

impl FormSurface for MemorySurface {
    fn focusables(&self, container: &str) -> Vec<String> {
        self.controls
            .iter()
            .filter(|c| {
                c.focusable
                    && c.enabled
                    && self.is_within(&c.container, container)
                    && self.chain_visible(&c.container)
            })
            .map(|c| c.name.clone())
            .collect()
    }

    fn focused(&self) -> Option<String> {
        self.focused.clone()
    }

    fn focus(&mut self, control: &str) -> bool {
        let focusable = self
            .control(control)
            .is_some_and(|c| c.focusable && c.enabled);
        if focusable {
            self.focused = Some(control.to_string());
        }
        focusable
    }

    fn clear_focus(&mut self) {
        self.focused = None;
    }

    fn contains(&self, control: &str) -> bool {
        self.control(control).is_some()
    }

    fn set_visible(&mut self, container: &str, visible: bool) -> bool {
        match self.containers.iter_mut().find(|c| c.name == container) {
            Some(container) => {
                container.visible = visible;
                true
            }
            None => false,
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn set_enabled(&mut self, control: &str, enabled: bool) -> bool {
        match self.control_mut(control) {
            Some(control) => {
                control.enabled = enabled;
                true
            }
            None => false,
        }
    }

    fn field_value(&self, name: &str) -> Option<String> {
        self.control(name).map(|c| c.value.clone())
    }

    fn set_field_value(&mut self, name: &str, value: &str) -> bool {
        match self.control_mut(name) {
            Some(control) => {
                control.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn set_field_error(&mut self, name: &str, message: Option<&str>) -> bool {
        match self.control_mut(name) {
            Some(control) => {
                control.error = message.map(str::to_string);
                true
            }
            None => false,
        }
    }

    fn announce(&mut self, message: &str) {
        self.announcements.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> MemorySurface {
        let mut s = MemorySurface::new();
        s.add_container("panel", None)
            .add_container("step-1", Some("panel"))
            .add_container("step-2", Some("panel"));
        s.add_control("step-1", "name")
            .add_control("step-2", "email")
            .add_control("panel", "next")
            .add_static("panel", "progress");
        s
    }

    #[test]
    fn test_focusables_follow_insertion_order() {
        let s = surface();
        assert_eq!(s.focusables("panel"), ["name", "email", "next"]);
        assert_eq!(s.focusables("step-1"), ["name"]);
    }

    #[test]
    fn test_hidden_containers_exclude_descendants() {
        let mut s = surface();
        s.set_visible("step-2", false);
        assert_eq!(s.focusables("panel"), ["name", "next"]);

        s.set_visible("panel", false);
        assert!(s.focusables("panel").is_empty());
        assert!(!s.is_visible("step-1"));
    }

    #[test]
    fn test_disabled_controls_drop_out_of_tab_order() {
        let mut s = surface();
        assert!(s.set_enabled("next", false));
        assert_eq!(s.focusables("panel"), ["name", "email"]);
    }

    #[test]
    fn test_focus_refuses_unknown_and_static() {
        let mut s = surface();
        assert!(s.focus("name"));
        assert_eq!(s.focused().as_deref(), Some("name"));

        assert!(!s.focus("progress"));
        assert!(!s.focus("missing"));
        assert_eq!(s.focused().as_deref(), Some("name"));
    }

    #[test]
    fn test_removed_control_loses_focus() {
        let mut s = surface();
        s.focus("email");
        s.remove_control("email");
        assert!(s.focused().is_none());
        assert!(!s.contains("email"));
    }

    #[test]
    fn test_field_values_and_errors() {
        let mut s = surface();
        assert!(s.set_field_value("name", "Ada"));
        assert_eq!(s.field_value("name").as_deref(), Some("Ada"));

        assert!(s.set_field_error("name", Some("Too short")));
        assert_eq!(s.field_error("name"), Some("Too short"));
        assert!(s.set_field_error("name", None));
        assert_eq!(s.field_error("name"), None);

        assert!(!s.set_field_value("missing", "x"));
    }
}
