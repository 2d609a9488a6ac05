//! Viewer state read by per-frame material modulation.
//!
//! Synthesis and modulation only read a [`ViewState`]. The transition
//! methods exist for the host (input handling) and for tests.

use serde::{Deserialize, Serialize};

use crate::organ::{OrganId, OrganSystem};

/// Bits of the seven systems.
const SYSTEM_MASK: u8 = 0b0111_1111;

/// Set of visible anatomical systems.
///
/// Serialized as its bit mask; bits that name no system are dropped on load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct SystemSet(u8);

impl From<u8> for SystemSet {
    fn from(bits: u8) -> Self {
        Self(bits & SYSTEM_MASK)
    }
}

impl From<SystemSet> for u8 {
    fn from(set: SystemSet) -> Self {
        set.0
    }
}

impl SystemSet {
    /// Every system.
    #[must_use]
    pub const fn all() -> Self {
        Self(SYSTEM_MASK)
    }

    /// No systems.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether `system` is in the set.
    #[must_use]
    pub const fn contains(self, system: OrganSystem) -> bool {
        self.0 & system.bit() != 0
    }

    /// Add a system.
    pub fn insert(&mut self, system: OrganSystem) {
        self.0 |= system.bit();
    }

    /// Remove a system.
    pub fn remove(&mut self, system: OrganSystem) {
        self.0 &= !system.bit();
    }

    /// Flip membership of a system.
    pub fn toggle(&mut self, system: OrganSystem) {
        self.0 ^= system.bit();
    }

    /// Number of systems in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in display order.
    pub fn iter(self) -> impl Iterator<Item = OrganSystem> {
        OrganSystem::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl Default for SystemSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<OrganSystem> for SystemSet {
    fn from_iter<I: IntoIterator<Item = OrganSystem>>(iter: I) -> Self {
        let mut set = Self::empty();
        for system in iter {
            set.insert(system);
        }
        set
    }
}

/// Selection, visibility and display flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Organ the user clicked, if any
    pub selected: Option<OrganId>,
    /// Organ under the pointer, if any
    pub hovered: Option<OrganId>,
    /// Systems currently shown
    pub visible_systems: SystemSet,
    /// Show the translucent body shell
    pub show_body: bool,
    /// Show ribs and spine
    pub show_skeleton: bool,
    /// X-ray display mode
    pub xray: bool,
    /// Slowly orbit the camera
    pub auto_rotate: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected: None,
            hovered: None,
            visible_systems: SystemSet::all(),
            show_body: true,
            show_skeleton: true,
            xray: false,
            auto_rotate: true,
        }
    }
}

impl ViewState {
    /// Builder: start with `organ` selected.
    #[must_use]
    pub fn with_selected(mut self, organ: OrganId) -> Self {
        self.selected = Some(organ);
        self
    }

    /// Builder: set x-ray mode.
    #[must_use]
    pub fn with_xray(mut self, xray: bool) -> Self {
        self.xray = xray;
        self
    }

    /// Select an organ. Selecting the current selection clears it.
    pub fn select(&mut self, organ: Option<OrganId>) {
        self.selected = if self.selected == organ { None } else { organ };
    }

    /// Set or clear the hovered organ.
    pub fn hover(&mut self, organ: Option<OrganId>) {
        self.hovered = organ;
    }

    /// Show or hide one system.
    pub fn toggle_system(&mut self, system: OrganSystem) {
        self.visible_systems.toggle(system);
    }

    /// Show or hide the body shell.
    pub fn toggle_body(&mut self) {
        self.show_body = !self.show_body;
    }

    /// Show or hide the skeleton.
    pub fn toggle_skeleton(&mut self) {
        self.show_skeleton = !self.show_skeleton;
    }

    /// Switch x-ray mode.
    pub fn toggle_xray(&mut self) {
        self.xray = !self.xray;
    }

    /// Switch camera auto-rotation.
    pub fn toggle_auto_rotate(&mut self) {
        self.auto_rotate = !self.auto_rotate;
    }

    /// Restore the defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the organ's system is shown.
    #[must_use]
    pub fn is_organ_visible(&self, organ: OrganId) -> bool {
        self.visible_systems.contains(organ.system())
    }

    /// Whether `organ` is selected or hovered.
    #[must_use]
    pub fn is_highlighted(&self, organ: OrganId) -> bool {
        self.selected == Some(organ) || self.hovered == Some(organ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let view = ViewState::default();
        assert_eq!(view.visible_systems.len(), 7);
        assert!(view.show_body && view.show_skeleton && view.auto_rotate);
        assert!(!view.xray);
        assert!(view.selected.is_none());
    }

    #[test]
    fn test_select_toggles() {
        let mut view = ViewState::default();
        view.select(Some(OrganId::Heart));
        assert_eq!(view.selected, Some(OrganId::Heart));
        view.select(Some(OrganId::Liver));
        assert_eq!(view.selected, Some(OrganId::Liver));
        view.select(Some(OrganId::Liver));
        assert_eq!(view.selected, None);
    }

    #[test]
    fn test_system_visibility() {
        let mut view = ViewState::default();
        view.toggle_system(OrganSystem::Digestive);
        assert!(!view.is_organ_visible(OrganId::Liver));
        assert!(view.is_organ_visible(OrganId::Heart));
        view.toggle_system(OrganSystem::Digestive);
        assert!(view.is_organ_visible(OrganId::Liver));
    }

    #[test]
    fn test_system_set_iter_and_collect() {
        let set: SystemSet = [OrganSystem::Urinary, OrganSystem::Nervous].into_iter().collect();
        let members: Vec<_> = set.iter().collect();
        assert_eq!(members, vec![OrganSystem::Nervous, OrganSystem::Urinary]);
        assert!(SystemSet::empty().is_empty());
    }

    #[test]
    fn test_system_set_load_drops_unknown_bits() {
        let set: SystemSet = serde_json::from_str("255").unwrap();
        assert_eq!(set, SystemSet::all());
        assert_eq!(set.len(), set.iter().count());

        let json = serde_json::to_string(&ViewState::default()).unwrap();
        let view: ViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn test_reset() {
        let mut view = ViewState::default().with_selected(OrganId::Brain).with_xray(true);
        view.toggle_body();
        view.reset();
        assert_eq!(view, ViewState::default());
    }
}
