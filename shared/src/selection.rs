use crate::scene::BuildingScene;

/// Selected and hovered building ids. Both refer to scene entries by id, never own them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
    hovering: Option<String>,
}

impl Selection {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovering(&self) -> Option<&str> {
        self.hovering.as_deref()
    }

    /// Select a building, clearing the flag on any previous selection.
    /// Empty ids and ids missing from the scene are ignored. Returns whether anything changed.
    pub fn select_id<I>(&mut self, scene: &mut BuildingScene<I>, id: &str) -> bool {
        if id.is_empty() || !scene.contains(id) {
            return false;
        }
        if self.selected.as_deref() == Some(id) {
            return false;
        }
        if let Some(prev) = self.selected.take()
            && let Some(rb) = scene.get_mut(&prev)
        {
            rb.is_selected = false;
        }
        if let Some(rb) = scene.get_mut(id) {
            rb.is_selected = true;
        }
        self.selected = Some(id.to_string());
        true
    }

    /// Clear the selection. Returns `false` when nothing was selected.
    pub fn deselect<I>(&mut self, scene: &mut BuildingScene<I>) -> bool {
        let Some(prev) = self.selected.take() else {
            return false;
        };
        if let Some(rb) = scene.get_mut(&prev) {
            rb.is_selected = false;
        }
        true
    }

    /// Returns whether the hovered id changed.
    pub fn set_hovering(&mut self, id: Option<&str>) -> bool {
        if self.hovering.as_deref() == id {
            return false;
        }
        self.hovering = id.map(str::to_string);
        true
    }
}
