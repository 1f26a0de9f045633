use slint::{Model, VecModel};
use std::collections::HashSet;

/// Set of selected node or link ids.
///
/// The editor keeps one of these for nodes and one for links. Both persist
/// across frames and may be edited by the host between frames.
#[derive(Debug, Default, Clone)]
pub struct SelectionManager {
    selected: HashSet<i32>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a click on `id`.
    ///
    /// Without the multi-select modifier a click on an unselected item
    /// replaces the selection; a click on an already selected item keeps the
    /// selection so the whole group can be dragged. With the modifier the
    /// item is toggled.
    pub fn handle_click(&mut self, id: i32, multi_select: bool) {
        if multi_select {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        } else if !self.selected.contains(&id) {
            self.selected.clear();
            self.selected.insert(id);
        }
    }

    pub fn select(&mut self, id: i32) {
        self.selected.insert(id);
    }

    pub fn deselect(&mut self, id: i32) -> bool {
        self.selected.remove(&id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the current selection with a new set of IDs
    ///
    /// Box selection rebuilds the selection this way every frame.
    pub fn replace_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = i32>,
    {
        self.selected.clear();
        self.selected.extend(ids);
    }

    /// Drop every id for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(i32) -> bool) {
        self.selected.retain(|&id| keep(id));
    }

    pub fn contains(&self, id: i32) -> bool {
        self.selected.contains(&id)
    }

    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, i32> {
        self.selected.iter()
    }

    /// Selected ids in ascending order.
    pub fn sorted_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Mirror the selection into a Slint `VecModel` (ascending order).
    pub fn sync_to_model(&self, model: &VecModel<i32>) {
        model.set_vec(self.sorted_ids());
    }

    /// Take the selection from any Slint model, e.g. one edited by the UI.
    pub fn sync_from_model(&mut self, model: &dyn Model<Data = i32>) {
        self.selected.clear();
        for i in 0..model.row_count() {
            if let Some(id) = model.row_data(i) {
                self.selected.insert(id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
