use crate::entity::EntityId;

/// Interaction state of a pickable node, in precedence order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Normal,
    Hovered,
    Selected,
}

/// Result of a selection mutation: which node lost and which gained selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SelectionChange {
    pub deselected: Option<EntityId>,
    pub selected: Option<EntityId>,
}

/// Exclusive selection plus a single hover slot.
///
/// At most one node is selected at any time; selecting another first
/// deselects the current one. Selected takes precedence over hovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<EntityId>,
    hovered: Option<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    /// Click semantics: clicking the selected node deselects it, clicking any
    /// other node moves the selection to it.
    pub fn toggle(&mut self, entity: EntityId) -> SelectionChange {
        match self.selected {
            Some(current) if current == entity => {
                self.selected = None;
                SelectionChange {
                    deselected: Some(current),
                    selected: None,
                }
            }
            previous => {
                self.selected = Some(entity);
                SelectionChange {
                    deselected: previous,
                    selected: Some(entity),
                }
            }
        }
    }

    pub fn clear(&mut self) -> SelectionChange {
        SelectionChange {
            deselected: self.selected.take(),
            selected: None,
        }
    }

    /// Move the hover slot; returns the previously hovered node if it changed.
    pub fn set_hovered(&mut self, entity: Option<EntityId>) -> Option<Option<EntityId>> {
        if self.hovered == entity {
            return None;
        }
        Some(std::mem::replace(&mut self.hovered, entity))
    }

    pub fn state_of(&self, entity: EntityId) -> InteractionState {
        if self.selected == Some(entity) {
            InteractionState::Selected
        } else if self.hovered == Some(entity) {
            InteractionState::Hovered
        } else {
            InteractionState::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionState, Selection};
    use crate::entity::EntityId;

    fn e(idx: u32) -> EntityId {
        EntityId::from_index(idx)
    }

    #[test]
    fn toggle_same_entity_deselects() {
        let mut s = Selection::new();
        let c = s.toggle(e(1));
        assert_eq!(c.selected, Some(e(1)));
        assert_eq!(c.deselected, None);
        let c = s.toggle(e(1));
        assert_eq!(c.selected, None);
        assert_eq!(c.deselected, Some(e(1)));
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn toggle_other_entity_moves_selection() {
        let mut s = Selection::new();
        s.toggle(e(1));
        let c = s.toggle(e(2));
        assert_eq!(c.deselected, Some(e(1)));
        assert_eq!(c.selected, Some(e(2)));
        assert_eq!(s.state_of(e(1)), InteractionState::Normal);
        assert_eq!(s.state_of(e(2)), InteractionState::Selected);
    }

    #[test]
    fn selected_beats_hovered() {
        let mut s = Selection::new();
        s.toggle(e(3));
        assert_eq!(s.set_hovered(Some(e(3))), Some(None));
        assert_eq!(s.set_hovered(Some(e(3))), None);
        assert_eq!(s.state_of(e(3)), InteractionState::Selected);
        s.clear();
        assert_eq!(s.state_of(e(3)), InteractionState::Hovered);
    }

    #[test]
    fn at_most_one_selected_after_any_clicks() {
        let mut s = Selection::new();
        for idx in [1, 2, 2, 5, 1, 1, 7, 3] {
            s.toggle(e(idx));
            let selected = (0..10)
                .filter(|i| s.state_of(e(*i)) == InteractionState::Selected)
                .count();
            assert!(selected <= 1);
        }
    }
}
