use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Expansion state of a branch node.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BranchState {
    /// Children are visible.
    #[default]
    Expanded,
    /// Children are hidden.
    Collapsed,
}

impl BranchState {
    /// Flip between expanded and collapsed.
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    /// Return the opposite state.
    pub fn toggled(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }

    pub fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }
}

/// Trait implemented by payload records consumable by this crate.
///
/// Elements arrive as a flat list where each record points at its parent by
/// id. A `None` parent is the root sentinel: those elements become children
/// of the synthetic root returned by [`TreeElement::root_element`].
pub trait TreeElement: Clone {
    /// Unique identity of the element.
    type Id: Clone + Eq + Hash + Debug;

    /// Identity of this element.
    fn id(&self) -> &Self::Id;
    /// Identity of the logical parent, `None` for top-level elements.
    fn parent_id(&self) -> Option<&Self::Id>;
    /// Sibling ordering key. Ties keep input order.
    fn rank(&self) -> i64;
    /// Expansion state applied when the element becomes a branch.
    fn initial_state(&self) -> BranchState;
    /// Payload of the invisible root wrapping the top level.
    fn root_element() -> Self;
}
