use crate::element::{BranchState, TreeElement};

/// One displayable group: a branch header followed by the leaf rows shown
/// directly under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<E> {
    pub header: E,
    pub rows: Vec<E>,
    pub state: BranchState,
}

impl<E> Section<E> {
    pub(crate) fn new(header: E, state: BranchState) -> Self {
        Self {
            header,
            rows: Vec::new(),
            state,
        }
    }

    /// Number of rows displayed under the header.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_expanded(&self) -> bool {
        self.state.is_expanded()
    }
}

impl<E: TreeElement> Section<E> {
    /// Id of the header element.
    pub fn id(&self) -> &E::Id {
        self.header.id()
    }

    /// Id of the header's parent, `None` for top-level sections.
    pub fn parent_id(&self) -> Option<&E::Id> {
        self.header.parent_id()
    }
}
