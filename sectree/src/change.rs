use serde::Serialize;

use crate::flatten::flatten;
use crate::node::Node;
use crate::section::Section;

/// Position of a row inside the section list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

/// Row and section edits produced by one toggle.
///
/// Removals address the layout before the toggle, insertions the layout
/// after it, which is the order list widgets expect in a batch update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditBatch {
    pub insert_rows: Vec<IndexPath>,
    pub remove_rows: Vec<IndexPath>,
    pub insert_sections: Vec<usize>,
    pub remove_sections: Vec<usize>,
}

impl EditBatch {
    pub fn is_empty(&self) -> bool {
        self.insert_rows.is_empty()
            && self.remove_rows.is_empty()
            && self.insert_sections.is_empty()
            && self.remove_sections.is_empty()
    }

    /// Swap insertions and removals.
    pub fn reversed(self) -> Self {
        Self {
            insert_rows: self.remove_rows,
            remove_rows: self.insert_rows,
            insert_sections: self.remove_sections,
            remove_sections: self.insert_sections,
        }
    }
}

/// Visible change caused by a toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeDescriptor {
    /// Nothing visible changes.
    #[default]
    None,
    /// Apply the batch to the list.
    Edit(EditBatch),
}

impl ChangeDescriptor {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn edit(&self) -> Option<&EditBatch> {
        match self {
            Self::None => None,
            Self::Edit(batch) => Some(batch),
        }
    }
}

impl From<EditBatch> for ChangeDescriptor {
    fn from(batch: EditBatch) -> Self {
        if batch.is_empty() {
            Self::None
        } else {
            Self::Edit(batch)
        }
    }
}

/// Derive the change for `node`, just toggled, displayed at `section`.
///
/// The subtree is always analysed in its expanded form; the direction only
/// decides whether the edits are insertions or removals. `expanded_layout` is
/// the full section list in which `node` is expanded: the list after the
/// toggle when expanding, before it when collapsing.
pub(crate) fn describe_toggle<E: Clone>(
    node: &Node<E>,
    section: usize,
    expanded_layout: &[Section<E>],
) -> ChangeDescriptor {
    let Some(state) = node.state() else {
        return ChangeDescriptor::None;
    };

    let local = if state.is_expanded() {
        flatten(node, true)
    } else {
        flatten(&node.toggled(), true)
    };
    let Some((own, nested)) = local.split_first() else {
        return ChangeDescriptor::None;
    };

    let mut batch = EditBatch {
        insert_rows: row_paths(section, own.row_count()),
        ..EditBatch::default()
    };

    if let Some(last) = nested.last() {
        batch.insert_sections =
            (section + 1..=section + nested.len()).collect();

        // Rows of ancestors appended after the subtree's last section move
        // into `section` while the subtree is collapsed.
        let carried = expanded_layout
            .get(section + nested.len())
            .map_or(0, |global| {
                global.row_count().saturating_sub(last.row_count())
            });
        batch.remove_rows = row_paths(section, carried);
    }

    let batch = if state.is_expanded() {
        batch
    } else {
        batch.reversed()
    };
    batch.into()
}

fn row_paths(section: usize, count: usize) -> Vec<IndexPath> {
    (0..count).map(|row| IndexPath::new(section, row)).collect()
}
