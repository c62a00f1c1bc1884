use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};

use crate::builder::build;
use crate::change::{ChangeDescriptor, describe_toggle};
use crate::element::{BranchState, TreeElement};
use crate::error::{Result, TreeError, display_id};
use crate::flatten::root_sections;
use crate::node::{Node, NodeRef};
use crate::section::Section;

/// Outcome of a toggle: the visible change and the section's new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    pub change: ChangeDescriptor,
    pub state: BranchState,
}

/// Tree of elements together with its materialized section list.
///
/// The section list is derived from the tree and replaced as a whole after
/// every toggle.
#[derive(Debug, Clone)]
pub struct SectionTree<E> {
    root: Node<E>,
    sections: Vec<Section<E>>,
}

impl<E: TreeElement> SectionTree<E> {
    /// Build the tree from a flat element list.
    pub fn new(elements: Vec<E>) -> Result<Self> {
        Ok(Self::from_root(build(elements)?))
    }

    /// Wrap an already built tree.
    pub fn from_root(root: Node<E>) -> Self {
        let sections = root_sections(&root, true);
        Self { root, sections }
    }

    pub fn root(&self) -> &Node<E> {
        &self.root
    }

    /// Currently visible sections.
    pub fn sections(&self) -> &[Section<E>] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section<E>> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections of the whole tree, ignoring collapse flags.
    pub fn all_sections(&self) -> Vec<Section<E>> {
        root_sections(&self.root, false)
    }

    /// Find a node by its id path (root-first, synthetic root excluded).
    pub fn find_node(&self, path: &[E::Id]) -> Option<&Node<E>> {
        if path.is_empty() {
            return None;
        }
        self.root.descendant(path)
    }

    /// Resolve the node displayed as section `index`.
    pub fn node_for_section(&self, index: usize) -> Result<&Node<E>> {
        self.check_index(index)?;
        let path = self.section_path(index);
        self.root
            .descendant(&path)
            .ok_or_else(|| TreeError::NodeNotFound {
                id: display_id(self.sections[index].id()),
            })
    }

    /// Flip the expansion state of section `index`.
    ///
    /// Only the nodes on the path from the root to the toggled node are
    /// rebuilt; every other subtree is shared with the previous tree.
    ///
    /// # Errors
    /// - [`TreeError::SectionOutOfRange`] for an invalid `index`;
    /// - [`TreeError::NodeNotFound`] when the section list and the tree
    ///   disagree, which means the section list was not derived from the tree.
    pub fn toggle(&mut self, index: usize) -> Result<Toggled> {
        self.check_index(index)?;

        let path = self.section_path(index);
        trace!("toggle path for section {index}: {path:?}");

        let (root, target) = toggle_node(&self.root, &path)?;
        let sections = root_sections(&root, true);

        let Some(state) = target.state() else {
            return Ok(Toggled {
                change: ChangeDescriptor::None,
                state: self.sections[index].state,
            });
        };

        let expanded_layout = if state.is_expanded() {
            &sections
        } else {
            &self.sections
        };
        let change = describe_toggle(&target, index, expanded_layout);

        debug!(
            "toggled section {index} to {state:?}: {} -> {} section(s)",
            self.sections.len(),
            sections.len()
        );

        self.root = root;
        self.sections = sections;

        Ok(Toggled { change, state })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.sections.len() {
            return Err(TreeError::SectionOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        Ok(())
    }

    /// Ids from the top-level ancestor down to section `index`.
    ///
    /// Every ancestor section precedes its descendants, so only the prefix
    /// before `index` is searched.
    fn section_path(&self, index: usize) -> Vec<E::Id> {
        let lookup: HashMap<&E::Id, &Section<E>> = self.sections[..index]
            .iter()
            .map(|section| (section.id(), section))
            .collect();

        let target = &self.sections[index];
        let mut path = vec![target.id().clone()];
        let mut current = target;
        while let Some(parent) = current.parent_id() {
            path.push(parent.clone());
            match lookup.get(parent) {
                Some(section) => current = section,
                None => break,
            }
        }

        path.reverse();
        path
    }
}

/// Rebuild the spine along `path`, toggling the node at its end.
///
/// Returns the new `root` and the toggled descendant.
fn toggle_node<E: TreeElement>(
    root: &Node<E>,
    path: &[E::Id],
) -> Result<(Node<E>, NodeRef<E>)> {
    let mut spine: Vec<(&Node<E>, usize)> = Vec::with_capacity(path.len());
    let mut current = root;
    for id in path {
        let (index, child) =
            current.find_child(id).ok_or_else(|| TreeError::NodeNotFound {
                id: display_id(id),
            })?;
        spine.push((current, index));
        current = child.as_ref();
    }

    let Some((&(top, top_index), inner)) = spine.split_first() else {
        return Err(TreeError::NodeNotFound {
            id: display_id(root.data().id()),
        });
    };

    let target = Arc::new(current.toggled());
    let mut child = Arc::clone(&target);
    for &(parent, index) in inner.iter().rev() {
        let mut copy = parent.clone();
        copy.replace_child(index, child);
        child = Arc::new(copy);
    }

    let mut root = top.clone();
    root.replace_child(top_index, child);
    Ok((root, target))
}
