use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use crate::element::{BranchState, TreeElement};
use crate::error::{Result, TreeError, display_id};
use crate::node::{Node, NodeRef};

type SiblingGroups<E> = HashMap<Option<<E as TreeElement>::Id>, Vec<E>>;

/// Build a rooted tree from a flat list of parent-referencing elements.
///
/// Elements are grouped by parent id and every group is sorted by
/// [`TreeElement::rank`] (stable, so equal ranks keep input order). An element
/// with children becomes a branch in its [`TreeElement::initial_state`], any
/// other element becomes a leaf.
///
/// The returned root is always an expanded branch around
/// [`TreeElement::root_element`], even for empty input.
///
/// # Errors
/// - [`TreeError::DuplicateId`] when two elements share an id;
/// - [`TreeError::DanglingParent`] when a parent id is not among the input;
/// - [`TreeError::Unreachable`] when elements never connect to the root.
pub fn build<E: TreeElement>(elements: Vec<E>) -> Result<Node<E>> {
    let total = elements.len();
    let mut known = HashSet::with_capacity(total);
    for element in &elements {
        if !known.insert(element.id().clone()) {
            return Err(TreeError::DuplicateId {
                id: display_id(element.id()),
            });
        }
    }

    let mut groups: SiblingGroups<E> = HashMap::new();
    for element in elements {
        if let Some(parent) = element.parent_id() {
            if !known.contains(parent) {
                return Err(TreeError::DanglingParent {
                    id: display_id(element.id()),
                    parent: display_id(parent),
                });
            }
        }
        groups
            .entry(element.parent_id().cloned())
            .or_default()
            .push(element);
    }

    for siblings in groups.values_mut() {
        siblings.sort_by_key(E::rank);
    }

    let children = resolve_children(&mut groups);

    if !groups.is_empty() {
        let mut orphans: Vec<String> = groups
            .values()
            .flatten()
            .map(|element| display_id(element.id()))
            .collect();
        orphans.sort();
        return Err(TreeError::Unreachable {
            count: orphans.len(),
            ids: orphans.join(", "),
        });
    }

    debug!(
        "built tree with {} top-level node(s) from {total} element(s)",
        children.len()
    );

    Ok(Node::Branch {
        data: E::root_element(),
        children,
        state: BranchState::Expanded,
    })
}

/// Element whose children are being resolved.
struct Pending<E: TreeElement> {
    element: Option<E>,
    siblings: std::vec::IntoIter<E>,
    children: Vec<NodeRef<E>>,
}

impl<E: TreeElement> Pending<E> {
    fn new(element: Option<E>, groups: &mut SiblingGroups<E>) -> Self {
        let key = element.as_ref().map(|element| element.id().clone());
        let siblings = groups.remove(&key).unwrap_or_default();
        Self {
            element,
            children: Vec::with_capacity(siblings.len()),
            siblings: siblings.into_iter(),
        }
    }
}

/// Resolve the top-level nodes, depth-first with an explicit stack.
///
/// Every visited group is removed from `groups`, so whatever remains is
/// unreachable from the root.
fn resolve_children<E: TreeElement>(
    groups: &mut SiblingGroups<E>,
) -> Vec<NodeRef<E>> {
    let mut stack = vec![Pending::new(None, groups)];

    while let Some(frame) = stack.last_mut() {
        if let Some(element) = frame.siblings.next() {
            stack.push(Pending::new(Some(element), groups));
            continue;
        }

        let Some(done) = stack.pop() else {
            break;
        };
        let Some(element) = done.element else {
            return done.children;
        };
        let node = if done.children.is_empty() {
            Node::Leaf(element)
        } else {
            Node::Branch {
                state: element.initial_state(),
                data: element,
                children: done.children,
            }
        };
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Arc::new(node));
        }
    }

    Vec::new()
}
