use std::slice;

use crate::node::{Node, NodeRef};
use crate::section::Section;

/// Flatten a tree into an ordered list of sections.
///
/// Every branch contributes one section, in depth-first pre-order. Leaves
/// contribute rows to the most recently emitted section: the parent's own
/// section until a nested section appears, afterwards the last section of the
/// preceding sibling subtree.
///
/// With `only_expanded` set, a collapsed branch yields a single section with
/// no rows and its subtree is not visited at all.
///
/// A leaf passed as `node` produces no sections.
pub fn flatten<E: Clone>(
    node: &Node<E>,
    only_expanded: bool,
) -> Vec<Section<E>> {
    let mut sections = Vec::new();
    let mut pending: Vec<slice::Iter<'_, NodeRef<E>>> = Vec::new();
    if let Some(children) = push_node(node, only_expanded, &mut sections) {
        pending.push(children.iter());
    }

    while let Some(children) = pending.last_mut() {
        match children.next() {
            Some(child) => {
                if let Some(nested) =
                    push_node(child, only_expanded, &mut sections)
                {
                    pending.push(nested.iter());
                }
            },
            None => {
                pending.pop();
            },
        }
    }

    sections
}

/// Flatten `root` and drop the synthetic root's own section.
///
/// Returns an empty list when flattening yields at most one section.
pub fn root_sections<E: Clone>(
    root: &Node<E>,
    only_expanded: bool,
) -> Vec<Section<E>> {
    let mut sections = flatten(root, only_expanded);
    if sections.len() <= 1 {
        return Vec::new();
    }

    sections.remove(0);
    sections
}

/// Emit `node` into `sections` and return the children still to visit.
fn push_node<'a, E: Clone>(
    node: &'a Node<E>,
    only_expanded: bool,
    sections: &mut Vec<Section<E>>,
) -> Option<&'a [NodeRef<E>]> {
    match node {
        Node::Leaf(data) => {
            if let Some(section) = sections.last_mut() {
                section.rows.push(data.clone());
            }
            None
        },
        Node::Branch {
            data,
            children,
            state,
        } => {
            sections.push(Section::new(data.clone(), *state));
            if only_expanded && !state.is_expanded() {
                return None;
            }
            Some(children.as_slice())
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{flatten, root_sections};
    use crate::builder::build;
    use crate::element::BranchState;
    use crate::element::testing::{Item, ids, nested_items};
    use crate::node::Node;
    use crate::section::Section;

    fn layout(sections: &[Section<Item>]) -> Vec<(u32, Vec<u32>)> {
        sections
            .iter()
            .map(|section| (section.header.id, ids(&section.rows)))
            .collect()
    }

    fn collapse(items: &mut [Item], targets: &[u32]) {
        for item in items.iter_mut() {
            if targets.contains(&item.id) {
                item.state = BranchState::Collapsed;
            }
        }
    }

    #[test]
    fn given_empty_tree_when_flattened_then_no_sections_remain() {
        let root = build(Vec::<Item>::new()).expect("builds");

        assert_eq!(flatten(&root, true).len(), 1);
        assert!(root_sections(&root, true).is_empty());
    }

    #[test]
    fn given_leaf_when_flattened_then_it_yields_no_section() {
        let leaf = Node::leaf(Item::new(1, None, 0));
        assert!(flatten(&leaf, true).is_empty());
    }

    #[test]
    fn given_expanded_fixture_when_flattened_then_sections_match() {
        let root = build(nested_items()).expect("builds");

        let sections = root_sections(&root, true);

        assert_eq!(
            layout(&sections),
            vec![
                (0, vec![]),
                (1, vec![3]),
                (4, vec![6]),
                (2, vec![]),
                (5, vec![7]),
            ]
        );
    }

    #[test]
    fn given_collapsed_branches_when_flattened_then_subtrees_are_hidden() {
        let mut items = nested_items();
        collapse(&mut items, &[2, 4]);
        let root = build(items).expect("builds");

        let sections = root_sections(&root, true);

        assert_eq!(
            layout(&sections),
            vec![(0, vec![]), (1, vec![3]), (4, vec![]), (2, vec![])]
        );
        assert_eq!(sections[2].state, BranchState::Collapsed);
        assert_eq!(sections[1].state, BranchState::Expanded);
    }

    #[test]
    fn given_rows_after_nested_branch_when_flattened_then_they_join_it() {
        let items = vec![
            Item::new(0, None, 0),
            Item::new(1, Some(0), 0),
            Item::new(11, Some(1), 0),
            Item::new(12, Some(1), 1),
            Item::new(2, Some(0), 1),
        ];
        let root = build(items).expect("builds");

        let sections = root_sections(&root, true);

        assert_eq!(layout(&sections), vec![(0, vec![]), (1, vec![11, 12, 2])]);
    }

    #[test]
    fn given_leading_rows_when_flattened_then_parent_owns_them() {
        let items = vec![
            Item::new(0, None, 0),
            Item::new(10, Some(0), 0),
            Item::new(1, Some(0), 1),
            Item::new(11, Some(1), 0),
            Item::new(20, Some(0), 2),
        ];
        let root = build(items).expect("builds");

        let sections = root_sections(&root, true);

        assert_eq!(layout(&sections), vec![(0, vec![10]), (1, vec![11, 20])]);
    }

    #[test]
    fn given_collapsed_branch_with_deep_subtree_then_one_empty_section() {
        let mut items = vec![Item::new(0, None, 0).collapsed()];
        for depth in 1..50u32 {
            items.push(Item::new(depth, Some(depth - 1), 0));
            items.push(Item::new(1000 + depth, Some(depth - 1), 1));
        }
        let root = build(items).expect("builds");

        let sections = root_sections(&root, true);

        assert_eq!(sections.len(), 1);
        assert!(sections[0].rows.is_empty());
        assert_eq!(sections[0].state, BranchState::Collapsed);
    }

    #[test]
    fn given_collapsed_tree_when_flattened_fully_then_all_rows_appear() {
        let mut collapsed = nested_items();
        collapse(&mut collapsed, &[0, 1, 2, 4, 5]);
        let expanded_root = build(nested_items()).expect("builds");
        let collapsed_root = build(collapsed).expect("builds");

        let full = root_sections(&collapsed_root, false);
        let visible = root_sections(&expanded_root, true);

        assert_eq!(full.len(), 5);
        assert_eq!(layout(&full), layout(&visible));
        assert_eq!(full[0].state, BranchState::Collapsed);
    }

    #[test]
    fn given_any_input_order_when_flattened_then_ranks_decide_layout() {
        let items = nested_items();
        let root = build(items.clone()).expect("builds");
        let expected = layout(&root_sections(&root, false));

        let mut reversed = items.clone();
        reversed.reverse();
        let mut rotated = items.clone();
        rotated.rotate_left(3);
        let mut interleaved: Vec<Item> =
            items.iter().step_by(2).cloned().collect();
        interleaved.extend(items.iter().skip(1).step_by(2).cloned());

        for permutation in [reversed, rotated, interleaved] {
            let root = build(permutation).expect("builds");
            assert_eq!(layout(&root_sections(&root, false)), expected);
        }
    }

    #[test]
    fn given_unmutated_tree_when_flattened_twice_then_results_are_equal() {
        let root = build(nested_items()).expect("builds");

        assert_eq!(root_sections(&root, true), root_sections(&root, true));
        assert_eq!(flatten(&root, false), flatten(&root, false));
    }

    #[test]
    fn given_sections_when_scanned_then_parents_precede_children() {
        let mut items = nested_items();
        items.push(Item::new(8, Some(7), 0));
        items.push(Item::new(9, Some(3), 0));
        let root = build(items).expect("builds");
        let sections = root_sections(&root, true);

        let positions: HashMap<u32, usize> = sections
            .iter()
            .enumerate()
            .map(|(index, section)| (*section.id(), index))
            .collect();

        for (index, section) in sections.iter().enumerate() {
            if let Some(parent) = section.parent_id() {
                let parent_index = positions
                    .get(parent)
                    .expect("parent section is materialized");
                assert!(*parent_index < index);
            }
        }
    }
}
