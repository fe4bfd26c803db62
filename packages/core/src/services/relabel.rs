//! Relabeling Plans
//!
//! Pure interval arithmetic for every structural mutation. Each function takes
//! the pre-mutation bounds it needs and returns the [`Shift`]s that restore a
//! dense, well-nested labeling once the mutation's insert or delete has been
//! applied. Nothing here touches a store.
//!
//! All shifts of one plan are meant for a single `apply_shifts` call, so they
//! are matched against the same snapshot of bounds.

use crate::db::{Shift, Span};
use crate::models::Node;

/// Bounds of the node appended as the last child of `parent`
pub fn appended_child(parent: &Node) -> (i64, i64) {
    (parent.right, parent.right + 1)
}

/// Open a 2-wide gap at `parent.right` for a new last child
///
/// Every `right >= parent.right` moves by +2 (the parent and its ancestors
/// grow, later nodes slide), every `left > parent.right` moves by +2.
pub fn insert_gap(parent: &Node) -> Vec<Shift> {
    vec![
        Shift::right(Span::at_least(parent.right), 2),
        Shift::left(Span::at_least(parent.right + 1), 2),
    ]
}

/// Close the hole left by removing `node` and all of its descendants
pub fn close_subtree_gap(node: &Node) -> Vec<Shift> {
    let width = node.width();
    let after = Span::at_least(node.right + 1);
    vec![Shift::right(after, -width), Shift::left(after, -width)]
}

/// Splice the children of the removed `node` up one level
///
/// Bounds inside the node move by -1 (they lose the node's `left`), bounds
/// after it move by -2 (they lose both of its bounds).
pub fn promote_children(node: &Node) -> Vec<Shift> {
    let inside = Span::new(node.left + 1, node.right - 1);
    let after = Span::at_least(node.right + 1);
    vec![
        Shift::left(inside, -1),
        Shift::right(inside, -1),
        Shift::left(after, -2),
        Shift::right(after, -2),
    ]
}

/// Make `origin` the last child of `new_parent`
///
/// The caller must have rejected a `new_parent` inside (or equal to) `origin`.
/// Two spans move: the moving subtree itself and the gap between it and the
/// new parent's right bound, which slides the opposite way by the subtree's
/// width. No-op shifts are dropped.
pub fn move_subtree(origin: &Node, new_parent: &Node) -> Vec<Shift> {
    let width = origin.width();
    let subtree = Span::new(origin.left, origin.right);

    let (gap, gap_delta, subtree_delta) = if new_parent.right < origin.left {
        (
            Span::new(new_parent.right, origin.left - 1),
            width,
            new_parent.right - origin.left,
        )
    } else {
        (
            Span::new(origin.right + 1, new_parent.right - 1),
            -width,
            new_parent.right - origin.right - 1,
        )
    };

    [
        Shift::left(gap, gap_delta),
        Shift::right(gap, gap_delta),
        Shift::left(subtree, subtree_delta),
        Shift::right(subtree, subtree_delta),
    ]
    .into_iter()
    .filter(|s| !s.is_noop())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{shifted, Bound};

    fn apply(nodes: &[Node], shifts: &[Shift]) -> Vec<(i64, i64)> {
        nodes
            .iter()
            .map(|n| {
                (
                    shifted(n.left, Bound::Left, shifts),
                    shifted(n.right, Bound::Right, shifts),
                )
            })
            .collect()
    }

    // A[1,8] -> B[2,3], C[4,7] -> D[5,6]
    fn sample() -> Vec<Node> {
        vec![
            Node::new(1, "A", 1, 8),
            Node::new(2, "B", 2, 3),
            Node::new(3, "C", 4, 7),
            Node::new(4, "D", 5, 6),
        ]
    }

    #[test]
    fn test_insert_gap_appends_last_child() {
        let nodes = sample();
        let parent = &nodes[0];

        assert_eq!(appended_child(parent), (8, 9));
        assert_eq!(
            apply(&nodes, &insert_gap(parent)),
            vec![(1, 10), (2, 3), (4, 7), (5, 6)]
        );

        // Under B: B and every ancestor grow, C and D slide right
        assert_eq!(appended_child(&nodes[1]), (3, 4));
        assert_eq!(
            apply(&nodes, &insert_gap(&nodes[1])),
            vec![(1, 10), (2, 5), (6, 9), (7, 8)]
        );
    }

    #[test]
    fn test_close_subtree_gap() {
        let nodes = sample();
        let shifts = close_subtree_gap(&nodes[1]);
        let remaining = [nodes[0].clone(), nodes[2].clone(), nodes[3].clone()];
        assert_eq!(apply(&remaining, &shifts), vec![(1, 6), (2, 5), (3, 4)]);
    }

    #[test]
    fn test_promote_children() {
        let nodes = sample();
        let shifts = promote_children(&nodes[2]);
        let remaining = [nodes[0].clone(), nodes[1].clone(), nodes[3].clone()];
        assert_eq!(apply(&remaining, &shifts), vec![(1, 6), (2, 3), (4, 5)]);
    }

    #[test]
    fn test_move_before_origin() {
        // Move C under B: A[1,8] -> B[2,7] -> C[3,6] -> D[4,5]
        let nodes = sample();
        let shifts = move_subtree(&nodes[2], &nodes[1]);
        assert_eq!(
            apply(&nodes, &shifts),
            vec![(1, 8), (2, 7), (3, 6), (4, 5)]
        );
    }

    #[test]
    fn test_move_after_origin() {
        // Move B under D: A[1,8] -> C[2,7] -> D[3,6] -> B[4,5]
        let nodes = sample();
        let shifts = move_subtree(&nodes[1], &nodes[3]);
        assert_eq!(
            apply(&nodes, &shifts),
            vec![(1, 8), (4, 5), (2, 7), (3, 6)]
        );
    }

    #[test]
    fn test_move_under_current_parent_reappends() {
        // Move B under A again: B becomes the last child
        let nodes = sample();
        let shifts = move_subtree(&nodes[1], &nodes[0]);
        assert_eq!(
            apply(&nodes, &shifts),
            vec![(1, 8), (6, 7), (2, 5), (3, 4)]
        );
    }

    #[test]
    fn test_move_last_child_under_parent_is_noop() {
        let nodes = sample();
        assert!(move_subtree(&nodes[2], &nodes[0]).is_empty());
    }
}
