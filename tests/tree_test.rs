//! Integration tests for tree construction, queries and whole-tree operations.

use rstest::rstest;

use rstree::outline::parse_outline;
use rstree::util::testing;
use rstree::{Cursor, NodeId, Tree, TreeError};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn find(tree: &Tree<String>, value: &str) -> NodeId {
    tree.iter()
        .find(|(_, v)| v.as_str() == value)
        .map(|(id, _)| id)
        .unwrap_or_else(|| panic!("no node {value}"))
}

fn values(tree: &Tree<String>) -> Vec<&str> {
    tree.values().map(String::as_str).collect()
}

fn sample() -> Tree<String> {
    parse_outline(
        "A
  B
  C
    C1
    C2
  D
    F
    G
Z
",
    )
    .unwrap()
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn given_root_with_three_children_when_appending_and_erasing_then_children_follow() {
    let mut tree = Tree::with_root("A");
    let a = tree.first_root().unwrap();
    tree.append_child(a, "B");
    let c = tree.append_child(a, "C");
    tree.append_child(a, "D");

    tree.append_child(a, "E");
    assert_eq!(tree.size(), 5);

    tree.erase(c);
    let children: Vec<&str> = tree.children(a).map(|(_, v)| *v).collect();
    assert_eq!(children, vec!["B", "D", "E"]);
    assert_eq!(tree.size(), 4);
    tree.verify_consistency().unwrap();
}

#[test]
fn given_subtree_when_moving_out_then_parked_and_neighbours_linked() {
    let mut tree = sample();
    let before = tree.size();
    let c = find(&tree, "C");
    let d = find(&tree, "D");
    let below_d: Vec<NodeId> = tree.pre_order_from(d).map(|(id, _)| id).collect();

    let out = tree.move_out(d);

    assert_eq!(out.root(), Some(d));
    assert_eq!(tree[d], "D");
    assert_eq!(tree.size_of(d), 3);
    assert_eq!(tree.size(), before - 3);
    assert_eq!(tree.next_sibling(c), None);
    assert_eq!(tree.last_child(tree.first_root().unwrap()), Some(c));
    assert!(tree.iter().all(|(id, _)| !below_d.contains(&id)));
    assert_eq!(tree.pre_order_from(d).map(|(id, _)| id).collect::<Vec<_>>(), below_d);
    tree.verify_consistency().unwrap();
}

#[test]
fn given_parked_subtree_when_moving_back_in_then_ids_unchanged() {
    let mut tree = sample();
    let d = find(&tree, "D");
    let below_d: Vec<(NodeId, String)> = tree.pre_order_from(d).map(|(id, v)| (id, v.to_string())).collect();
    let size = tree.size();

    let mut out = tree.move_out(d);
    let root = tree.first_root().unwrap();
    assert_eq!(tree.move_in_below(root, &mut out), Some(d));

    assert!(out.is_empty());
    assert_eq!(tree.size(), size);
    let after: Vec<(NodeId, String)> = tree.pre_order_from(d).map(|(id, v)| (id, v.to_string())).collect();
    assert_eq!(after, below_d);
    assert_eq!(tree.parent(d), Some(root));
    tree.verify_consistency().unwrap();
}

#[test]
#[should_panic(expected = "belongs to another tree")]
fn given_id_of_other_tree_when_used_then_rejected() {
    let tree = sample();
    let copy = tree.clone();
    let d = find(&tree, "D");
    assert_eq!(copy.get(d), None);
    assert!(!copy.contains(d));
    assert_eq!(copy[d], "D");
}

// ============================================================
// Queries
// ============================================================

#[test]
fn given_tree_when_walking_pre_order_then_steps_equal_size() {
    let tree = sample();
    assert_eq!(tree.iter().count(), tree.size());
    assert_eq!(tree.size(), 9);
}

#[test]
fn given_trees_when_asking_max_depth_then_no_depth_only_for_empty() {
    let empty: Tree<u8> = Tree::new();
    assert_eq!(empty.max_depth(), None);

    let single = Tree::with_root(1u8);
    assert_eq!(single.max_depth(), Some(0));

    let tree = sample();
    assert_eq!(tree.max_depth(), Some(2));
    assert_eq!(tree.max_depth_of(find(&tree, "B")), Some(0));
}

#[rstest]
#[case("A", 0)]
#[case("C", 1)]
#[case("G", 2)]
#[case("Z", 0)]
fn given_node_when_asking_depth_then_counts_ancestors(#[case] value: &str, #[case] depth: usize) {
    let tree = sample();
    assert_eq!(tree.depth(find(&tree, value)), depth);
}

#[test]
fn given_node_when_depth_from_non_ancestor_then_unreachable() {
    let tree = sample();
    let g = find(&tree, "G");
    let c = find(&tree, "C");
    assert_eq!(tree.depth_from(g, find(&tree, "D")).unwrap(), 1);
    assert!(tree.depth_from(g, c).unwrap_err().is_out_of_range());
}

#[test]
fn given_children_when_indexing_then_out_of_range_is_recoverable() {
    let tree = sample();
    let a = tree.first_root().unwrap();
    assert_eq!(tree[tree.child(a, 1).unwrap()], "C");
    assert_eq!(tree.number_of_children(a), 3);
    assert_eq!(tree.number_of_siblings(find(&tree, "C")), 2);
    assert_eq!(tree.index(find(&tree, "D")), 2);

    let err = tree.child(a, 3).unwrap_err();
    assert!(matches!(err, TreeError::IndexOutOfRange { index: 3, available: 3, .. }));
    assert!(err.is_out_of_range());
}

#[test]
fn given_nodes_when_asking_lowest_common_ancestor_then_deepest_shared() {
    let tree = sample();
    let lca = tree.lowest_common_ancestor(find(&tree, "C1"), find(&tree, "G"));
    assert_eq!(lca, Some(tree.first_root().unwrap()));
    let lca = tree.lowest_common_ancestor(find(&tree, "C1"), find(&tree, "C2"));
    assert_eq!(lca, Some(find(&tree, "C")));
    assert_eq!(tree.lowest_common_ancestor(find(&tree, "B"), find(&tree, "Z")), None);
}

#[test]
fn given_node_when_testing_membership_then_subtree_and_range_agree() {
    let tree = sample();
    let a = tree.first_root().unwrap();
    let c = find(&tree, "C");
    let g = find(&tree, "G");
    assert!(tree.is_in_subtree(g, a));
    assert!(!tree.is_in_subtree(g, c));
    let begin = tree.sibling_at(c);
    let end = tree.end_children(a);
    assert!(tree.is_in_subtree_range(g, &begin, &end));
    assert!(!tree.is_in_subtree_range(find(&tree, "B"), &begin, &end));
    assert!(tree.is_root(a));
    assert!(!tree.is_valid(None));
}

#[test]
fn given_tree_when_asking_pre_order_index_then_matches_walk_position() {
    let tree = sample();
    for (position, (id, _)) in tree.iter().enumerate() {
        assert_eq!(tree.pre_order_index(id), position);
    }
}

// ============================================================
// Identity and whole-tree operations
// ============================================================

#[test]
#[should_panic(expected = "stale")]
fn given_erased_node_when_accessing_then_panics() {
    let mut tree = sample();
    let b = find(&tree, "B");
    tree.erase(b);
    let _ = tree.parent(b);
}

#[test]
fn given_erased_node_when_reusing_slot_then_old_id_stays_dead() {
    let mut tree = Tree::with_root(1);
    let r = tree.first_root().unwrap();
    let old = tree.append_child(r, 2);
    tree.erase(old);
    let new = tree.append_child(r, 3);
    assert!(!tree.contains(old));
    assert!(tree.get(old).is_none());
    assert_eq!(tree.get(new), Some(&3));
}

#[test]
fn given_tree_when_cloned_then_copies_are_independent() {
    let tree = sample();
    let mut copy = tree.clone();
    assert_eq!(copy, tree);
    let b = find(&copy, "B");
    copy[b] = "changed".to_string();
    assert_ne!(copy, tree);
    assert_eq!(values(&tree)[1], "B");
}

#[test]
fn given_node_when_copying_from_node_then_single_rooted_copy() {
    let tree = sample();
    let copy = Tree::from_node(&tree, find(&tree, "C"));
    assert_eq!(values(&copy), vec!["C", "C1", "C2"]);
    assert!(tree.equal_subtree(find(&tree, "C"), &copy, copy.first_root().unwrap()));
}

#[test]
fn given_two_trees_when_swapping_then_contents_exchange() {
    let mut one = sample();
    let mut two = Tree::with_root("only".to_string());
    one.swap_with(&mut two);
    assert_eq!(one.size(), 1);
    assert_eq!(two.size(), 9);

    let taken = two.take();
    assert!(two.is_empty());
    assert_eq!(taken.size(), 9);
}

#[test]
fn given_tree_when_cleared_then_empty_and_reusable() {
    let mut tree = sample();
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.size(), 0);
    assert_eq!(tree.begin().node(), None);
    tree.set_root("fresh".to_string());
    assert_eq!(tree.size(), 1);
}

#[test]
#[should_panic(expected = "non-empty")]
fn given_rooted_tree_when_setting_root_again_then_panics() {
    let mut tree = Tree::with_root(1);
    tree.set_root(2);
}

#[test]
fn given_tree_when_rendered_then_draws_every_root() {
    let tree = parse_outline("a\n  b\nc\n").unwrap();
    assert_eq!(tree.to_string(), "a\n└── b\nc\n");
}
