//! Integration tests for insertion, erasure, splicing, moves, sorting,
//! merging and moving subtrees out and back in.

use rstree::outline::{parse_outline, to_outline};
use rstree::util::testing;
use rstree::{NodeId, Tree};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn tree_of(text: &str) -> Tree<String> {
    parse_outline(text).unwrap()
}

fn find(tree: &Tree<String>, value: &str) -> NodeId {
    tree.iter()
        .find(|(_, v)| v.as_str() == value)
        .map(|(id, _)| id)
        .unwrap()
}

fn outline(tree: &Tree<String>) -> String {
    tree.verify_consistency().unwrap();
    to_outline(tree)
}

// ============================================================
// Erasure
// ============================================================

#[test]
fn given_middle_child_when_erasing_siblings_then_only_it_survives() {
    let mut tree = tree_of("r\n  a\n  b\n  c\n  d\n");
    let b = find(&tree, "b");
    tree.erase_right_siblings(b);
    assert_eq!(outline(&tree), "r\n  a\n  b\n");
    tree.erase_left_siblings(b);
    assert_eq!(outline(&tree), "r\n  b\n");
    tree.erase_children(find(&tree, "r"));
    assert_eq!(outline(&tree), "r\n");
}

// ============================================================
// Splicing
// ============================================================

#[test]
fn given_nested_node_when_flattening_then_children_become_siblings() {
    let mut tree = tree_of("r\n  a\n    a1\n      x\n    a2\n  b\n");
    tree.flatten(find(&tree, "a"));
    assert_eq!(outline(&tree), "r\n  a\n  a1\n    x\n  a2\n  b\n");
}

#[test]
fn given_range_when_reparenting_then_appended_below_target() {
    let mut tree = tree_of("r\n  a\n  b\n  c\n  t\n    t1\n");
    let r = find(&tree, "r");
    let begin = tree.begin_children(r);
    let end = tree.sibling_at(find(&tree, "t"));
    let first = tree.reparent(find(&tree, "t"), &begin, &end);
    assert_eq!(first, Some(find(&tree, "a")));
    assert_eq!(outline(&tree), "r\n  t\n    t1\n    a\n    b\n    c\n");
}

#[test]
fn given_two_parents_when_reparenting_children_then_moved_across() {
    let mut tree = tree_of("p\n  x\n  y\nq\n");
    tree.reparent_children(find(&tree, "q"), find(&tree, "p"));
    assert_eq!(outline(&tree), "p\nq\n  x\n  y\n");
}

#[test]
fn given_root_when_wrapping_then_new_root_above() {
    let mut tree = tree_of("r\n  a\n");
    let w = tree.wrap(find(&tree, "r"), "w".to_string());
    assert_eq!(tree.first_root(), Some(w));
    assert_eq!(outline(&tree), "w\n  r\n    a\n");
}

#[test]
fn given_nodes_in_different_bands_when_moving_then_relinked() {
    let mut tree = tree_of("r\n  a\n    a1\n  b\n    b1\n");
    let a1 = find(&tree, "a1");
    let b1 = find(&tree, "b1");
    tree.move_after(b1, a1);
    assert_eq!(outline(&tree), "r\n  a\n  b\n    b1\n    a1\n");
    tree.move_before(find(&tree, "a"), b1);
    assert_eq!(outline(&tree), "r\n  b1\n  a\n  b\n    a1\n");
    let end = tree.end_children(find(&tree, "a"));
    tree.move_before_sibling(&end, a1);
    assert_eq!(outline(&tree), "r\n  b1\n  a\n    a1\n  b\n");
}

#[test]
fn given_target_when_moving_ontop_then_target_replaced() {
    let mut tree = tree_of("r\n  a\n    a1\n  b\n    b1\n");
    let b1 = find(&tree, "b1");
    tree.move_ontop(find(&tree, "a"), b1);
    assert_eq!(outline(&tree), "r\n  b1\n  b\n");
    assert_eq!(tree.size(), 3);
}

#[test]
#[should_panic(expected = "below target")]
fn given_descendant_when_moving_ontop_then_panics() {
    let mut tree = tree_of("r\n  a\n");
    let a = find(&tree, "a");
    let r = find(&tree, "r");
    tree.move_ontop(r, a);
}

#[test]
fn given_cousins_when_swapping_then_subtrees_trade_places() {
    let mut tree = tree_of("r\n  a\n    a1\n  b\n    b1\n      b11\n");
    tree.swap(find(&tree, "a1"), find(&tree, "b1"));
    assert_eq!(outline(&tree), "r\n  a\n    b1\n      b11\n  b\n    a1\n");
}

#[test]
fn given_adjacent_siblings_when_swapping_next_then_order_flips() {
    let mut tree = tree_of("a\nb\nc\n");
    tree.swap_next(find(&tree, "a"));
    assert_eq!(outline(&tree), "b\na\nc\n");
    tree.swap_next(find(&tree, "c"));
    assert_eq!(outline(&tree), "b\na\nc\n");
}

// ============================================================
// Copies from another tree
// ============================================================

#[test]
fn given_source_tree_when_inserting_subtrees_then_deep_copies() {
    let source = tree_of("s\n  s1\n");
    let s = find(&source, "s");
    let mut tree = tree_of("r\n  a\n");
    let a = find(&tree, "a");
    tree.insert_subtree(a, &source, s);
    tree.insert_subtree_after(a, &source, s);
    tree.append_subtree(a, &source, s);
    assert_eq!(
        outline(&tree),
        "r\n  s\n    s1\n  a\n    s\n      s1\n  s\n    s1\n"
    );
    assert_eq!(source.size(), 2);
}

#[test]
fn given_source_range_when_appending_children_then_returns_last_copy() {
    let source = tree_of("x\ny\nz\n");
    let mut tree = tree_of("r\n");
    let r = find(&tree, "r");
    let end = source.sibling_at(find(&source, "z"));
    let last = tree.append_children(r, &source, &source.begin_roots(), &end);
    assert_eq!(last.map(|id| tree[id].clone()), Some("y".to_string()));
    assert_eq!(outline(&tree), "r\n  x\n  y\n");
}

// ============================================================
// Sorting
// ============================================================

#[test]
fn given_unsorted_tree_when_sorting_deep_then_every_level_ordered() {
    let mut tree = tree_of("r\n  c\n    c2\n    c1\n  a\n  b\n    b2\n    b1\n");
    tree.sort_children(find(&tree, "r"), true);
    assert_eq!(outline(&tree), "r\n  a\n  b\n    b1\n    b2\n  c\n    c1\n    c2\n");
}

#[test]
fn given_ordering_when_sorting_by_then_caller_order_used() {
    let mut tree = tree_of("r\n  bb\n  a\n  ccc\n");
    tree.sort_children_by(find(&tree, "r"), false, |x, y| y.len().cmp(&x.len()));
    assert_eq!(outline(&tree), "r\n  ccc\n  bb\n  a\n");
}

#[test]
fn given_roots_when_sorting_roots_shallow_then_children_untouched() {
    let mut tree = tree_of("b\n  z\n  y\na\n");
    tree.sort_roots(false);
    assert_eq!(outline(&tree), "a\nb\n  z\n  y\n");
}

// ============================================================
// Merge and transfer
// ============================================================

#[test]
fn given_overlapping_trees_when_merging_then_union_without_duplicates() {
    let source = tree_of("etc\n  hosts\n  ssh\n    config\nvar\n");
    let mut tree = tree_of("etc\n  ssh\n    known_hosts\n");
    tree.merge(
        &tree.begin_roots(),
        &tree.end_roots(),
        &source,
        &source.begin_roots(),
        &source.end_roots(),
        false,
    );
    assert_eq!(
        outline(&tree),
        "etc\n  ssh\n    known_hosts\n    config\n  hosts\nvar\n"
    );
}

#[test]
fn given_parked_subtrees_when_moving_in_below_then_handles_emptied() {
    let mut tree = tree_of("r\n  a\nx\n  x1\ny\n");
    let x = find(&tree, "x");
    let x1 = find(&tree, "x1");
    let mut moved_x = tree.move_out(x);
    let mut moved_y = tree.move_out(find(&tree, "y"));
    assert_eq!(outline(&tree), "r\n  a\n");

    let r = find(&tree, "r");
    assert_eq!(tree.move_in_below(r, &mut moved_x), Some(x));
    tree.move_in_below(r, &mut moved_y);
    assert!(moved_x.is_empty() && moved_y.is_empty());
    assert_eq!(tree.parent(x1), Some(x));
    assert_eq!(outline(&tree), "r\n  a\n  x\n    x1\n  y\n");
}

#[test]
fn given_detached_node_when_built_up_then_moves_in_whole() {
    let mut tree = tree_of("r\n  a\n");
    let mut part = tree.new_detached("p".to_string());
    let p = part.root().unwrap();
    tree.append_child(p, "p1".to_string());
    assert_eq!(tree.size(), 2);
    assert_eq!(outline(&tree), "r\n  a\n");

    tree.move_in(find(&tree, "a"), &mut part);
    assert_eq!(tree.size(), 4);
    assert_eq!(outline(&tree), "r\n  p\n    p1\n  a\n");
}

#[test]
fn given_equal_siblings_in_source_when_merging_then_children_merged_once() {
    let mut tree = tree_of("r\n  x\n");
    let source = tree_of("r\n  x\n    a\n  x\n    a\n");
    let r = find(&tree, "r");
    let fr = source.first_root().unwrap();
    tree.merge_nodes(r, &source, fr, false);
    assert_eq!(tree.values().map(String::as_str).collect::<Vec<_>>(), vec!["r", "x", "a"]);
    assert_eq!(outline(&tree), "r\n  x\n    a\n");
}

#[test]
fn given_range_when_extracting_subtree_then_default_root_holds_copies() {
    let tree = tree_of("r\n  a\n    a1\n  b\n  c\n");
    let r = find(&tree, "r");
    let end = tree.sibling_at(find(&tree, "c"));
    let sub = tree.subtree(&tree.begin_children(r), &end);
    assert_eq!(outline(&sub), "\n  a\n    a1\n  b\n");

    let mut target = tree_of("old\n");
    tree.subtree_into(&mut target, &tree.begin_children(r), &end);
    assert_eq!(target, sub);
}

#[test]
fn given_range_when_replacing_then_originals_gone() {
    let source = tree_of("n1\nn2\n");
    let mut tree = tree_of("r\n  a\n  b\n  c\n");
    let a = find(&tree, "a");
    let c = find(&tree, "c");
    let first = tree.replace_range(
        &tree.sibling_at(a),
        &tree.sibling_at(c),
        &source,
        &source.begin_roots(),
        &source.end_roots(),
    );
    assert_eq!(first.map(|id| tree[id].clone()), Some("n1".to_string()));
    assert_eq!(outline(&tree), "r\n  n1\n  n2\n  c\n");
}
