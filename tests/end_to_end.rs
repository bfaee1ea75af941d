use foldertree::{Tree, TreeError};

#[test]
fn scenario_create_remove_inverse() {
    let tree = Tree::new();
    assert_eq!(tree.create("/a/"), Ok(()));
    assert_eq!(tree.create("/a/b/"), Ok(()));
    assert_eq!(tree.list("/"), Ok("a".to_owned()));
    assert_eq!(tree.list("/a/"), Ok("b".to_owned()));
    assert_eq!(tree.remove("/a/b/"), Ok(()));
    assert_eq!(tree.remove("/a/"), Ok(()));
    assert_eq!(tree.list("/"), Ok(String::new()));
}

#[test]
fn scenario_remove_non_empty_fails() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/b/").unwrap();
    assert_eq!(tree.remove("/a/"), Err(TreeError::NotEmpty));
}

#[test]
fn scenario_move_relocates_subtree() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/b/").unwrap();
    assert_eq!(tree.move_path("/a/", "/b/a/"), Ok(()));
    assert_eq!(tree.list("/"), Ok("b".to_owned()));
    assert_eq!(tree.list("/b/"), Ok("a".to_owned()));
}

#[test]
fn scenario_move_into_own_subtree_rejected() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/b/").unwrap();
    assert_eq!(
        tree.move_path("/a/", "/a/b/c/"),
        Err(TreeError::MoveIntoOwnSubtree)
    );
}

#[test]
fn scenario_move_onto_existing_target_rejected() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/b/").unwrap();
    assert_eq!(tree.move_path("/a/", "/b/"), Err(TreeError::Exists));
}

#[test]
fn move_preserves_subtree_contents() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/x/").unwrap();
    tree.create("/a/x/y/").unwrap();
    tree.create("/b/").unwrap();

    let before = tree.list("/a/x/").unwrap();
    tree.move_path("/a/", "/b/a/").unwrap();
    let after = tree.list("/b/a/x/").unwrap();

    assert_eq!(before, after);
}

#[test]
fn move_to_self_is_idempotent_no_op() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/b/").unwrap();
    assert_eq!(tree.move_path("/a/", "/a/"), Ok(()));
    assert_eq!(tree.list("/"), Ok("a".to_owned()));
    assert_eq!(tree.list("/a/"), Ok("b".to_owned()));
}

#[test]
fn operations_reject_malformed_paths() {
    let tree = Tree::new();
    assert_eq!(tree.create("no-leading-slash"), Err(TreeError::InvalidPath));
    assert_eq!(tree.create("/has1digit/"), Err(TreeError::InvalidPath));
    assert_eq!(tree.list(""), Err(TreeError::InvalidPath));
}

#[test]
fn remove_and_move_on_root_are_forbidden() {
    let tree = Tree::new();
    assert_eq!(tree.remove("/"), Err(TreeError::Busy));
    assert_eq!(tree.move_path("/", "/a/"), Err(TreeError::Busy));
    tree.create("/a/").unwrap();
    assert_eq!(tree.move_path("/a/", "/"), Err(TreeError::Exists));
}

#[test]
fn create_rejects_duplicate_name() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    assert_eq!(tree.create("/a/"), Err(TreeError::Exists));
}

#[test]
fn operations_report_not_found_for_missing_ancestors() {
    let tree = Tree::new();
    assert_eq!(tree.create("/missing/child/"), Err(TreeError::NotFound));
    assert_eq!(tree.remove("/missing/"), Err(TreeError::NotFound));
    assert_eq!(tree.list("/missing/"), Err(TreeError::NotFound));
}
