use std::collections::{BTreeSet, HashSet};

use datalib_core::{NodeRef, PathRecord, PathTree, Record, TreeConfig, TreeError, WarningKind};

#[derive(Debug, Clone, PartialEq)]
struct FileMeta {
    id: u64,
    fsize: u64,
}

fn record(path: &str, id: u64) -> Record<FileMeta> {
    Record::new(path, FileMeta { id, fsize: id * 100 })
}

fn all_paths<R>(tree: &PathTree<R>) -> BTreeSet<String> {
    tree.walk()
        .filter_map(|node| node.full_path())
        .map(str::to_string)
        .collect()
}

fn names<R>(node: NodeRef<'_, R>) -> Vec<&str> {
    node.dir().map(|n| n.name()).collect()
}

const LISTING: [&str; 8] = [
    "chris/uploads/study1/series1/img1.dcm",
    "chris/uploads/study1/series1/img2.dcm",
    "chris/uploads/study1/series2/img1.dcm",
    "chris/uploads/notes.txt",
    "SERVICES/PACS/Orthanc/Patient-1234567/study/series/file_1.jpg",
    "SERVICES/PACS/FNNDSC Fuji/Patient-2345678/study/series/file_4.jpg",
    "SERVICES/Genomics/Database/Patient-3456789/study/file_X.txt",
    "chris/uploads/study1/series1/img1.dcm",
];

#[test]
fn test_build_scenario() {
    let tree = PathTree::build(["a/b/f1.txt", "a/b/f2.txt", "a/c/f3.txt"]);

    assert_eq!(names(tree.root_ref()), vec!["a"]);
    assert_eq!(names(tree.child("a")), vec!["b", "c"]);
    assert_eq!(names(tree.child("a/b")), vec!["f1.txt", "f2.txt"]);
    assert!(tree.child("a").has_children());
    assert!(!tree.child("a/b/f1.txt").has_children());
}

#[test]
fn test_idempotent_merge() {
    let records: Vec<_> = LISTING.iter().enumerate().map(|(i, p)| record(p, i as u64)).collect();

    let built = PathTree::build(records.clone());
    let merged = PathTree::build(records.clone()).merge(records);

    assert_eq!(merged, built);
}

#[test]
fn test_permutations_share_membership() {
    let forward = PathTree::build(LISTING);

    let mut reversed = LISTING;
    reversed.reverse();
    let backward = PathTree::build(reversed);

    let mut rotated = LISTING;
    rotated.rotate_left(3);
    let rotated = PathTree::build(rotated);

    assert_eq!(all_paths(&forward), all_paths(&backward));
    assert_eq!(all_paths(&forward), all_paths(&rotated));

    let forward_leaves: BTreeSet<_> = forward.leaf_paths().collect();
    let backward_leaves: BTreeSet<_> = backward.leaf_paths().collect();
    assert_eq!(forward_leaves, backward_leaves);
}

#[test]
fn test_full_paths_are_unique() {
    let tree = PathTree::build(LISTING).merge(LISTING);
    let mut seen = HashSet::new();
    for node in tree.walk() {
        let path = node.full_path().unwrap();
        assert!(seen.insert(path), "duplicate node for {path}");
    }
    assert_eq!(seen.len(), tree.len());
}

#[test]
fn test_duplicate_path_single_leaf() {
    let tree = PathTree::build([record("a/b/f1.txt", 1), record("a/b/f1.txt", 2)]);

    let leaves: Vec<_> = tree.leaf_paths().collect();
    assert_eq!(leaves, vec!["a/b/f1.txt"]);
    // First record wins.
    assert_eq!(tree.child("a/b/f1.txt").payload().unwrap().payload.id, 1);
}

#[test]
fn test_paginated_merge_matches_single_build() {
    let paged = PathTree::build(["a/b/f1.txt"]).merge(["a/b/f1.txt", "a/c/f2.txt"]);
    let whole = PathTree::build(["a/b/f1.txt", "a/c/f2.txt"]);

    assert_eq!(all_paths(&paged), all_paths(&whole));

    let paged_a: BTreeSet<_> = names(paged.child("a")).into_iter().collect();
    let whole_a: BTreeSet<_> = names(whole.child("a")).into_iter().collect();
    assert_eq!(paged_a, whole_a);
}

#[test]
fn test_merge_page_by_page() {
    let mut tree = PathTree::new();
    for page in LISTING.chunks(3) {
        tree = tree.merge(page.iter().copied());
    }
    assert_eq!(all_paths(&tree), all_paths(&PathTree::build(LISTING)));

    // Earlier pages keep their position.
    assert_eq!(names(tree.root_ref()), vec!["chris", "SERVICES"]);
    assert_eq!(names(tree.child("chris/uploads")), vec!["study1", "notes.txt"]);
}

#[test]
fn test_extend_records_counts_new_nodes() {
    let mut tree = PathTree::build(["a/b/f1.txt"]);
    assert_eq!(tree.extend_records(["a/b/f1.txt"]), 0);
    assert_eq!(tree.extend_records(["a/c/f2.txt"]), 2);
}

#[test]
fn test_navigation_for_library_views() {
    let tree = PathTree::build(LISTING);

    let uploads: Vec<_> = tree
        .child("chris")
        .child("uploads")
        .folders()
        .map(|n| n.name())
        .collect();
    assert_eq!(uploads, vec!["study1"]);

    let services: Vec<_> = tree.child("SERVICES").folders().map(|n| n.name()).collect();
    assert_eq!(services, vec!["PACS", "Genomics"]);

    let pacs = tree.child("/SERVICES/PACS/");
    assert_eq!(names(pacs), vec!["Orthanc", "FNNDSC Fuji"]);

    // Unknown user: renders as an empty folder.
    assert_eq!(tree.child("someone-else").child("uploads").dir().count(), 0);
}

#[test]
fn test_find_reports_not_found() {
    let tree = PathTree::build(LISTING);
    let err = tree.find("chris/downloads").unwrap_err();
    assert!(matches!(err, TreeError::NotFound { ref path } if path == "chris/downloads"));
}

#[test]
fn test_payload_preserved_on_leaves() {
    let tree = PathTree::build([record("x/y/z.dcm", 9)]);
    let leaf = tree.child("x/y/z.dcm");

    let stored = leaf.payload().unwrap();
    assert_eq!(stored.path(), Some("x/y/z.dcm"));
    assert_eq!(stored.payload, FileMeta { id: 9, fsize: 900 });
}

#[test]
fn test_conflicts_resolve_to_directory() {
    let tree = PathTree::build([record("a/b", 1), record("a/b/c", 2), record("a", 3)]);

    assert!(tree.child("a/b").is_dir());
    assert!(tree.child("a/b").payload().is_none());
    assert!(tree.child("a").payload().is_none());
    assert_eq!(tree.child("a/b/c").payload().unwrap().payload.id, 2);

    let ambiguous = tree
        .warnings()
        .iter()
        .filter(|w| w.kind == WarningKind::AmbiguousNode)
        .count();
    assert_eq!(ambiguous, 2);
}

#[test]
fn test_pathless_records_are_skipped() {
    let tree = PathTree::build([
        Record::pathless(FileMeta { id: 1, fsize: 0 }),
        record("ok.txt", 2),
    ]);

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.warnings()[0].kind, WarningKind::MalformedRecord);
}

#[test]
fn test_custom_separator() {
    let config = TreeConfig::builder().separator(':').build().unwrap();
    let tree = PathTree::build_with_config(config, ["a:b:c", "a:d"]);

    assert_eq!(names(tree.child("a")), vec!["b", "d"]);
    assert_eq!(tree.child("a:b:c").full_path(), Some("a:b:c"));
}

#[test]
fn test_file_list_for_prefix_fetch() {
    let files = PathTree::file_list(
        [
            record("SERVICES/PACS/Orthanc/s/series/1.dcm", 1),
            record("SERVICES/PACS/Orthanc/s/series/2.dcm", 2),
            record("SERVICES/PACS/Orthanc/s/series/deeper/3.dcm", 3),
        ],
        "SERVICES/PACS/Orthanc/s/series",
    );

    let ids: Vec<_> = files.iter().map(|r| r.payload.id).collect();
    assert_eq!(ids, vec![1, 2]);
}
