mod common;

use tempfile::TempDir;
use treemirror_renderer::MarkdownRenderer;
use treemirror_sync::{run, SyncOptions};

use common::{write_tree, Call, FakeStore};

fn renderer() -> MarkdownRenderer {
    MarkdownRenderer::new().expect("renderer")
}

#[test]
fn stale_child_of_master_is_deleted() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(&tmp.path().join("root"), &[("docs/readme.md", "text\n")]);
    let store = FakeStore::new();
    let master = store.seed("Master", None);
    let stale = store.seed("Stale", Some(&master));
    let opts = SyncOptions::new(&root).with_master_page(Some(master));

    let outcome = run(&store, &renderer(), &opts).expect("run");

    assert_eq!(store.deleted(), vec![stale]);
    assert_eq!(outcome.report.deleted, 1);
    assert!(store.page("Stale").is_none());
    assert!(store.page("docs").is_some());
    assert!(store.page("readme").is_some());
}

#[test]
fn freshly_synced_pages_survive() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(
        &tmp.path().join("repo"),
        &[("intro.md", "# Intro\n"), ("docs/a.md", "# A\n"), ("docs/deep/b.md", "# B\n")],
    );
    let store = FakeStore::new();
    let master = store.seed("Master", None);
    let opts = SyncOptions::new(&root).with_master_page(Some(master));

    let outcome = run(&store, &renderer(), &opts).expect("run");

    assert!(store.deleted().is_empty());
    assert_eq!(outcome.report.deleted, 0);
    for title in outcome.titles.iter() {
        assert!(store.page(title).is_some(), "{title} was removed");
    }
}

#[test]
fn orphan_subtree_is_deleted_children_first() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(&tmp.path().join("root"), &[("docs/readme.md", "text\n")]);
    let store = FakeStore::new();
    let master = store.seed("Master", None);
    let docs = store.seed("docs", Some(&master));
    let old = store.seed("Old", Some(&docs));
    let old_child = store.seed("Old child", Some(&old));
    let old_grandchild = store.seed("Old grandchild", Some(&old_child));
    let opts = SyncOptions::new(&root).with_master_page(Some(master));

    let outcome = run(&store, &renderer(), &opts).expect("run");

    assert_eq!(store.deleted(), vec![old_grandchild, old_child, old]);
    assert_eq!(outcome.report.deleted, 3);
    let docs_page = store.page("docs").expect("docs kept");
    assert_eq!(docs_page.id, docs);
    assert_eq!(docs_page.version, 2);
}

#[test]
fn synced_titles_are_kept_wherever_they_hang() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(&tmp.path().join("root"), &[("docs/guide.md", "# Guide\n")]);
    let store = FakeStore::new();
    let master = store.seed("Master", None);
    // exists remotely directly under the master page, not under `docs`
    let guide = store.seed("Guide", Some(&master));
    let opts = SyncOptions::new(&root).with_master_page(Some(master.clone()));

    run(&store, &renderer(), &opts).expect("run");

    assert!(store.deleted().is_empty());
    let page = store.page("Guide").expect("guide kept");
    assert_eq!(page.id, guide);
    assert_eq!(page.parent, Some(master));
}

#[test]
fn failed_delete_is_recorded_and_scrub_continues() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(&tmp.path().join("root"), &[("docs/readme.md", "text\n")]);
    let store = FakeStore::new();
    let master = store.seed("Master", None);
    let stuck = store.seed("Stuck", Some(&master));
    let gone = store.seed("Gone", Some(&master));
    store.fail_delete_for(&stuck);
    let opts = SyncOptions::new(&root).with_master_page(Some(master));

    let outcome = run(&store, &renderer(), &opts).expect("run");

    assert!(store.page("Stuck").is_some());
    assert!(store.page("Gone").is_none());
    assert_eq!(store.deleted(), vec![stuck, gone]);
    assert_eq!(outcome.report.deleted, 1);
    assert_eq!(outcome.report.failures.len(), 1);
    assert_eq!(outcome.report.failures[0].subject, "Stuck");
}

#[test]
fn without_master_page_space_root_is_left_alone() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(&tmp.path().join("root"), &[("docs/readme.md", "text\n")]);
    let store = FakeStore::new();
    store.seed("Unrelated", None);

    let outcome = run(&store, &renderer(), &SyncOptions::new(&root)).expect("run");

    assert!(store.page("Unrelated").is_some());
    assert_eq!(outcome.report.deleted, 0);
    assert!(!store.calls().iter().any(|c| matches!(c, Call::Delete(_))));
}

#[test]
fn scrub_runs_after_every_page_is_synced() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(
        &tmp.path().join("root"),
        &[("a/one.md", "# One\n"), ("b/two.md", "# Two\n")],
    );
    let store = FakeStore::new();
    let master = store.seed("Master", None);
    let opts = SyncOptions::new(&root).with_master_page(Some(master));

    run(&store, &renderer(), &opts).expect("run");

    let calls = store.calls();
    let last_mutation = calls
        .iter()
        .rposition(|c| matches!(c, Call::Create { .. } | Call::Update { .. }))
        .expect("pages synced");
    let first_listing = calls
        .iter()
        .position(|c| matches!(c, Call::Children(_) | Call::Find { with_children: true, .. }))
        .expect("scrub listed children");
    assert!(last_mutation < first_listing);
}

#[test]
fn unreadable_master_listing_does_not_stop_tree_scrub() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(&tmp.path().join("root"), &[("docs/readme.md", "text\n")]);
    let store = FakeStore::new();
    let master = store.seed("Master", None);
    let docs = store.seed("docs", Some(&master));
    store.seed("Stale", Some(&master));
    let old = store.seed("Old", Some(&docs));
    store.fail_children_for(&master);
    let opts = SyncOptions::new(&root).with_master_page(Some(master.clone()));

    let outcome = run(&store, &renderer(), &opts).expect("run still succeeds");

    assert_eq!(store.deleted(), vec![old]);
    assert!(store.page("Stale").is_some(), "unlisted children are left alone");
    assert_eq!(outcome.report.failures.len(), 1);
    assert_eq!(outcome.report.failures[0].subject, format!("master page {master}"));
}

#[test]
fn failed_lookup_skips_only_that_subtree() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(
        &tmp.path().join("root"),
        &[("docs/a.md", "# A\n"), ("guides/b.md", "# B\n")],
    );
    let store = FakeStore::new();
    let master = store.seed("Master", None);
    let docs = store.seed("docs", Some(&master));
    let guides = store.seed("guides", Some(&master));
    store.seed("Old docs", Some(&docs));
    let old_guide = store.seed("Old guide", Some(&guides));
    store.fail_children_for(&docs);
    let opts = SyncOptions::new(&root).with_master_page(Some(master));

    let outcome = run(&store, &renderer(), &opts).expect("run still succeeds");

    assert_eq!(store.deleted(), vec![old_guide]);
    assert!(store.page("Old docs").is_some());
    assert_eq!(outcome.report.failures.len(), 1);
    assert_eq!(outcome.report.failures[0].subject, "docs");
}

#[test]
fn orphan_with_unlistable_children_is_kept() {
    let tmp = TempDir::new().expect("tmp");
    let root = write_tree(&tmp.path().join("root"), &[("docs/readme.md", "text\n")]);
    let store = FakeStore::new();
    let master = store.seed("Master", None);
    let stuck = store.seed("Stuck", Some(&master));
    store.seed("Stuck child", Some(&stuck));
    let gone = store.seed("Gone", Some(&master));
    store.fail_children_for(&stuck);
    let opts = SyncOptions::new(&root).with_master_page(Some(master));

    let outcome = run(&store, &renderer(), &opts).expect("run still succeeds");

    assert_eq!(store.deleted(), vec![gone]);
    assert!(store.page("Stuck").is_some());
    assert!(store.page("Stuck child").is_some());
    assert_eq!(outcome.report.deleted, 1);
    assert_eq!(outcome.report.failures.len(), 1);
    assert_eq!(outcome.report.failures[0].subject, "Stuck");
}
