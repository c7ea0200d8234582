mod common;

use assert2::{check, let_assert};
use common::{TempWorkspace, temp_workspace};
use docsearch::search::cache_file_path;
use docsearch::{CorpusError, IndexError, SearchIndex, search};
use rstest::rstest;

#[rstest]
fn builds_and_writes_cache(temp_workspace: TempWorkspace) {
    let corpus = temp_workspace.copy_data("std_corpus.json");
    let cache_dir = temp_workspace.path().join("cache");

    let index = SearchIndex::load_or_build(&corpus, Some(&cache_dir)).unwrap();
    check!(index.len() == 18);
    check!(cache_file_path(&cache_dir, &corpus).exists());
}

#[rstest]
fn cached_index_matches_fresh_build(temp_workspace: TempWorkspace) {
    let corpus = temp_workspace.copy_data("std_corpus.json");
    let cache_dir = temp_workspace.path().join("cache");

    let fresh = SearchIndex::load_or_build(&corpus, Some(&cache_dir)).unwrap();
    let cached = SearchIndex::load_or_build(&corpus, Some(&cache_dir)).unwrap();

    check!(cached.len() == fresh.len());
    check!(search(&cached, "from_u") == search(&fresh, "from_u"));
}

#[rstest]
fn changed_corpus_invalidates_cache(temp_workspace: TempWorkspace) {
    let cache_dir = temp_workspace.path().join("cache");
    let corpus = temp_workspace.create_file(
        "corpus.json",
        r#"[{"path": ["std", "char"], "name": "from_u32", "kind": "function"}]"#,
    );
    let first = SearchIndex::load_or_build(&corpus, Some(&cache_dir)).unwrap();
    check!(first.len() == 1);

    temp_workspace.create_file(
        "corpus.json",
        r#"[{"path": ["std", "char"], "name": "from_u32", "kind": "function"},
            {"path": ["std", "str"], "name": "from_utf8", "kind": "function"}]"#,
    );
    let second = SearchIndex::load_or_build(&corpus, Some(&cache_dir)).unwrap();
    check!(second.len() == 2);
}

#[rstest]
fn corrupt_cache_is_rebuilt(temp_workspace: TempWorkspace) {
    let corpus = temp_workspace.copy_data("std_corpus.json");
    let cache_dir = temp_workspace.path().join("cache");
    temp_workspace.create_file("cache/std_corpus.index", "not postcard");

    let index = SearchIndex::load_or_build(&corpus, Some(&cache_dir)).unwrap();
    check!(index.len() == 18);
}

#[rstest]
fn without_cache_dir(temp_workspace: TempWorkspace) {
    let corpus = temp_workspace.copy_data("std_corpus.json");
    let index = SearchIndex::load_or_build(&corpus, None).unwrap();
    check!(!search(&index, "from_u").is_empty());
}

#[rstest]
fn invalid_entry_fails_build(temp_workspace: TempWorkspace) {
    let corpus = temp_workspace.create_file(
        "bad.json",
        r#"[{"path": ["std"], "name": "ok", "kind": "function"},
            {"path": ["std"], "name": "", "kind": "function"}]"#,
    );

    let_assert!(
        Err(CorpusError::Index(IndexError::InvalidEntry { position, .. })) =
            SearchIndex::load_or_build(&corpus, None)
    );
    check!(position == 1);
}
