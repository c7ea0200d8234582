mod common;

use assert2::check;
use common::std_index;
use docsearch::search::{Tokenization, normalize};
use docsearch::{Category, Entry, ItemKind, Match, SearchIndex, search};
use rstest::rstest;

fn qualified(matches: &[Match<'_>]) -> Vec<String> {
    matches.iter().map(|m| m.entry.qualified_name()).collect()
}

/// The ranking the `from_u` fixture encodes: prefix tier, shorter names first,
/// natural path order between equal names.
#[rstest]
fn from_u_scenario(std_index: SearchIndex) {
    let results = search(&std_index, "from_u");

    check!(
        qualified(&results.others)
            == [
                "std::char::from_u32",
                "std::str::from_utf8",
                "std::string::String::from_utf8",
                "std::boxed::Box::from_unique",
                "std::i32::from_unsigned",
                "std::i128::from_unsigned",
            ]
    );
    check!(results.in_args.is_empty());
    check!(results.returned.is_empty());
}

#[rstest]
#[case("from_u")]
#[case("u32")]
#[case("fn:from")]
#[case("char::to")]
fn repeated_searches_are_identical(std_index: SearchIndex, #[case] query: &str) {
    let first = search(&std_index, query);
    for _ in 0..5 {
        check!(search(&std_index, query) == first);
    }
}

#[rstest]
fn exact_match_ranks_above_substring_matches(std_index: SearchIndex) {
    let results = search(&std_index, "u32");
    let first = &results.others[0];
    check!(first.entry.name == "u32");
    check!(first.entry.kind == ItemKind::Primitive);
    check!(qualified(&results.others) == ["std::u32", "std::char::from_u32"]);
}

/// Every entry whose normalized name contains the query appears exactly once.
#[rstest]
#[case("from")]
#[case("to_")]
#[case("u")]
#[case("CHAR")]
fn every_containing_entry_is_reported_once(std_index: SearchIndex, #[case] query: &str) {
    let token = normalize(query, Tokenization::Whole).remove(0);
    let results = search(&std_index, query);

    let reported: Vec<&Entry> = Category::ALL
        .into_iter()
        .flat_map(|category| results.category(category).iter().map(|m| m.entry))
        .collect();

    for entry in std_index.entries() {
        let contains = entry.name.to_lowercase().contains(&token);
        let count = reported.iter().filter(|r| std::ptr::eq(**r, entry)).count();
        if contains {
            check!(count == 1, "{} reported {} times", entry.qualified_name(), count);
        }
    }
}

#[rstest]
#[case("")]
#[case("    ")]
#[case("\t")]
#[case("::")]
fn empty_queries_return_nothing(std_index: SearchIndex, #[case] query: &str) {
    check!(search(&std_index, query).is_empty());
}

#[rstest]
#[case("fn:from_u", &[
    "std::char::from_u32",
    "std::str::from_utf8",
    "std::string::String::from_utf8",
    "std::boxed::Box::from_unique",
    "std::i32::from_unsigned",
    "std::i128::from_unsigned",
])]
#[case("method:from_u", &["std::string::String::from_utf8", "std::boxed::Box::from_unique"])]
#[case("struct:box", &["std::boxed::Box"])]
#[case("macro:print", &["std::println"])]
fn kind_filters(std_index: SearchIndex, #[case] query: &str, #[case] expected: &[&str]) {
    check!(qualified(&search(&std_index, query).others) == expected);
}

#[rstest]
#[case("string::from_u", &["std::string::String::from_utf8"])]
#[case("std::str::from", &["std::str::from_str", "std::str::from_utf8", "std::string::String::from_utf8"])]
#[case("boxed.from", &["std::boxed::Box::from_unique"])]
fn path_queries(std_index: SearchIndex, #[case] query: &str, #[case] expected: &[&str]) {
    check!(qualified(&search(&std_index, query).others) == expected);
}

#[rstest]
fn signature_categories(std_index: SearchIndex) {
    let results = search(&std_index, "u32");
    check!(qualified(&results.in_args) == ["std::char::from_digit", "std::i32::from_unsigned"]);
    check!(qualified(&results.returned) == ["std::char::to_digit"]);
}

#[test]
fn case_is_ignored_for_matching_but_kept_in_results() {
    let index = SearchIndex::build([Entry::new(&["std", "string"], "String", ItemKind::Struct)])
        .unwrap();
    let results = search(&index, "STRING");
    check!(results.others.len() == 1);
    check!(results.others[0].entry.name == "String");
}

#[test]
fn duplicate_entries_are_kept() {
    let entry = Entry::new(&["std", "char"], "from_u32", ItemKind::Function);
    let index = SearchIndex::build([entry.clone(), entry]).unwrap();
    check!(search(&index, "from_u32").others.len() == 2);
}

#[test]
fn shorter_names_rank_first_within_substring_tier() {
    let index = SearchIndex::build([
        Entry::new(&["a"], "a_from_unsigned", ItemKind::Function),
        Entry::new(&["a"], "abc_from_u8", ItemKind::Function),
    ])
    .unwrap();
    check!(
        qualified(&search(&index, "from_u").others) == ["a::abc_from_u8", "a::a_from_unsigned"]
    );
}
