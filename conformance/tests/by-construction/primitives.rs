//! Single-node suites.

use crate::run_named;
use stdlib_conformance::*;

/// Property: a literal matches itself and nothing else of length one
pub fn test_char() {
    run_named("char", EngineKind::Fancy);
}

/// Property: the dot matches every character but line feed
pub fn test_dots() {
    run_named("dots", EngineKind::Fancy);
}

/// Property: escaped special characters match literally
pub fn test_escape() {
    run_named("escape", EngineKind::Fancy);
}

/// Property: \d and \D split characters by decimal-number category
pub fn test_charclass() {
    run_named("charclass", EngineKind::Fancy);
}

/// Property: a set accepts its members and rejects characters outside its span
pub fn test_charset() {
    run_named("charset", EngineKind::Fancy);
}

/// Property: a negated set swaps the roles of members and outsiders
pub fn test_charset_complement() {
    run_named("charset_complement", EngineKind::Fancy);
}

/// Property: any primitive, drawn uniformly
pub fn test_simple() {
    run_named("simple", EngineKind::Fancy);

    // Every primitive kind shows up within the default number of cases.
    let generator = find_suite("simple").unwrap().generator();
    let mut kinds: Vec<&str> = (0..100)
        .filter_map(|seed| generator.sample(seed).ok())
        .map(|tree| tree.node(tree.root()).kind())
        .collect();
    kinds.sort_unstable();
    kinds.dedup();
    assert_eq!(kinds.len(), 6, "kinds drawn: {kinds:?}");
}
