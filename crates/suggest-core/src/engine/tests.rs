use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use crate::entry::EntryKind;
use crate::realize::{realize, ShellRunner};
use crate::storage::MemoryStorage;

use super::*;

const WORDS: &str = "/dict/English/words.txt";
const CUSTOM: &str = "/cfg/Custom_Words.txt";
const HIST: &str = "/cfg/history.txt";

fn config(sources: &[&str], history: Option<&str>) -> SuggestConfig {
    SuggestConfig::new(
        sources.iter().map(PathBuf::from).collect(),
        history.map_or_else(HistoryStore::disabled, HistoryStore::new),
    )
}

#[test]
fn prefix_query_keeps_file_order() {
    let storage = MemoryStorage::new().with_file(WORDS, "apple\napplication\napply\nbanana\n");
    let engine = SuggestionEngine::new(storage);
    let out = engine.suggest("app", &config(&[WORDS], None));
    assert_eq!(out.ranked.texts(), vec!["apple", "application", "apply"]);
    assert!(out.unavailable.is_empty());
}

#[test]
fn history_repetition_reorders() {
    let storage = MemoryStorage::new()
        .with_file(WORDS, "apple\napplication\napply\n")
        .with_file(HIST, "apply\napply\n");
    let engine = SuggestionEngine::new(storage);
    let out = engine.suggest("app", &config(&[WORDS], Some(HIST)));
    assert_eq!(out.ranked.texts(), vec!["apply", "apple", "application"]);
}

#[test]
fn history_ignored_when_disabled() {
    let storage = MemoryStorage::new()
        .with_file(WORDS, "apple\napplication\napply\n")
        .with_file(HIST, "apply\napply\n");
    let engine = SuggestionEngine::new(storage);
    let out = engine.suggest("app", &config(&[WORDS], None));
    assert_eq!(out.ranked.texts(), vec!["apple", "application", "apply"]);
}

#[test]
fn empty_query_lists_all() {
    let storage = MemoryStorage::new().with_file(WORDS, "cat\ndog\n");
    let engine = SuggestionEngine::new(storage);
    let out = engine.suggest("", &config(&[WORDS], None));
    assert_eq!(out.ranked.texts(), vec!["cat", "dog"]);
}

#[test]
fn alias_is_offered_by_key_and_realizes_expansion() {
    let storage = MemoryStorage::new().with_file(CUSTOM, "brb=be right back\n");
    let engine = SuggestionEngine::new(storage);
    let out = engine.suggest("brb", &config(&[CUSTOM], None));
    let top = out.ranked.get("brb").unwrap();
    assert_eq!(top.entry.kind, EntryKind::Alias);
    assert_eq!(top.entry.expansion.as_deref(), Some("be right back"));

    let produced = realize(&top.entry, &ShellRunner).unwrap();
    assert_eq!(produced.text(), "be right back");
}

#[test]
fn missing_source_degrades() {
    let storage = MemoryStorage::new().with_file(WORDS, "cat\ndog\n");
    let engine = SuggestionEngine::new(storage);
    let out = engine.suggest("", &config(&["/dict/Bangla/words.txt", WORDS], None));
    assert_eq!(out.ranked.texts(), vec!["cat", "dog"]);
    assert_eq!(out.unavailable.len(), 1);
    assert_eq!(out.unavailable[0].path(), Path::new("/dict/Bangla/words.txt"));
}

#[test]
fn no_matches_is_empty_not_error() {
    let storage = MemoryStorage::new().with_file(WORDS, "cat\ndog\n");
    let engine = SuggestionEngine::new(storage);
    let out = engine.suggest("zebra", &config(&[WORDS], None));
    assert!(out.is_empty());
    assert!(out.unavailable.is_empty());
}

#[test]
fn source_priority_breaks_ties() {
    let storage = MemoryStorage::new()
        .with_file(WORDS, "beta\n")
        .with_file(CUSTOM, "alpha\n");
    let engine = SuggestionEngine::new(storage);
    let out = engine.suggest("", &config(&[CUSTOM, WORDS], None));
    assert_eq!(out.ranked.texts(), vec!["alpha", "beta"]);
}

#[test]
fn history_only_words_are_offered() {
    let storage = MemoryStorage::new()
        .with_file(WORDS, "apple\n")
        .with_file(HIST, "appendix\n");
    let engine = SuggestionEngine::new(storage);
    let out = engine.suggest("app", &config(&[WORDS], Some(HIST)));
    assert_eq!(out.ranked.texts(), vec!["apple", "appendix"]);
}

#[test]
fn accepted_text_counts_next_time() {
    let storage = MemoryStorage::new().with_file(WORDS, "apple\napply\n");
    let engine = SuggestionEngine::new(storage);
    let cfg = config(&[WORDS], Some(HIST));
    engine.accept(&cfg, "apply").unwrap();
    let out = engine.suggest("app", &cfg);
    assert_eq!(out.ranked.texts(), vec!["apply", "apple"]);
}

#[test]
fn failed_accept_does_not_block() {
    let storage = MemoryStorage::new()
        .with_file(WORDS, "apple\napply\n")
        .read_only();
    let engine = SuggestionEngine::new(storage);
    let cfg = config(&[WORDS], Some(HIST));
    assert!(!engine.accept_best_effort(&cfg, "apply"));
    assert_eq!(engine.suggest("app", &cfg).ranked.texts(), vec!["apple", "apply"]);
}

#[test]
fn idempotent() {
    let storage = MemoryStorage::new()
        .with_file(WORDS, "apple\napplication\napply\n")
        .with_file(HIST, "application\napply\napply\n");
    let engine = SuggestionEngine::new(storage);
    let cfg = config(&[WORDS], Some(HIST));
    let first = engine.suggest("ap", &cfg).ranked;
    let second = engine.suggest("ap", &cfg).ranked;
    assert_eq!(first, second);
}

#[test]
fn one_shot_suggest_over_real_files() {
    let dir = tempfile::tempdir().unwrap();
    let words = dir.path().join("words.txt");
    let history = dir.path().join("history.txt");
    fs::write(&words, "apple\napplication\napply\n").unwrap();
    fs::write(&history, "apply\napply\n").unwrap();

    let ranked = suggest("app", &[words.clone(), dir.path().join("missing.txt")], Some(&history));
    assert_eq!(ranked.texts(), vec!["apply", "apple", "application"]);

    let ranked = suggest("app", &[words], None);
    assert_eq!(ranked.texts(), vec!["apple", "application", "apply"]);
}

proptest! {
    #[test]
    fn suggest_is_idempotent_and_duplicate_free(
        words in prop::collection::vec("[ab]{1,3}", 0..20),
        history in prop::collection::vec("[ab]{1,3}", 0..10),
        query in "[ab]{0,2}",
    ) {
        let storage = MemoryStorage::new()
            .with_file(WORDS, words.join("\n"))
            .with_file(HIST, history.join("\n"));
        let engine = SuggestionEngine::new(storage);
        let cfg = config(&[WORDS], Some(HIST));
        let a = engine.suggest(&query, &cfg).ranked;
        let b = engine.suggest(&query, &cfg).ranked;
        prop_assert_eq!(&a, &b);

        let texts = a.texts();
        let mut dedup = texts.clone();
        dedup.sort_unstable();
        dedup.dedup();
        prop_assert_eq!(dedup.len(), texts.len());
        prop_assert!(texts.iter().all(|t| t.starts_with(query.as_str())));
    }
}
