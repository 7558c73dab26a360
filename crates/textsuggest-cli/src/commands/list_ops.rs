use std::path::Path;

use serde::Serialize;

use suggest_core::matcher::MatchScore;
use suggest_core::realize::{realize, ShellRunner};
use suggest_core::settings::Settings;
use suggest_core::storage::FsStorage;
use suggest_core::{Entry, EntryKind, RankedList, SuggestionEngine};

#[derive(Serialize)]
struct CandidateJson<'a> {
    text: &'a str,
    kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    expansion: Option<&'a str>,
    score: MatchScore,
    usage: usize,
}

/// One text per line, or a JSON array with kind, expansion and usage.
pub fn render(ranked: &RankedList, json: bool) -> Result<String, serde_json::Error> {
    if !json {
        return Ok(ranked.texts().join("\n"));
    }
    let rows: Vec<CandidateJson<'_>> = ranked
        .iter()
        .map(|c| CandidateJson {
            text: c.text(),
            kind: c.entry.kind,
            expansion: c.entry.expansion.as_deref(),
            score: c.score,
            usage: c.usage,
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

pub fn list(settings: &Settings, home: Option<&Path>, query: &str, json: bool) {
    let config = settings.suggest_config(&FsStorage, home);
    let suggestions = SuggestionEngine::default().suggest(query, &config);
    for e in &suggestions.unavailable {
        eprintln!("Warning: {e}");
    }
    let out = die!(render(&suggestions.ranked, json), "Error: {}");
    if !out.is_empty() {
        println!("{out}");
    }
    if !json {
        eprintln!("--- {} candidates", suggestions.ranked.len());
    }
}

/// Produce what accepting `line` would type, without typing it.
pub fn realize_line(line: &str) {
    let Some(entry) = Entry::parse(line) else {
        eprintln!("Error: empty line");
        std::process::exit(1);
    };
    let produced = die!(realize(&entry, &ShellRunner), "Error: {}");
    for l in produced.lines() {
        println!("{l}");
    }
}
