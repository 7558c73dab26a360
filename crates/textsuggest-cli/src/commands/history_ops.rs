use suggest_core::history::HistoryStore;
use suggest_core::storage::FsStorage;

pub fn history_stats(store: &HistoryStore, limit: usize) {
    let Some(path) = store.path() else {
        println!("History is disabled");
        return;
    };
    let stats = die!(store.stats(&FsStorage), "Error: {}");
    if stats.is_empty() {
        println!("(empty)");
        return;
    }
    let total: usize = stats.iter().map(|(_, n)| n).sum();
    for (text, n) in stats.iter().take(limit) {
        println!("{n:>6}  {text}");
    }
    println!("---");
    println!(
        "{} distinct, {total} total ({})",
        stats.len(),
        path.display()
    );
}

pub fn history_compact(store: &HistoryStore, keep: usize) {
    if !store.is_enabled() {
        println!("History is disabled");
        return;
    }
    let removed = die!(store.compact(&FsStorage, keep), "Error: {}");
    println!("Removed {removed} lines, kept at most {keep}");
}
