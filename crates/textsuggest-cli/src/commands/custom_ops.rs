use std::path::Path;

use suggest_core::custom_words::CustomWords;
use suggest_core::storage::FsStorage;

pub fn custom_add(path: &Path, line: &str) {
    let mut words = die!(
        CustomWords::open(&FsStorage, path),
        "Error opening custom words: {}"
    );
    if words.register(line) {
        die!(words.save(&FsStorage, path), "Error saving custom words: {}");
        println!("Added: {}", line.trim());
    } else {
        println!("Already exists: {}", line.trim());
    }
}

pub fn custom_remove(path: &Path, line: &str) {
    let mut words = die!(
        CustomWords::open(&FsStorage, path),
        "Error opening custom words: {}"
    );
    if words.unregister(line) {
        die!(words.save(&FsStorage, path), "Error saving custom words: {}");
        println!("Removed: {}", line.trim());
    } else {
        println!("Not found: {}", line.trim());
    }
}

pub fn custom_list(path: &Path) {
    let words = die!(
        CustomWords::open(&FsStorage, path),
        "Error opening custom words: {}"
    );
    let lines = words.list();
    if lines.is_empty() {
        println!("(empty)");
    } else {
        for line in lines {
            println!("{line}");
        }
        println!("---");
        println!("{} entries", lines.len());
    }
}
