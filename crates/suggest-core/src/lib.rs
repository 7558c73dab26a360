pub mod custom_words;
pub mod engine;
pub mod entry;
pub mod history;
pub mod matcher;
pub mod ranker;
pub mod realize;
pub mod session;
pub mod settings;
pub mod source;
pub mod storage;

pub use engine::{suggest, SuggestConfig, SuggestionEngine, Suggestions};
pub use entry::{Entry, EntryKind};
pub use ranker::{Candidate, RankedList};
