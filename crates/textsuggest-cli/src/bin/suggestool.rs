use std::path::PathBuf;

use clap::{Parser, Subcommand};

use textsuggest_cli::commands::{config_ops, custom_ops, history_ops, list_ops};
use textsuggest_cli::trace_init;

#[derive(Parser)]
#[command(name = "suggestool", about = "textsuggest dictionary and history tool")]
struct Cli {
    /// Settings file (default: ~/.config/textsuggest/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the ranked suggestions for a query
    List {
        /// Query (empty lists everything)
        #[arg(default_value = "")]
        query: String,
        /// Prefer this language
        #[arg(long)]
        language: Option<String>,
        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print what accepting a dictionary line would type
    Realize {
        /// Dictionary line, e.g. "brb=be right back", "#date" or "%2**10"
        line: String,
    },
    /// Manage custom words
    Custom {
        /// Custom words file (default: from settings)
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(subcommand)]
        action: CustomAction,
    },
    /// Inspect or trim the usage history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

#[derive(Subcommand)]
enum CustomAction {
    /// Add a word, alias or command line
    Add { line: String },
    /// Remove a line
    Remove { line: String },
    /// List all custom lines
    List,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Most used entries
    Stats {
        #[arg(short, long, default_value = "20")]
        n: usize,
    },
    /// Keep only the most recent lines
    Compact {
        #[arg(long)]
        keep: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    let home = config_ops::home_dir();
    let home = home.as_deref();
    trace_init::init_tracing(&config_ops::config_dir(home));

    let load = || config_ops::load_settings_or_exit(cli.config.as_deref(), home);

    match cli.command {
        Command::List {
            query,
            language,
            json,
        } => {
            let mut settings = load();
            if let Some(lang) = language {
                settings.prefer_language(&lang);
            }
            list_ops::list(&settings, home, &query, json);
        }
        Command::Realize { line } => list_ops::realize_line(&line),
        Command::Custom { file, action } => {
            let path = file.unwrap_or_else(|| load().custom_words_path(home));
            match action {
                CustomAction::Add { line } => custom_ops::custom_add(&path, &line),
                CustomAction::Remove { line } => custom_ops::custom_remove(&path, &line),
                CustomAction::List => custom_ops::custom_list(&path),
            }
        }
        Command::History { action } => {
            let store = load().history_store(home);
            match action {
                HistoryAction::Stats { n } => history_ops::history_stats(&store, n),
                HistoryAction::Compact { keep } => history_ops::history_compact(&store, keep),
            }
        }
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
