use std::path::PathBuf;
use std::process;

use clap::Parser;

use textsuggest_cli::commands::{config_ops, suggest_ops};
use textsuggest_cli::shims::{AutoSelect, PickerOptions};
use textsuggest_cli::trace_init;

#[derive(Parser)]
#[command(name = "textsuggest", about = "Word completion for any X11 application")]
struct Cli {
    /// Word to give suggestions for (default: the current X selection)
    #[arg(long, num_args = 1..)]
    word: Vec<String>,
    /// Insert a suggestion at the cursor instead of completing a word
    #[arg(long)]
    no_selection: bool,
    /// Select the word under the cursor before reading the selection
    #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "end")]
    auto_selection: Option<AutoSelect>,
    /// Neither show nor record history
    #[arg(long)]
    no_history: bool,
    /// Language to prefer over the configured ones
    #[arg(long)]
    language: Option<String>,
    /// Picker font in Pango format, e.g. "Monospace 10"
    #[arg(long, num_args = 1..)]
    font: Vec<String>,
    /// Do not apply the picker theme
    #[arg(long)]
    no_rofi_customization: bool,
    /// Settings file (default: ~/.config/textsuggest/settings.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the picker payload instead of showing the picker
    #[arg(long)]
    print: bool,
}

fn main() {
    let cli = Cli::parse();
    trace_init::init_tracing(&config_ops::config_dir(config_ops::home_dir().as_deref()));

    let source =
        suggest_ops::QuerySource::from_flags(cli.no_selection, &cli.word, cli.auto_selection);
    let opts = suggest_ops::SuggestOptions {
        config: cli.config,
        language: cli.language,
        no_history: cli.no_history,
        picker: PickerOptions {
            font: (!cli.font.is_empty()).then(|| cli.font.join(" ")),
            plain: cli.no_rofi_customization,
            no_history: cli.no_history,
        },
        print: cli.print,
    };
    process::exit(suggest_ops::run(source, &opts));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_auto_selection_means_end() {
        let cli = Cli::try_parse_from(["textsuggest", "--auto-selection"]).unwrap();
        assert_eq!(cli.auto_selection, Some(AutoSelect::End));

        let cli = Cli::try_parse_from(["textsuggest", "--auto-selection", "middle"]).unwrap();
        assert_eq!(cli.auto_selection, Some(AutoSelect::Middle));

        let cli = Cli::try_parse_from(["textsuggest", "--auto-selection", "--no-history"]).unwrap();
        assert_eq!(cli.auto_selection, Some(AutoSelect::End));
        assert!(cli.no_history);

        let cli = Cli::try_parse_from(["textsuggest"]).unwrap();
        assert_eq!(cli.auto_selection, None);
    }
}
