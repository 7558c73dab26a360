//! X11 glue: rofi as the picker, xdotool for keystrokes, xsel for the
//! current selection.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use clap::ValueEnum;
use tracing::debug;

use suggest_core::session::{Picker, PickerError, TypeError, Typist};
use suggest_core::settings::{ActuationSettings, PickerSettings};

/// Display tweaks layered over the configured picker arguments.
#[derive(Debug, Clone, Default)]
pub struct PickerOptions {
    pub font: Option<String>,
    pub plain: bool,
    pub no_history: bool,
}

#[derive(Debug, Clone)]
pub struct RofiPicker {
    command: String,
    args: Vec<String>,
}

impl RofiPicker {
    pub fn new(settings: &PickerSettings, opts: &PickerOptions) -> Self {
        let mut args = settings.args.clone();
        args.push("-sep".into());
        args.push(settings.delimiter.to_string());
        args.push("-p".into());
        args.push(settings.prompt.clone());
        args.push(if opts.no_history {
            "-disable-history".into()
        } else {
            "-no-disable-history".into()
        });
        if !opts.plain {
            args.extend(settings.theme_args.iter().cloned());
        }
        args.push("-font".into());
        args.push(opts.font.clone().unwrap_or_else(|| settings.font.clone()));
        Self {
            command: settings.command.clone(),
            args,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn launch_error(&self, source: io::Error) -> PickerError {
        PickerError::Launch {
            command: self.command.clone(),
            source,
        }
    }
}

impl Picker for RofiPicker {
    fn pick(&self, payload: &str, _delimiter: char) -> Result<Option<String>, PickerError> {
        debug!(command = %self.command, bytes = payload.len(), "launching picker");
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(payload.as_bytes())
                .map_err(|e| self.launch_error(e))?;
        }
        let output = child.wait_with_output().map_err(|e| self.launch_error(e))?;

        // rofi exits non-zero when dismissed with Escape.
        if !output.status.success() {
            debug!(status = %output.status, "picker dismissed");
            return Ok(None);
        }
        let chosen = String::from_utf8(output.stdout).map_err(|_| PickerError::NotUtf8)?;
        let chosen = chosen.trim_end_matches(['\n', '\r']);
        Ok((!chosen.is_empty()).then(|| chosen.to_string()))
    }
}

/// Where the text cursor sits in the word to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AutoSelect {
    Beginning,
    Middle,
    End,
}

impl AutoSelect {
    pub fn key_presses(self) -> &'static [&'static str] {
        match self {
            AutoSelect::Beginning => &["Ctrl+Shift+Right"],
            AutoSelect::Middle => &["Ctrl+Left", "Ctrl+Shift+Right"],
            AutoSelect::End => &["Ctrl+Shift+Left"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct XdotoolTypist {
    command: String,
    line_delay: Duration,
}

impl XdotoolTypist {
    pub fn new(settings: &ActuationSettings) -> Self {
        Self {
            command: settings.type_command.clone(),
            line_delay: Duration::from_millis(settings.line_delay_ms),
        }
    }

    fn run(&self, args: &[&str]) -> Result<(), TypeError> {
        let fail = |source| TypeError {
            command: self.command.clone(),
            source,
        };
        let status = Command::new(&self.command)
            .args(args)
            .stdout(Stdio::null())
            .status()
            .map_err(fail)?;
        if !status.success() {
            return Err(fail(io::Error::other(format!("exited with {status}"))));
        }
        Ok(())
    }

    /// Select the word around the cursor so the selection command can read it.
    pub fn select_word(&self, mode: AutoSelect) -> Result<(), TypeError> {
        thread::sleep(self.line_delay);
        for keys in mode.key_presses() {
            self.run(&["key", keys])?;
        }
        Ok(())
    }
}

impl Typist for XdotoolTypist {
    fn erase_selection(&self) -> Result<(), TypeError> {
        self.run(&["key", "BackSpace"])
    }

    fn type_text(&self, text: &str) -> Result<(), TypeError> {
        self.run(&["type", "--clearmodifiers", "--", text])
    }

    fn line_break(&self) -> Result<(), TypeError> {
        self.run(&["key", "Shift+Return"])?;
        thread::sleep(self.line_delay);
        Ok(())
    }
}

/// Read the current primary selection, trimmed.
pub fn read_selection(command: &[String]) -> io::Result<String> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty selection command"))?;
    let output = Command::new(program)
        .args(args)
        .stderr(Stdio::null())
        .output()?;
    if !output.status.success() {
        return Err(io::Error::other(format!(
            "{program} exited with {}",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use suggest_core::settings::default_settings;

    #[test]
    fn rofi_args_follow_settings() {
        let settings = default_settings();
        let picker = RofiPicker::new(&settings.picker, &PickerOptions::default());
        let args = picker.args();
        assert_eq!(picker.command(), "rofi");
        assert_eq!(&args[..3], ["-dmenu", "-fuzzy", "-i"]);
        assert!(args.windows(2).any(|w| w == ["-sep", "|"]));
        assert!(args.iter().any(|a| a == "-hide-scrollbar"));
        assert!(args.iter().any(|a| a == "-no-disable-history"));
        assert_eq!(&args[args.len() - 2..], ["-font", "Monospace 10"]);
    }

    #[test]
    fn rofi_plain_with_font() {
        let settings = default_settings();
        let opts = PickerOptions {
            font: Some("DejaVu Sans 12".into()),
            plain: true,
            no_history: true,
        };
        let picker = RofiPicker::new(&settings.picker, &opts);
        let args = picker.args();
        assert!(!args.iter().any(|a| a == "-hide-scrollbar"));
        assert!(args.iter().any(|a| a == "-disable-history"));
        assert_eq!(args.last().map(String::as_str), Some("DejaVu Sans 12"));
    }

    #[test]
    fn picker_reads_choice_from_stdout() {
        let picker = RofiPicker {
            command: "sh".into(),
            args: vec!["-c".into(), "head -c 3; echo".into()],
        };
        assert_eq!(picker.pick("cat|dog", '|').unwrap().as_deref(), Some("cat"));
    }

    #[test]
    fn picker_nonzero_exit_is_dismissal() {
        let picker = RofiPicker {
            command: "sh".into(),
            args: vec!["-c".into(), "cat >/dev/null; exit 1".into()],
        };
        assert_eq!(picker.pick("cat|dog", '|').unwrap(), None);
    }

    #[test]
    fn missing_picker_is_launch_error() {
        let picker = RofiPicker {
            command: "/nonexistent/textsuggest-picker".into(),
            args: Vec::new(),
        };
        assert!(matches!(
            picker.pick("x", '|'),
            Err(PickerError::Launch { .. })
        ));
    }

    #[test]
    fn selection_is_trimmed() {
        let cmd = vec!["echo".to_string(), "  word  ".to_string()];
        assert_eq!(read_selection(&cmd).unwrap(), "word");
        assert!(read_selection(&[]).is_err());
    }

    #[test]
    fn auto_select_keys() {
        assert_eq!(AutoSelect::End.key_presses(), ["Ctrl+Shift+Left"]);
        assert_eq!(AutoSelect::Middle.key_presses().len(), 2);
    }
}
