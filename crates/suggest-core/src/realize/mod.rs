//! Turn a chosen entry into the text that gets typed.
//!
//! Only ever called for the entry the user picked, so listing a command or an
//! expression never runs or evaluates it.

pub mod math;

use std::process::{Command, ExitStatus};

use tracing::{debug, debug_span};

use crate::entry::{Entry, EntryKind};

pub use math::{evaluate, MathError, Value};

#[derive(Debug, thiserror::Error)]
pub enum RealizeError {
    #[error("failed to run `{template}`: {source}")]
    Command {
        template: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{template}` exited with {status}")]
    CommandFailed { template: String, status: ExitStatus },
    #[error("output of `{template}` is not UTF-8")]
    NotUtf8 { template: String },
    #[error("cannot evaluate `{expr}`: {source}")]
    Math {
        expr: String,
        #[source]
        source: MathError,
    },
}

/// Runs command templates and captures their standard output.
pub trait CommandRunner {
    fn run(&self, template: &str) -> Result<String, RealizeError>;
}

/// `sh -c <template>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, template: &str) -> Result<String, RealizeError> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(template)
            .output()
            .map_err(|source| RealizeError::Command {
                template: template.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(RealizeError::CommandFailed {
                template: template.to_string(),
                status: output.status,
            });
        }
        String::from_utf8(output.stdout).map_err(|_| RealizeError::NotUtf8 {
            template: template.to_string(),
        })
    }
}

/// Text to type, one element per line. Multi-line command output is typed
/// line by line with a line break after each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Produced {
    lines: Vec<String>,
}

impl Produced {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
        }
    }

    fn from_output(output: &str) -> Self {
        let output = output.trim_end();
        if output.is_empty() {
            return Self::default();
        }
        Self {
            lines: output
                .split('\n')
                .map(|l| l.trim_end_matches('\r').to_string())
                .collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_multiline(&self) -> bool {
        self.lines.len() > 1
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn map_first(mut self, f: impl FnOnce(&str) -> String) -> Self {
        if let Some(first) = self.lines.first_mut() {
            *first = f(first);
        }
        self
    }
}

/// Produce the text for `entry`, running or evaluating it if needed.
pub fn realize(entry: &Entry, runner: &dyn CommandRunner) -> Result<Produced, RealizeError> {
    let _span = debug_span!("realize", text = %entry.text, kind = ?entry.kind).entered();
    let body = entry.expansion.as_deref().unwrap_or(&entry.text);

    let produced = match entry.kind {
        EntryKind::Word => Produced::single(entry.text.trim_end()),
        EntryKind::Alias => Produced::single(body.trim_end()),
        EntryKind::Command => Produced::from_output(&runner.run(body)?),
        EntryKind::MathExpr => {
            let value = evaluate(body).map_err(|source| RealizeError::Math {
                expr: body.to_string(),
                source,
            })?;
            Produced::single(value.to_string())
        }
    };
    debug!(lines = produced.lines().len());
    Ok(produced)
}

/// Like [`realize`], capitalizing a plain word when the user's own word
/// started with an uppercase letter.
pub fn realize_for_query(
    entry: &Entry,
    query: &str,
    runner: &dyn CommandRunner,
) -> Result<Produced, RealizeError> {
    let produced = realize(entry, runner)?;
    let starts_upper = query.chars().next().is_some_and(char::is_uppercase);
    if starts_upper && entry.kind == EntryKind::Word {
        return Ok(produced.map_first(capitalize));
    }
    Ok(produced)
}

/// First character uppercased, the rest lowercased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
