//! rustyline helper: slash-command completion, hints, highlighting and
//! line continuation.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::commands::{COMMANDS, MODE_NAMES, argument_hint, is_continued};

#[derive(Clone, Default)]
pub struct CliHelper;

impl CliHelper {
    pub fn new() -> Self {
        Self
    }
}

fn pairs<'a>(words: impl Iterator<Item = &'a &'a str>) -> Vec<Pair> {
    words
        .map(|word| Pair {
            display: word.to_string(),
            replacement: word.to_string(),
        })
        .collect()
}

/// Text to show greyed out after the cursor.
///
/// Completes a partial command or mode name, and shows the expected argument
/// once a command is followed by a space.
fn hint_for(line: &str) -> Option<String> {
    if !line.starts_with('/') {
        return None;
    }
    match line.split_once(' ') {
        None => COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string()),
        Some(("/mode", prefix)) if !prefix.is_empty() => MODE_NAMES
            .iter()
            .find(|mode| mode.starts_with(prefix) && mode.len() > prefix.len())
            .map(|mode| mode[prefix.len()..].to_string()),
        Some((command, "")) => argument_hint(command).map(str::to_string),
        Some(_) => None,
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            Ok((0, pairs(COMMANDS.iter().filter(|cmd| cmd.starts_with(line)))))
        } else if let Some(prefix) = line.strip_prefix("/mode ") {
            let start = line.len() - prefix.len();
            Ok((start, pairs(MODE_NAMES.iter().filter(|mode| mode.starts_with(prefix)))))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    /// Known commands in cyan, unknown ones in red; message text untouched.
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        let (name, rest) = line.split_at(line.find(' ').unwrap_or(line.len()));
        let name = if COMMANDS.iter().any(|cmd| *cmd == name) {
            name.bright_cyan()
        } else {
            name.red()
        };
        Owned(format!("{name}{rest}"))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        hint_for(&line[..pos])
    }
}

impl Validator for CliHelper {
    /// A trailing `\` keeps the editor open for another line.
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if is_continued(ctx.input()) {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}
