//! Parsing of REPL input lines.

use algoscope_core::session::InputMode;

/// Slash commands offered for completion, in help order.
pub const COMMANDS: &[&str] = &[
    "/new", "/list", "/switch", "/rename", "/mode", "/retry", "/theme", "/show", "/help", "/quit",
];

/// Arguments accepted by `/mode`.
pub const MODE_NAMES: &[&str] = &["pseudocode", "natural"];

/// Placeholder shown after a command that takes an argument.
pub fn argument_hint(command: &str) -> Option<&'static str> {
    match command {
        "/switch" => Some("<number|id>"),
        "/rename" => Some("<title>"),
        "/mode" => Some("pseudocode|natural"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New,
    List,
    /// 1-based position in `/list`, or a session id
    Switch(String),
    Rename(String),
    Mode(InputMode),
    Retry,
    Theme,
    Show,
    Help,
    Quit,
    /// Plain input, sent for analysis
    Send(String),
}

/// Parses one (possibly multi-line) input.
///
/// Input not starting with `/` is sent as-is after joining continuation
/// lines. Blank input yields `Ok(None)`.
///
/// # Errors
///
/// Returns a user-facing message for unknown commands or missing arguments.
pub fn parse_input(input: &str) -> Result<Option<Command>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !trimmed.starts_with('/') {
        return Ok(Some(Command::Send(join_continuations(input).trim().to_string())));
    }

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    let command = match name {
        "/new" => Command::New,
        "/list" | "/ls" => Command::List,
        "/switch" => Command::Switch(required(rest, "/switch <number|id>")?),
        "/rename" => Command::Rename(required(rest, "/rename <title>")?),
        "/mode" => Command::Mode(required(rest, "/mode pseudocode|natural")?.parse()?),
        "/retry" => Command::Retry,
        "/theme" => Command::Theme,
        "/show" => Command::Show,
        "/help" | "/?" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        other => return Err(format!("Unknown command: {other} (try /help)")),
    };
    Ok(Some(command))
}

fn required(arg: &str, usage: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(arg.to_string())
    }
}

/// Removes the trailing `\` of every continued line, keeping the line break.
pub fn join_continuations(input: &str) -> String {
    input
        .lines()
        .map(|line| line.strip_suffix('\\').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether the line asks to continue on the next line.
pub fn is_continued(line: &str) -> bool {
    line.ends_with('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_input_is_sent() {
        assert_eq!(
            parse_input("  x <- 1  ").unwrap(),
            Some(Command::Send("x <- 1".to_string()))
        );
        assert_eq!(parse_input("   ").unwrap(), None);
    }

    #[test]
    fn test_continuation_lines_are_joined() {
        let input = "for i <- 1 to n do\\\n  x <- x + i\\\nend";
        assert_eq!(
            parse_input(input).unwrap(),
            Some(Command::Send("for i <- 1 to n do\n  x <- x + i\nend".to_string()))
        );
        assert!(is_continued("do\\"));
        assert!(!is_continued("end"));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            parse_input("/mode natural").unwrap(),
            Some(Command::Mode(InputMode::Natural))
        );
        assert_eq!(
            parse_input("/rename   Heap sort ").unwrap(),
            Some(Command::Rename("Heap sort".to_string()))
        );
        assert_eq!(
            parse_input("/switch 2").unwrap(),
            Some(Command::Switch("2".to_string()))
        );
        assert_eq!(parse_input("/quit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_command_errors() {
        assert!(parse_input("/mode").unwrap_err().starts_with("Usage"));
        assert!(parse_input("/mode yaml").is_err());
        assert!(parse_input("/plan").unwrap_err().contains("Unknown command"));
    }
}
