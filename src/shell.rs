// src/shell.rs

use crate::controller::RangeRequest;

pub const USAGE: &str = "expected `<start> <end>` (YYYY-MM-DD), or `quit`";

/// One line typed into the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Submit(RangeRequest),
    Quit,
    Blank,
}

/// Dates are kept as text here; they are parsed when the render runs so a
/// bad date surfaces as a render failure.
pub fn parse_command(line: &str) -> Result<ShellCommand, &'static str> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Ok(ShellCommand::Blank),
        [word] if matches!(word.to_ascii_lowercase().as_str(), "quit" | "exit") => {
            Ok(ShellCommand::Quit)
        }
        [start, end] => Ok(ShellCommand::Submit(RangeRequest::new(*start, *end))),
        _ => Err(USAGE),
    }
}
