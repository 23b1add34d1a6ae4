//! Usage text for the options registered with a [Parser]

use std::fmt;

use crate::Parser;

/// Tokens that request the help message instead of a regular parse
pub const HELP_ALIASES: [&str; 2] = ["-h", "--help"];

/// Descriptions are wrapped after this many characters
const COLUMN_WIDTH: usize = 80;

/// Whether the program should print its help message instead of parsing `arguments`.
///
/// That is the case if no arguments besides the program name were passed or if any of
/// them is `-h` or `--help`.
#[must_use]
pub fn is_help_requested<S: AsRef<str>>(arguments: &[S]) -> bool {
    arguments.len() <= 1
        || arguments[1..]
            .iter()
            .any(|argument| HELP_ALIASES.contains(&argument.as_ref()))
}

/// Lists every positional option followed by every named option, each with its description.
///
/// ```
/// use cliparse::{help::HelpMessage, FlagOption, Parser};
///
/// let mut parser = Parser::new();
/// parser.register_flag(FlagOption::new(["-v", "--verbose"]).description("Print more"));
///
/// assert_eq!(
///     HelpMessage::new(&parser).to_string(),
///     "-v | --verbose:\n  Print more\n\n"
/// );
/// ```
pub struct HelpMessage<'a> {
    parser: &'a Parser,
}

impl<'a> HelpMessage<'a> {
    #[must_use]
    pub fn new(parser: &'a Parser) -> Self {
        Self { parser }
    }
}

fn write_entry(f: &mut fmt::Formatter<'_>, header: &str, description: &str) -> fmt::Result {
    writeln!(f, "{header}:")?;

    let characters: Vec<char> = description.chars().collect();
    for line in characters.chunks(COLUMN_WIDTH) {
        writeln!(f, "  {}", line.iter().collect::<String>())?;
    }

    writeln!(f)
}

impl<'a> fmt::Display for HelpMessage<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, description) in self.parser.positional_descriptions() {
            write_entry(f, name, description)?;
        }

        for (id, aliases) in self.parser.alias_groups() {
            write_entry(f, &aliases.to_string(), self.parser.describe(id))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyValueOption, PositionalOption};

    #[test]
    fn help_requests() {
        assert!(is_help_requested(&["prog"]));
        assert!(is_help_requested::<&str>(&[]));
        assert!(is_help_requested(&["prog", "-v", "--help"]));
        assert!(is_help_requested(&["prog", "-h"]));
        assert!(!is_help_requested(&["prog", "-v"]));

        // The program name is never an option
        assert!(!is_help_requested(&["-h", "-v"]));
    }

    #[test]
    fn positional_options_come_first() {
        let mut parser = Parser::new();
        parser.register_key_value(
            KeyValueOption::<u32>::new(["-n", "--count"]).description("How many"),
        );
        parser.register_positional(PositionalOption::<String>::new("input").description("File"));

        assert_eq!(
            HelpMessage::new(&parser).to_string(),
            "input:\n  File\n\n-n | --count:\n  How many\n\n"
        );
    }

    #[test]
    fn long_descriptions_are_wrapped() {
        let mut parser = Parser::new();
        parser.register_positional(
            PositionalOption::<String>::new("input").description("x".repeat(COLUMN_WIDTH + 1)),
        );

        let help = HelpMessage::new(&parser).to_string();
        let lines: Vec<&str> = help.lines().collect();
        assert_eq!(lines[1].len(), COLUMN_WIDTH + 2);
        assert_eq!(lines[2], "  x");
    }
}
