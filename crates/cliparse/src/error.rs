use std::fmt;

use error_derive::Error;

use crate::ConversionError;

/// Separates the aliases of one option in diagnostics
pub const ALIAS_SEPARATOR: &str = " | ";

/// The aliases of a single named option, like `-v | --verbose`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasGroup(Vec<String>);

impl AliasGroup {
    #[must_use]
    pub fn new(aliases: &[String]) -> Self {
        Self(aliases.to_vec())
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for AliasGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(ALIAS_SEPARATOR))
    }
}

/// The options that were required but not passed, one [AliasGroup] per option
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasGroups(Vec<AliasGroup>);

impl AliasGroups {
    #[must_use]
    pub fn groups(&self) -> &[AliasGroup] {
        &self.0
    }

    /// Whether any of the groups contains `alias`
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.0
            .iter()
            .any(|group| group.aliases().iter().any(|a| a == alias))
    }
}

impl FromIterator<AliasGroup> for AliasGroups {
    fn from_iter<I: IntoIterator<Item = AliasGroup>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for AliasGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.0 {
            write!(f, "\n\t> {group}")?;
        }
        Ok(())
    }
}

/// Invalid user input encountered while parsing the command line.
///
/// Parsing stops at the first error. Options matched before the error
/// may already hold their new values.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// More tokens were passed than positional options are registered.
    ///
    /// Misspelled option names are treated as positional arguments, so they
    /// usually end up here.
    #[msg = "while parsing '{token}': program expects at most {max} positional arguments"]
    TooManyPositional { token: String, max: usize },

    #[msg = "while parsing positional argument #{position}: {source}"]
    BadPositionalConversion {
        position: usize,
        source: ConversionError,
    },

    #[msg = "while parsing '{alias}': {source}"]
    BadValueConversion {
        alias: String,
        source: ConversionError,
    },

    /// A key-value option was the last token, so it has no value
    #[msg = "while parsing '{alias}': expected a value, but none was provided"]
    BadKeyValueFormat { alias: String },

    #[msg = "required options were not provided:{missing}"]
    MissingRequiredOptions { missing: AliasGroups },
}

impl ParseError {
    /// The token the error is about
    #[must_use]
    pub fn failed_expression(&self) -> &str {
        match self {
            Self::TooManyPositional { token, .. } => token,
            Self::BadPositionalConversion { source, .. } => &source.value,
            Self::BadValueConversion { alias, .. } | Self::BadKeyValueFormat { alias } => alias,
            Self::MissingRequiredOptions { .. } => "",
        }
    }
}

/// Reasons why an option cannot be registered.
///
/// These indicate a bug in the program defining the options, not bad user input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[msg = "named options must have at least one alias"]
    EmptyAliases,

    #[msg = "alias '{alias}' is already registered"]
    DuplicateAlias { alias: String },

    #[msg = "alias '{alias}' contains whitespace"]
    AliasContainsWhitespace { alias: String },

    #[msg = "alias '{alias}' does not start with '-' or '--'"]
    MissingPrefix { alias: String },
}
