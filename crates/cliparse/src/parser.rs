use std::collections::HashSet;

use crate::{
    store::{NamedOptionStore, PositionalOptionStore},
    AliasGroup, AliasGroups, FlagHandle, FlagOption, FromArgument, KeyValueHandle,
    KeyValueOption, NamedId, OptionKind, ParseError, PositionalHandle, PositionalOption,
    RegistrationError,
};

/// Parses command line arguments into the options registered with it.
///
/// The parser owns the parsed values. Registering an option returns a handle
/// that is used to read the value once [Parser::parse] has succeeded.
///
/// ```
/// use cliparse::{FlagOption, KeyValueOption, Parser, PositionalOption};
///
/// let mut parser = Parser::default();
/// let verbose = parser.register_flag(FlagOption::new(["-v", "--verbose"]));
/// let jobs = parser.register_key_value(KeyValueOption::<Option<u32>>::new(["-j", "--jobs"]));
/// let input = parser.register_positional(PositionalOption::<String>::new("input"));
///
/// parser.parse(["prog", "-v", "main.rs", "-j", "4", "-v"]).unwrap();
///
/// assert_eq!(parser.count(verbose), 2);
/// assert_eq!(parser.value(&jobs), &Some(4));
/// assert_eq!(parser.value(&input), "main.rs");
/// ```
#[derive(Default)]
pub struct Parser {
    named_options: NamedOptionStore,
    positional_options: PositionalOptionStore,

    /// Key-value options that must be passed, in registration order
    required_options: Vec<NamedId>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a flag, failing if its aliases cannot be used.
    pub fn try_register_flag(&mut self, option: FlagOption) -> Result<FlagHandle, RegistrationError> {
        self.named_options.register_flag(option).map(FlagHandle)
    }

    /// Registers a flag.
    ///
    /// # Panics
    /// Panics if the aliases are empty, contain whitespace, lack a `-` prefix
    /// or are already used by another option.
    pub fn register_flag(&mut self, option: FlagOption) -> FlagHandle {
        self.try_register_flag(option)
            .unwrap_or_else(|error| panic!("Invalid flag option: {error}"))
    }

    /// Registers a key-value option, failing if its aliases cannot be used.
    ///
    /// Unless `T` is an [Option], the option has to be passed on every parse.
    pub fn try_register_key_value<T: FromArgument>(
        &mut self,
        option: KeyValueOption<T>,
    ) -> Result<KeyValueHandle<T>, RegistrationError> {
        let id = self.named_options.register_key_value(option)?;

        if T::REQUIRED {
            self.required_options.push(id);
        }

        Ok(KeyValueHandle::new(id))
    }

    /// Registers a key-value option.
    ///
    /// # Panics
    /// Panics under the same conditions as [Parser::register_flag].
    pub fn register_key_value<T: FromArgument>(
        &mut self,
        option: KeyValueOption<T>,
    ) -> KeyValueHandle<T> {
        self.try_register_key_value(option)
            .unwrap_or_else(|error| panic!("Invalid key-value option: {error}"))
    }

    /// Registers the next positional option.
    ///
    /// Positional options are matched in the order they were registered in.
    pub fn register_positional<T: FromArgument>(
        &mut self,
        option: PositionalOption<T>,
    ) -> PositionalHandle<T> {
        PositionalHandle::new(self.positional_options.register(option))
    }

    /// Parses `arguments`, skipping the first one (the program name).
    ///
    /// Every token that exactly matches a registered alias is a named option, everything
    /// else is a positional argument. There is no support for `--key=value` or for
    /// grouping short flags.
    ///
    /// All option values are reset to their defaults before parsing.
    pub fn parse<I, S>(&mut self, arguments: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.named_options.reset();
        self.positional_options.reset();

        let mut not_visited: HashSet<NamedId> = self.required_options.iter().copied().collect();
        let mut position = 0;

        let mut arguments = arguments.into_iter().skip(1);
        while let Some(argument) = arguments.next() {
            let argument = argument.as_ref();
            let id = self.named_options.id_of(argument);

            if !id.is_valid() {
                log::trace!("{argument:?} is positional argument #{position}");

                self.positional_options.invoke_at(position, argument)?;
                position += 1;
                continue;
            }

            log::trace!("{argument:?} is {id}");
            not_visited.remove(&id);

            match id.kind() {
                OptionKind::Flag => self.named_options.invoke_flag(id),
                OptionKind::KeyValue => {
                    let Some(value) = arguments.next() else {
                        return Err(ParseError::BadKeyValueFormat {
                            alias: argument.to_string(),
                        });
                    };

                    self.named_options
                        .invoke_key_value(id, value.as_ref())
                        .map_err(|source| ParseError::BadValueConversion {
                            alias: argument.to_string(),
                            source,
                        })?;
                },
            }
        }

        if !not_visited.is_empty() {
            let missing: AliasGroups = self
                .required_options
                .iter()
                .filter(|id| not_visited.contains(*id))
                .map(|&id| self.named_options.alias_group(id))
                .collect();

            return Err(ParseError::MissingRequiredOptions { missing });
        }

        log::debug!("Parsed {position} positional arguments");
        Ok(())
    }

    /// Parses the arguments the current process was started with.
    pub fn parse_env(&mut self) -> Result<(), ParseError> {
        self.parse(std::env::args())
    }

    /// How often the flag was passed during the last parse
    #[must_use]
    pub fn count(&self, flag: FlagHandle) -> u32 {
        self.named_options.count(flag.0)
    }

    /// Whether the flag was passed at least once during the last parse
    #[must_use]
    pub fn is_set(&self, flag: FlagHandle) -> bool {
        self.count(flag) != 0
    }

    /// The current value of a key-value or positional option.
    ///
    /// # Panics
    /// Panics if the handle was returned by a different parser.
    #[must_use]
    pub fn value<H: ValueHandle>(&self, handle: &H) -> &H::Value {
        handle.get(self)
    }

    /// Moves the value out of the option, leaving its default behind.
    ///
    /// # Panics
    /// Panics if the handle was returned by a different parser.
    #[must_use]
    pub fn take<H: ValueHandle>(&mut self, handle: H) -> H::Value {
        handle.take(self)
    }

    #[must_use]
    pub fn id_of(&self, alias: &str) -> NamedId {
        self.named_options.id_of(alias)
    }

    /// The description of a named option
    ///
    /// # Panics
    /// Panics if `id` is [NamedId::INVALID] or was not issued by this parser.
    #[must_use]
    pub fn describe(&self, id: NamedId) -> &str {
        self.named_options.describe(id)
    }

    /// Every named option together with its aliases, in registration order
    pub fn alias_groups(&self) -> impl Iterator<Item = (NamedId, AliasGroup)> + '_ {
        self.named_options
            .ids()
            .map(|id| (id, self.named_options.alias_group(id)))
    }

    /// `(name, description)` of every positional option, in positional order
    pub fn positional_descriptions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.positional_options.descriptions()
    }

    /// Whether the option must be passed on every parse
    #[must_use]
    pub fn is_required(&self, id: NamedId) -> bool {
        self.required_options.contains(&id)
    }
}

/// A handle to an option that holds a typed value.
///
/// Implemented by [KeyValueHandle] and [PositionalHandle].
pub trait ValueHandle {
    type Value: FromArgument;

    fn get<'a>(&self, parser: &'a Parser) -> &'a Self::Value;

    fn take(&self, parser: &mut Parser) -> Self::Value;
}

impl<T: FromArgument> ValueHandle for KeyValueHandle<T> {
    type Value = T;

    fn get<'a>(&self, parser: &'a Parser) -> &'a T {
        parser.named_options.value(self.id)
    }

    fn take(&self, parser: &mut Parser) -> T {
        parser.named_options.take(self.id)
    }
}

impl<T: FromArgument> ValueHandle for PositionalHandle<T> {
    type Value = T;

    fn get<'a>(&self, parser: &'a Parser) -> &'a T {
        parser.positional_options.value(self.position)
    }

    fn take(&self, parser: &mut Parser) -> T {
        parser.positional_options.take(self.position)
    }
}
