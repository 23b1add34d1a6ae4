//! Storage for registered options.
//!
//! Both stores keep options of different value types in one flat table by erasing the
//! value type behind [ValueSlot]. The typed value is recovered through a handle that
//! remembers the type it was registered with.

use std::{any::Any, collections::HashMap, mem};

use crate::{
    AliasGroup, ConversionError, FlagOption, FromArgument, KeyValueOption, NamedId, OptionKind,
    ParseError, PositionalOption, RegistrationError,
};

/// A type-erased value that can be assigned from a command line token
trait ValueSlot {
    fn assign(&mut self, argument: &str) -> Result<(), ConversionError>;

    /// Restore the value the slot was registered with
    fn reset(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct TypedSlot<T> {
    value: T,
    default: T,
}

impl<T: FromArgument> TypedSlot<T> {
    fn new(default: T) -> Self {
        Self {
            value: default.clone(),
            default,
        }
    }

    fn take(&mut self) -> T {
        mem::replace(&mut self.value, self.default.clone())
    }
}

impl<T: FromArgument> ValueSlot for TypedSlot<T> {
    fn assign(&mut self, argument: &str) -> Result<(), ConversionError> {
        self.value = T::from_argument(argument)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn downcast<T: FromArgument>(slot: &dyn ValueSlot) -> &TypedSlot<T> {
    slot.as_any()
        .downcast_ref()
        .unwrap_or_else(|| panic!("option does not hold a {}", T::type_name()))
}

fn downcast_mut<T: FromArgument>(slot: &mut dyn ValueSlot) -> &mut TypedSlot<T> {
    slot.as_any_mut()
        .downcast_mut()
        .unwrap_or_else(|| panic!("option does not hold a {}", T::type_name()))
}

struct FlagEntry {
    count: u32,
    aliases: Vec<String>,
    description: String,
}

struct KeyValueEntry {
    slot: Box<dyn ValueSlot>,
    aliases: Vec<String>,
    description: String,
}

/// Holds all flag and key-value options and maps their aliases to their [NamedId].
#[derive(Default)]
pub struct NamedOptionStore {
    alias_to_id: HashMap<String, NamedId>,
    flags: Vec<FlagEntry>,
    key_values: Vec<KeyValueEntry>,

    /// Every issued id, in registration order
    registered: Vec<NamedId>,
}

impl NamedOptionStore {
    /// Checks that `aliases` can be bound to a new option.
    ///
    /// Nothing is modified, so a rejected registration leaves the store untouched.
    fn validate_aliases(&self, aliases: &[String]) -> Result<(), RegistrationError> {
        if aliases.is_empty() {
            return Err(RegistrationError::EmptyAliases);
        }

        for (index, alias) in aliases.iter().enumerate() {
            if alias.chars().any(char::is_whitespace) {
                return Err(RegistrationError::AliasContainsWhitespace { alias: alias.clone() });
            }

            #[cfg(feature = "enforce-prefixes")]
            if !alias.starts_with('-') {
                return Err(RegistrationError::MissingPrefix { alias: alias.clone() });
            }

            if self.alias_to_id.contains_key(alias) || aliases[..index].contains(alias) {
                return Err(RegistrationError::DuplicateAlias { alias: alias.clone() });
            }
        }

        Ok(())
    }

    fn bind_aliases(&mut self, id: NamedId, aliases: &[String]) {
        log::debug!("Registering {id} with aliases {aliases:?}");

        self.alias_to_id.reserve(aliases.len());
        for alias in aliases {
            self.alias_to_id.insert(alias.clone(), id);
        }
        self.registered.push(id);
    }

    pub fn register_flag(&mut self, option: FlagOption) -> Result<NamedId, RegistrationError> {
        let FlagOption {
            aliases,
            description,
        } = option;

        self.validate_aliases(&aliases)?;

        let id = NamedId::new(OptionKind::Flag, self.flags.len());
        self.bind_aliases(id, &aliases);
        self.flags.push(FlagEntry {
            count: 0,
            aliases,
            description,
        });

        Ok(id)
    }

    pub fn register_key_value<T: FromArgument>(
        &mut self,
        option: KeyValueOption<T>,
    ) -> Result<NamedId, RegistrationError> {
        let KeyValueOption {
            aliases,
            description,
            default,
        } = option;

        self.validate_aliases(&aliases)?;

        let id = NamedId::new(OptionKind::KeyValue, self.key_values.len());
        self.bind_aliases(id, &aliases);
        self.key_values.push(KeyValueEntry {
            slot: Box::new(TypedSlot::new(default)),
            aliases,
            description,
        });

        Ok(id)
    }

    /// Returns [NamedId::INVALID] if `alias` is unknown.
    #[must_use]
    pub fn id_of(&self, alias: &str) -> NamedId {
        self.alias_to_id
            .get(alias)
            .copied()
            .unwrap_or(NamedId::INVALID)
    }

    fn flag(&self, id: NamedId) -> &FlagEntry {
        assert!(id.is_valid(), "cannot look up {id}");
        assert_eq!(id.kind(), OptionKind::Flag, "{id} is not a flag");
        &self.flags[id.index()]
    }

    fn flag_mut(&mut self, id: NamedId) -> &mut FlagEntry {
        assert!(id.is_valid(), "cannot look up {id}");
        assert_eq!(id.kind(), OptionKind::Flag, "{id} is not a flag");
        &mut self.flags[id.index()]
    }

    fn key_value(&self, id: NamedId) -> &KeyValueEntry {
        assert!(id.is_valid(), "cannot look up {id}");
        assert_eq!(id.kind(), OptionKind::KeyValue, "{id} is not a key-value option");
        &self.key_values[id.index()]
    }

    fn key_value_mut(&mut self, id: NamedId) -> &mut KeyValueEntry {
        assert!(id.is_valid(), "cannot look up {id}");
        assert_eq!(id.kind(), OptionKind::KeyValue, "{id} is not a key-value option");
        &mut self.key_values[id.index()]
    }

    /// # Panics
    /// Panics if `id` does not refer to a flag of this store.
    pub fn invoke_flag(&mut self, id: NamedId) {
        let entry = self.flag_mut(id);
        entry.count = entry.count.saturating_add(1);
    }

    /// Converts `value` and stores the result in the option.
    ///
    /// # Panics
    /// Panics if `id` does not refer to a key-value option of this store.
    pub fn invoke_key_value(&mut self, id: NamedId, value: &str) -> Result<(), ConversionError> {
        self.key_value_mut(id).slot.assign(value)
    }

    /// # Panics
    /// Panics if `id` does not refer to a flag of this store.
    #[must_use]
    pub fn count(&self, id: NamedId) -> u32 {
        self.flag(id).count
    }

    #[must_use]
    pub fn value<T: FromArgument>(&self, id: NamedId) -> &T {
        &downcast::<T>(self.key_value(id).slot.as_ref()).value
    }

    #[must_use]
    pub fn take<T: FromArgument>(&mut self, id: NamedId) -> T {
        downcast_mut::<T>(self.key_value_mut(id).slot.as_mut()).take()
    }

    /// The description the option was registered with
    ///
    /// # Panics
    /// Panics if `id` is [NamedId::INVALID] or was issued by a different store.
    #[must_use]
    pub fn describe(&self, id: NamedId) -> &str {
        match id.kind() {
            OptionKind::Flag => &self.flag(id).description,
            OptionKind::KeyValue => &self.key_value(id).description,
        }
    }

    /// All aliases of the option, in the order they were registered in
    ///
    /// # Panics
    /// Panics if `id` is [NamedId::INVALID] or was issued by a different store.
    #[must_use]
    pub fn aliases_of(&self, id: NamedId) -> &[String] {
        match id.kind() {
            OptionKind::Flag => &self.flag(id).aliases,
            OptionKind::KeyValue => &self.key_value(id).aliases,
        }
    }

    /// # Panics
    /// Panics under the same conditions as [NamedOptionStore::aliases_of].
    #[must_use]
    pub fn alias_group(&self, id: NamedId) -> AliasGroup {
        AliasGroup::new(self.aliases_of(id))
    }

    /// Every registered id, in registration order
    pub fn ids(&self) -> impl Iterator<Item = NamedId> + '_ {
        self.registered.iter().copied()
    }

    /// Restores every option to the state it had right after registration
    pub fn reset(&mut self) {
        for flag in &mut self.flags {
            flag.count = 0;
        }

        for key_value in &mut self.key_values {
            key_value.slot.reset();
        }
    }
}

struct PositionalEntry {
    slot: Box<dyn ValueSlot>,
    name: String,
    description: String,
}

/// Holds positional options, addressed by the order they were registered in.
#[derive(Default)]
pub struct PositionalOptionStore {
    options: Vec<PositionalEntry>,
}

impl PositionalOptionStore {
    /// Returns the position the option will be matched at
    pub fn register<T: FromArgument>(&mut self, option: PositionalOption<T>) -> usize {
        let PositionalOption {
            name,
            description,
            default,
        } = option;

        let position = self.options.len();
        log::debug!("Registering positional option {name:?} at position {position}");

        self.options.push(PositionalEntry {
            slot: Box::new(TypedSlot::new(default)),
            name,
            description,
        });
        position
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Converts `value` and stores it in the option at `position`.
    ///
    /// Fails with [ParseError::TooManyPositional] if there is no option at `position`.
    pub fn invoke_at(&mut self, position: usize, value: &str) -> Result<(), ParseError> {
        let max = self.options.len();
        let Some(option) = self.options.get_mut(position) else {
            return Err(ParseError::TooManyPositional {
                token: value.to_string(),
                max,
            });
        };

        option
            .slot
            .assign(value)
            .map_err(|source| ParseError::BadPositionalConversion { position, source })
    }

    #[must_use]
    pub fn value<T: FromArgument>(&self, position: usize) -> &T {
        &downcast::<T>(self.options[position].slot.as_ref()).value
    }

    #[must_use]
    pub fn take<T: FromArgument>(&mut self, position: usize) -> T {
        downcast_mut::<T>(self.options[position].slot.as_mut()).take()
    }

    /// `(name, description)` of every option, in positional order
    pub fn descriptions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .iter()
            .map(|option| (option.name.as_str(), option.description.as_str()))
    }

    pub fn reset(&mut self) {
        for option in &mut self.options {
            option.slot.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag_option(aliases: &[&str]) -> FlagOption {
        FlagOption::new(aliases.iter().copied())
    }

    #[test]
    fn unknown_alias_is_invalid() {
        let mut store = NamedOptionStore::default();
        store.register_flag(flag_option(&["-v", "--verbose"])).unwrap();

        assert_eq!(store.id_of("--value"), NamedId::INVALID);
        assert_eq!(store.id_of("-V"), NamedId::INVALID);
        assert_eq!(store.id_of(""), NamedId::INVALID);
    }

    #[test]
    fn aliases_share_one_id() {
        let mut store = NamedOptionStore::default();
        let id = store.register_flag(flag_option(&["-v", "--verbose"])).unwrap();

        assert_eq!(store.id_of("-v"), id);
        assert_eq!(store.id_of("--verbose"), id);
        assert_eq!(store.id_of("-v"), store.id_of("-v"));
        assert_eq!(id.kind(), OptionKind::Flag);
    }

    #[test]
    fn indices_are_counted_per_kind() {
        let mut store = NamedOptionStore::default();
        let flag = store.register_flag(flag_option(&["-a"])).unwrap();
        let key_value = store
            .register_key_value(KeyValueOption::<i32>::new(["-b"]))
            .unwrap();
        let second_flag = store.register_flag(flag_option(&["-c"])).unwrap();

        assert_eq!(flag, NamedId::new(OptionKind::Flag, 0));
        assert_eq!(key_value, NamedId::new(OptionKind::KeyValue, 0));
        assert_eq!(second_flag, NamedId::new(OptionKind::Flag, 1));
        assert_eq!(
            store.ids().collect::<Vec<_>>(),
            [flag, key_value, second_flag]
        );
    }

    #[test]
    fn invalid_aliases_are_rejected() {
        let mut store = NamedOptionStore::default();
        store.register_flag(flag_option(&["--taken"])).unwrap();

        assert_eq!(store.register_flag(flag_option(&[])), Err(RegistrationError::EmptyAliases));
        assert_eq!(
            store.register_flag(flag_option(&["--a b"])),
            Err(RegistrationError::AliasContainsWhitespace { alias: "--a b".to_string() })
        );
        assert_eq!(
            store.register_key_value(KeyValueOption::<u8>::new(["--new", "--taken"])),
            Err(RegistrationError::DuplicateAlias { alias: "--taken".to_string() })
        );
        assert_eq!(
            store.register_flag(flag_option(&["-x", "-x"])),
            Err(RegistrationError::DuplicateAlias { alias: "-x".to_string() })
        );

        // Rejected registrations must not leave any aliases behind
        assert_eq!(store.id_of("--new"), NamedId::INVALID);
        assert_eq!(store.id_of("-x"), NamedId::INVALID);
    }

    #[cfg(feature = "enforce-prefixes")]
    #[test]
    fn aliases_need_a_prefix() {
        let mut store = NamedOptionStore::default();

        assert_eq!(
            store.register_flag(flag_option(&["verbose"])),
            Err(RegistrationError::MissingPrefix { alias: "verbose".to_string() })
        );
    }

    #[test]
    fn invoke_options() {
        let mut store = NamedOptionStore::default();
        let flag = store.register_flag(flag_option(&["-v"])).unwrap();
        let key_value = store
            .register_key_value(KeyValueOption::<i32>::new(["--value"]))
            .unwrap();

        store.invoke_flag(flag);
        store.invoke_flag(flag);
        store.invoke_key_value(key_value, "10").unwrap();

        assert_eq!(store.count(flag), 2);
        assert_eq!(*store.value::<i32>(key_value), 10);
        assert_eq!(
            store.invoke_key_value(key_value, "abc"),
            Err(ConversionError {
                value: "abc".to_string(),
                type_name: "i32".to_string(),
            })
        );

        store.reset();
        assert_eq!(store.count(flag), 0);
        assert_eq!(*store.value::<i32>(key_value), 0);
    }

    #[test]
    #[should_panic]
    fn invoke_flag_with_key_value_id() {
        let mut store = NamedOptionStore::default();
        let key_value = store
            .register_key_value(KeyValueOption::<i32>::new(["--value"]))
            .unwrap();

        store.invoke_flag(key_value);
    }

    #[test]
    #[should_panic(expected = "cannot look up <invalid>")]
    fn describe_invalid_id() {
        let mut store = NamedOptionStore::default();
        store.register_flag(flag_option(&["-v"])).unwrap();

        let _ = store.describe(NamedId::INVALID);
    }

    #[test]
    fn describe_and_alias_groups() {
        let mut store = NamedOptionStore::default();
        let flag = store
            .register_flag(flag_option(&["-v", "--verbose"]).description("Print more"))
            .unwrap();

        assert_eq!(store.describe(flag), "Print more");
        assert_eq!(store.alias_group(flag).to_string(), "-v | --verbose");
    }

    #[test]
    fn positional_store() {
        let mut store = PositionalOptionStore::default();
        let position = store.register(PositionalOption::<f64>::new("ratio"));
        assert_eq!(position, 0);

        store.invoke_at(0, "0.5").unwrap();
        assert_eq!(*store.value::<f64>(0), 0.5);

        assert_eq!(
            store.invoke_at(1, "2.71"),
            Err(ParseError::TooManyPositional {
                token: "2.71".to_string(),
                max: 1,
            })
        );
        assert_eq!(
            store.invoke_at(0, "e"),
            Err(ParseError::BadPositionalConversion {
                position: 0,
                source: ConversionError::new::<f64>("e"),
            })
        );
        assert_eq!(store.descriptions().collect::<Vec<_>>(), [("ratio", "")]);
    }

    #[test]
    fn take_leaves_default_behind() {
        let mut store = PositionalOptionStore::default();
        store.register(PositionalOption::<String>::new("name").default_value("x".to_string()));

        store.invoke_at(0, "y").unwrap();
        assert_eq!(store.take::<String>(0), "y");
        assert_eq!(store.value::<String>(0), "x");
    }
}
