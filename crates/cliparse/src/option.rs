//! Option descriptors and the handles returned when registering them

use std::{fmt, marker::PhantomData};

use crate::{FromArgument, NamedId};

/// A named option without a value, like `-v` or `--verbose`.
///
/// Every occurrence on the command line increments its count.
#[derive(Clone, Debug, Default)]
pub struct FlagOption {
    pub aliases: Vec<String>,
    pub description: String,
}

impl FlagOption {
    #[must_use]
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A named option that takes the next token as its value, like `--count 3`.
///
/// The option is required unless `T` is an [Option].
#[derive(Clone, Debug)]
pub struct KeyValueOption<T> {
    pub aliases: Vec<String>,
    pub description: String,

    /// The value of the option if it is not passed
    pub default: T,
}

impl<T: FromArgument + Default> KeyValueOption<T> {
    #[must_use]
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            description: String::new(),
            default: T::default(),
        }
    }
}

impl<T: FromArgument> KeyValueOption<T> {
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: T) -> Self {
        self.default = default;
        self
    }
}

/// An option that is matched by its position among all the tokens that are not named options.
#[derive(Clone, Debug)]
pub struct PositionalOption<T> {
    /// Only used for help messages
    pub name: String,
    pub description: String,
    pub default: T,
}

impl<T: FromArgument + Default> PositionalOption<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            default: T::default(),
        }
    }
}

impl<T: FromArgument + Default> Default for PositionalOption<T> {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl<T: FromArgument> PositionalOption<T> {
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: T) -> Self {
        self.default = default;
        self
    }
}

/// Refers to a registered [FlagOption]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlagHandle(pub(crate) NamedId);

impl FlagHandle {
    #[must_use]
    pub fn id(&self) -> NamedId {
        self.0
    }
}

/// Refers to a registered [KeyValueOption] holding a `T`
pub struct KeyValueHandle<T> {
    pub(crate) id: NamedId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> KeyValueHandle<T> {
    #[must_use]
    pub(crate) const fn new(id: NamedId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn id(&self) -> NamedId {
        self.id
    }
}

/// Refers to a registered [PositionalOption] holding a `T`
pub struct PositionalHandle<T> {
    pub(crate) position: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PositionalHandle<T> {
    #[must_use]
    pub(crate) const fn new(position: usize) -> Self {
        Self {
            position,
            _marker: PhantomData,
        }
    }

    /// The zero-based position this option is matched at
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

// Derives would put a bound on `T`
macro_rules! impl_handle_traits {
    ($handle: ident, $field: ident) => {
        impl<T> Clone for $handle<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $handle<T> {}

        impl<T> PartialEq for $handle<T> {
            fn eq(&self, other: &Self) -> bool {
                self.$field == other.$field
            }
        }

        impl<T> Eq for $handle<T> {}

        impl<T> fmt::Debug for $handle<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($handle))
                    .field(&self.$field)
                    .finish()
            }
        }
    };
}

impl_handle_traits!(KeyValueHandle, id);
impl_handle_traits!(PositionalHandle, position);
