//! Identities of registered named options

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKind {
    /// An option without a value that counts its occurrences
    Flag,

    /// An option that consumes the token following it as its value
    KeyValue,
}

/// Names a registered flag or key-value option without holding on to the option itself.
///
/// Indices are handed out densely, starting at zero, separately for every [OptionKind].
/// Only the [NamedOptionStore](crate::store::NamedOptionStore) creates valid ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedId {
    kind: OptionKind,
    index: u32,
}

impl NamedId {
    /// Returned when looking up an alias that was never registered
    pub const INVALID: Self = Self {
        kind: OptionKind::Flag,
        index: u32::MAX,
    };

    #[must_use]
    pub(crate) const fn new(kind: OptionKind, index: usize) -> Self {
        assert!(index < u32::MAX as usize, "too many options registered");

        Self {
            kind,
            index: index as u32,
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub(crate) const fn index(&self) -> usize {
        self.index as usize
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl fmt::Display for NamedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "<invalid>");
        }

        match self.kind {
            OptionKind::Flag => write!(f, "flag#{}", self.index),
            OptionKind::KeyValue => write!(f, "key-value#{}", self.index),
        }
    }
}
