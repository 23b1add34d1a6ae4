//! A small, single-pass command line parser.
//!
//! Options are registered with a [Parser] before parsing:
//! * [FlagOption]s like `-v` count how often they occur
//! * [KeyValueOption]s like `--jobs 4` take the following token as their value
//! * [PositionalOption]s take the remaining tokens in the order they were registered in
//!
//! Values are converted through [FromArgument], which can be implemented for custom types.
//! Tokens are matched against aliases exactly, anything that is not a registered alias is
//! a positional argument. The first error aborts the parse.

mod convert;
mod error;
pub mod help;
mod id;
mod option;
mod parser;
pub mod store;

pub use convert::{ConversionError, FromArgument, LIST_DELIMITER};
pub use error::{AliasGroup, AliasGroups, ParseError, RegistrationError, ALIAS_SEPARATOR};
pub use id::{NamedId, OptionKind};
pub use option::{
    FlagHandle, FlagOption, KeyValueHandle, KeyValueOption, PositionalHandle, PositionalOption,
};
pub use parser::{Parser, ValueHandle};
