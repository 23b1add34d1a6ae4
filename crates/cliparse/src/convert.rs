//! Conversion from raw argument strings to typed values

use std::{fmt, path::PathBuf};

/// Separates the elements of a list argument, like `1,2,3`
pub const LIST_DELIMITER: char = ',';

/// Signals that a string could not be converted to the requested type.
///
/// The dispatcher translates this into a [ParseError](crate::ParseError) that names
/// the option involved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionError {
    /// The string that failed to convert
    pub value: String,

    /// Human readable name of the target type
    pub type_name: String,
}

impl ConversionError {
    #[must_use]
    pub fn new<T: FromArgument>(value: &str) -> Self {
        Self {
            value: value.to_string(),
            type_name: T::type_name(),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no suitable conversion from '{}' to {}",
            self.value, self.type_name
        )
    }
}

impl std::error::Error for ConversionError {}

/// Types that can be parsed from a single command line token.
///
/// Implement this trait to use custom types as option values.
/// For types that already implement [FromStr](std::str::FromStr), the
/// [from_str_argument](crate::from_str_argument) macro does that for you.
pub trait FromArgument: Sized + Clone + 'static {
    /// Whether a key-value option of this type must be present on the command line.
    ///
    /// Only [Option] overrides this.
    const REQUIRED: bool = true;

    /// The name reported in conversion errors
    fn type_name() -> String;

    fn from_argument(argument: &str) -> Result<Self, ConversionError>;
}

/// Implements [FromArgument] using the types [FromStr](std::str::FromStr) implementation.
///
/// ```
/// # use cliparse::from_str_argument;
/// #[derive(Clone, Debug)]
/// struct Port(u16);
///
/// impl std::str::FromStr for Port {
///     type Err = std::num::ParseIntError;
///
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Port)
///     }
/// }
///
/// from_str_argument!(Port);
/// ```
#[macro_export]
macro_rules! from_str_argument {
    ($($name: ty),* $(,)?) => {
        $(
            impl $crate::FromArgument for $name {
                fn type_name() -> ::std::string::String {
                    ::std::string::String::from(::std::stringify!($name))
                }

                fn from_argument(
                    argument: &str,
                ) -> ::std::result::Result<Self, $crate::ConversionError> {
                    argument
                        .parse()
                        .map_err(|_| $crate::ConversionError::new::<Self>(argument))
                }
            }
        )*
    };
}

from_str_argument!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char);

/// Whether `argument` spells out an infinite value, like `inf` or `-Infinity`
fn is_infinity_literal(argument: &str) -> bool {
    let unsigned = argument.strip_prefix(['+', '-']).unwrap_or(argument);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Like [from_str_argument](crate::from_str_argument), except that values too large for the type are rejected.
/// [str::parse] rounds those to infinity.
macro_rules! impl_float {
    ($($name: ty),*) => {
        $(
            impl FromArgument for $name {
                fn type_name() -> String {
                    stringify!($name).to_string()
                }

                fn from_argument(argument: &str) -> Result<Self, ConversionError> {
                    match argument.parse::<$name>() {
                        Ok(value) if value.is_infinite() && !is_infinity_literal(argument) => {
                            Err(ConversionError::new::<Self>(argument))
                        },
                        Ok(value) => Ok(value),
                        Err(_) => Err(ConversionError::new::<Self>(argument)),
                    }
                }
            }
        )*
    };
}

impl_float!(f32, f64);

impl FromArgument for String {
    fn type_name() -> String {
        "String".to_string()
    }

    fn from_argument(argument: &str) -> Result<Self, ConversionError> {
        Ok(argument.to_string())
    }
}

impl FromArgument for PathBuf {
    fn type_name() -> String {
        "PathBuf".to_string()
    }

    fn from_argument(argument: &str) -> Result<Self, ConversionError> {
        Ok(PathBuf::from(argument))
    }
}

impl FromArgument for bool {
    fn type_name() -> String {
        "bool".to_string()
    }

    fn from_argument(argument: &str) -> Result<Self, ConversionError> {
        match argument {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ConversionError::new::<Self>(argument)),
        }
    }
}

/// Wrapping a type in [Option] makes the option optional.
///
/// The conversion itself is the one of the inner type.
impl<T: FromArgument> FromArgument for Option<T> {
    const REQUIRED: bool = false;

    fn type_name() -> String {
        T::type_name()
    }

    fn from_argument(argument: &str) -> Result<Self, ConversionError> {
        T::from_argument(argument).map(Some)
    }
}

/// A list of values separated by [LIST_DELIMITER].
///
/// The empty string is the empty list. Every other string contains at least one element,
/// so `1,` is the list `["1", ""]` and fails to convert unless the empty string is a valid element.
impl<T: FromArgument> FromArgument for Vec<T> {
    fn type_name() -> String {
        format!("Vec<{}>", T::type_name())
    }

    fn from_argument(argument: &str) -> Result<Self, ConversionError> {
        if argument.is_empty() {
            return Ok(vec![]);
        }

        argument
            .split(LIST_DELIMITER)
            .map(T::from_argument)
            .collect::<Result<Vec<T>, ConversionError>>()
            .map_err(|_| ConversionError::new::<Self>(argument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(i32::from_argument("10"), Ok(10));
        assert_eq!(i32::from_argument("0"), Ok(0));
        assert_eq!(i32::from_argument("-26"), Ok(-26));
        assert_eq!(u64::from_argument("18446744073709551615"), Ok(u64::MAX));
    }

    #[test]
    fn malformed_integers() {
        assert_eq!(
            i32::from_argument("abc"),
            Err(ConversionError {
                value: "abc".to_string(),
                type_name: "i32".to_string(),
            })
        );
        assert!(i32::from_argument("").is_err());
        assert!(i32::from_argument("1.5").is_err());
        assert!(u8::from_argument("-1").is_err());
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(u8::from_argument("256").is_err());
        assert!(i64::from_argument("9223372036854775808").is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(f64::from_argument("10"), Ok(10.));
        assert_eq!(f64::from_argument("0.0"), Ok(0.));
        assert_eq!(f64::from_argument("-26.43"), Ok(-26.43));
        assert!(f64::from_argument("pi").is_err());
    }

    #[test]
    fn float_overflow_is_an_error() {
        assert_eq!(
            f64::from_argument("1e400"),
            Err(ConversionError {
                value: "1e400".to_string(),
                type_name: "f64".to_string(),
            })
        );
        assert!(f64::from_argument("-1e400").is_err());
        assert!(f32::from_argument("1e40").is_err());
        assert_eq!(f32::from_argument("1e38"), Ok(1e38));
    }

    #[test]
    fn explicit_infinity() {
        assert_eq!(f64::from_argument("inf"), Ok(f64::INFINITY));
        assert_eq!(f64::from_argument("-infinity"), Ok(f64::NEG_INFINITY));
        assert_eq!(f32::from_argument("+Inf"), Ok(f32::INFINITY));
        assert!(f64::from_argument("NaN").unwrap().is_nan());
    }

    #[test]
    fn conversion_message() {
        assert_eq!(
            ConversionError::new::<u8>("300").to_string(),
            "no suitable conversion from '300' to u8"
        );
    }

    #[test]
    fn strings_are_taken_verbatim() {
        for value in ["10", "", "--some-value", "-f", "something-else"] {
            assert_eq!(String::from_argument(value).as_deref(), Ok(value));
        }
    }

    #[test]
    fn booleans() {
        assert_eq!(bool::from_argument("true"), Ok(true));
        assert_eq!(bool::from_argument("false"), Ok(false));
        assert!(bool::from_argument("yes").is_err());
    }

    #[test]
    fn optional_unwraps_inner_type() {
        assert_eq!(Option::<i32>::from_argument("3"), Ok(Some(3)));
        assert_eq!(Option::<i32>::type_name(), "i32");
        assert!(Option::<i32>::from_argument("x").is_err());

        assert!(i32::REQUIRED);
        assert!(!Option::<i32>::REQUIRED);
    }

    #[test]
    fn lists() {
        assert_eq!(Vec::<u32>::from_argument("1,2,3"), Ok(vec![1, 2, 3]));
        assert_eq!(Vec::<u32>::from_argument("7"), Ok(vec![7]));
        assert_eq!(Vec::<u32>::from_argument(""), Ok(vec![]));
        assert_eq!(
            Vec::<String>::from_argument(",a,"),
            Ok(vec![String::new(), "a".to_string(), String::new()])
        );
    }

    #[test]
    fn list_with_bad_element() {
        let error = Vec::<u32>::from_argument("1,,3").unwrap_err();
        assert_eq!(error.value, "1,,3");
        assert_eq!(error.type_name, "Vec<u32>");
    }
}
