//! Options over a fixed set of named values

use super::core::{forward_game_option, typed_option_accessors, OptionCore};
use super::{kind_mismatch, wire, GameOption, OptionKind, OptionValue};
use crate::error::{DecodeError, OptionsError, OptionsResult};
use std::fmt::Debug;
use std::io::{self, Read, Write};

/// A fieldless enum usable as an option value.
///
/// Values are stored on disk by their numeric representation, so existing
/// discriminants must stay stable across releases. Implement it with
/// [`option_enum!`](crate::option_enum).
pub trait OptionEnum: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Every variant, in declaration order
    fn variants() -> &'static [Self];

    fn to_raw(self) -> i32;

    fn name(self) -> &'static str;

    fn from_raw(raw: i32) -> Option<Self> {
        Self::variants().iter().copied().find(|v| v.to_raw() == raw)
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name))
    }
}

/// Declare a fieldless enum with explicit discriminants and implement
/// [`OptionEnum`] for it.
///
/// ```
/// xreal_options::option_enum! {
///     pub enum Quality {
///         Low = 0,
///         High = 2,
///     }
/// }
/// # use xreal_options::options::OptionEnum;
/// assert_eq!(Quality::from_raw(2), Some(Quality::High));
/// ```
#[macro_export]
macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $raw:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $raw),+
        }

        impl $crate::options::OptionEnum for $name {
            fn variants() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn to_raw(self) -> i32 {
                self as i32
            }

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }
    };
}

/// Enum option. Payload: the variant's numeric value as 4 bytes LE.
///
/// Decoding a number that matches no variant falls back to the default.
#[derive(Debug)]
pub struct EnumOption<E: OptionEnum> {
    core: OptionCore<E>,
}

impl<E: OptionEnum> EnumOption<E> {
    pub fn new(key: impl Into<String>, default: E) -> Self {
        Self {
            core: OptionCore::new(key, default, |a, b| a == b),
        }
    }

    pub fn set_value(&self, value: E) -> bool {
        self.core.replace(value)
    }

    pub fn variants(&self) -> &'static [E] {
        E::variants()
    }

    typed_option_accessors!(E);
}

impl<E: OptionEnum> GameOption for EnumOption<E> {
    forward_game_option!();

    fn kind(&self) -> OptionKind {
        OptionKind::Enum
    }

    fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
        wire::write_i32(out, self.value().to_raw())
    }

    fn decode(&self, input: &mut dyn Read) -> Result<(), DecodeError> {
        let raw = wire::read_i32(input)?;
        let value = E::from_raw(raw).unwrap_or(*self.default_value());
        self.set_value(value);
        Ok(())
    }

    fn snapshot(&self) -> OptionValue {
        OptionValue::Enum(self.value().to_raw())
    }

    fn apply(&self, value: OptionValue) -> OptionsResult<bool> {
        let resolved = match &value {
            OptionValue::Enum(raw) | OptionValue::Int(raw) => E::from_raw(*raw),
            OptionValue::String(name) => E::from_name(name),
            _ => return Err(kind_mismatch(self.key(), OptionKind::Enum, &value)),
        };

        match resolved {
            Some(v) => Ok(self.set_value(v)),
            None => Err(OptionsError::InvalidValue {
                key: self.key().to_string(),
                reason: format!(
                    "expected one of {:?}",
                    E::variants().iter().map(|v| v.name()).collect::<Vec<_>>()
                ),
            }),
        }
    }
}
