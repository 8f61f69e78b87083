use super::core::{forward_game_option, typed_option_accessors, OptionCore};
use super::{kind_mismatch, wire, GameOption, OptionKind, OptionValue};
use crate::error::{DecodeError, OptionsResult};
use std::io::{self, Read, Write};

/// On/off option. Payload: one byte, 0 or 1.
#[derive(Debug)]
pub struct BoolOption {
    core: OptionCore<bool>,
}

impl BoolOption {
    pub fn new(key: impl Into<String>, default: bool) -> Self {
        Self {
            core: OptionCore::new(key, default, |a, b| a == b),
        }
    }

    pub fn set_value(&self, value: bool) -> bool {
        self.core.replace(value)
    }

    /// Flip the value, returning the new one
    pub fn toggle(&self) -> bool {
        let next = !self.value();
        self.set_value(next);
        next
    }

    typed_option_accessors!(bool);
}

impl GameOption for BoolOption {
    forward_game_option!();

    fn kind(&self) -> OptionKind {
        OptionKind::Bool
    }

    fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
        wire::write_bool(out, self.value())
    }

    fn decode(&self, input: &mut dyn Read) -> Result<(), DecodeError> {
        let value = wire::read_bool(input)?;
        self.set_value(value);
        Ok(())
    }

    fn snapshot(&self) -> OptionValue {
        OptionValue::Bool(self.value())
    }

    fn apply(&self, value: OptionValue) -> OptionsResult<bool> {
        match value {
            OptionValue::Bool(v) => Ok(self.set_value(v)),
            other => Err(kind_mismatch(self.key(), OptionKind::Bool, &other)),
        }
    }
}
