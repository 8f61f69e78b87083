use super::core::{forward_game_option, typed_option_accessors, OptionCore};
use super::{kind_mismatch, wire, GameOption, OptionKind, OptionValue};
use crate::error::{DecodeError, OptionsResult};
use std::io::{self, Read, Write};

/// Keep the first `max_length` characters (not bytes)
fn truncate(value: String, max_length: Option<usize>) -> String {
    match max_length {
        Some(max) if value.chars().count() > max => value.chars().take(max).collect(),
        _ => value,
    }
}

/// Text option with an optional character limit. Payload: varint-prefixed UTF-8.
#[derive(Debug)]
pub struct StringOption {
    core: OptionCore<String>,
    max_length: Option<usize>,
}

impl StringOption {
    pub fn new(key: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            core: OptionCore::new(key, default.into(), |a, b| a == b),
            max_length: None,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self.core
            .constrain_in_place(|v| truncate(v, Some(max_length)));
        self
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn set_value(&self, value: impl Into<String>) -> bool {
        self.core.replace(truncate(value.into(), self.max_length))
    }

    typed_option_accessors!(String);
}

impl GameOption for StringOption {
    forward_game_option!();

    fn kind(&self) -> OptionKind {
        OptionKind::String
    }

    fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
        self.core.with_value(|v| wire::write_str(out, v))
    }

    fn decode(&self, input: &mut dyn Read) -> Result<(), DecodeError> {
        let value = wire::read_str(input)?;
        self.set_value(value);
        Ok(())
    }

    fn snapshot(&self) -> OptionValue {
        OptionValue::String(self.value())
    }

    fn apply(&self, value: OptionValue) -> OptionsResult<bool> {
        match value {
            OptionValue::String(v) => Ok(self.set_value(v)),
            other => Err(kind_mismatch(self.key(), OptionKind::String, &other)),
        }
    }
}
