use super::core::{float_eq, forward_game_option, typed_option_accessors, OptionCore};
use super::{kind_mismatch, wire, GameOption, OptionKind, OptionValue};
use crate::error::{DecodeError, OptionsResult};
use glam::Vec2;
use std::io::{self, Read, Write};

fn vec2_eq(a: &Vec2, b: &Vec2) -> bool {
    float_eq(a.x, b.x) && float_eq(a.y, b.y)
}

/// 2D vector option. Payload: x, y as 4-byte floats.
#[derive(Debug)]
pub struct Vector2Option {
    core: OptionCore<Vec2>,
}

impl Vector2Option {
    pub fn new(key: impl Into<String>, default: Vec2) -> Self {
        Self {
            core: OptionCore::new(key, default, vec2_eq),
        }
    }

    pub fn set_value(&self, value: Vec2) -> bool {
        self.core.replace(value)
    }

    typed_option_accessors!(Vec2);
}

impl GameOption for Vector2Option {
    forward_game_option!();

    fn kind(&self) -> OptionKind {
        OptionKind::Vector2
    }

    fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
        let v = self.value();
        wire::write_f32(out, v.x)?;
        wire::write_f32(out, v.y)
    }

    fn decode(&self, input: &mut dyn Read) -> Result<(), DecodeError> {
        let x = wire::read_f32(input)?;
        let y = wire::read_f32(input)?;
        self.core.replace_exact(Vec2::new(x, y));
        Ok(())
    }

    fn snapshot(&self) -> OptionValue {
        OptionValue::Vector2(self.value())
    }

    fn apply(&self, value: OptionValue) -> OptionsResult<bool> {
        match value {
            OptionValue::Vector2(v) => Ok(self.set_value(v)),
            other => Err(kind_mismatch(self.key(), OptionKind::Vector2, &other)),
        }
    }
}
