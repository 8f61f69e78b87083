use super::core::{float_eq, forward_game_option, typed_option_accessors, OptionCore};
use super::{kind_mismatch, wire, GameOption, OptionKind, OptionValue};
use crate::error::{DecodeError, OptionsResult};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

/// Linear RGBA color with independent float channels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Channel-wise comparison with the same tolerance as float options
    pub fn same_as(&self, other: &Color) -> bool {
        float_eq(self.r, other.r)
            && float_eq(self.g, other.g)
            && float_eq(self.b, other.b)
            && float_eq(self.a, other.a)
    }
}

/// Color option. Payload: r, g, b, a as 4-byte floats.
#[derive(Debug)]
pub struct ColorOption {
    core: OptionCore<Color>,
}

impl ColorOption {
    pub fn new(key: impl Into<String>, default: Color) -> Self {
        Self {
            core: OptionCore::new(key, default, Color::same_as),
        }
    }

    pub fn set_value(&self, value: Color) -> bool {
        self.core.replace(value)
    }

    typed_option_accessors!(Color);
}

impl GameOption for ColorOption {
    forward_game_option!();

    fn kind(&self) -> OptionKind {
        OptionKind::Color
    }

    fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
        // One snapshot so the four channels always belong together
        let color = self.value();
        wire::write_f32(out, color.r)?;
        wire::write_f32(out, color.g)?;
        wire::write_f32(out, color.b)?;
        wire::write_f32(out, color.a)
    }

    fn decode(&self, input: &mut dyn Read) -> Result<(), DecodeError> {
        let r = wire::read_f32(input)?;
        let g = wire::read_f32(input)?;
        let b = wire::read_f32(input)?;
        let a = wire::read_f32(input)?;
        self.core.replace_exact(Color::new(r, g, b, a));
        Ok(())
    }

    fn snapshot(&self) -> OptionValue {
        OptionValue::Color(self.value())
    }

    fn apply(&self, value: OptionValue) -> OptionsResult<bool> {
        match value {
            OptionValue::Color(v) => Ok(self.set_value(v)),
            other => Err(kind_mismatch(self.key(), OptionKind::Color, &other)),
        }
    }
}
