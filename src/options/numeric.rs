//! Integer and float options with optional closed-interval clamping

use super::core::{float_eq, forward_game_option, typed_option_accessors, OptionCore};
use super::{kind_mismatch, wire, GameOption, OptionKind, OptionValue};
use crate::error::{DecodeError, OptionsResult};
use std::io::{self, Read, Write};

/// Clamp into `[min, max]`; either bound may be absent. Values past a bound
/// land exactly on it.
fn clamp<T: PartialOrd + Copy>(value: T, min: Option<T>, max: Option<T>) -> T {
    match (min, max) {
        (Some(min), _) if value < min => min,
        (_, Some(max)) if value > max => max,
        _ => value,
    }
}

/// Float clamping. NaN has no place in a range, so a ranged option rejects it
/// (`None`); an unbounded option stores it as given.
fn clamp_float(value: f32, min: Option<f32>, max: Option<f32>) -> Option<f32> {
    if value.is_nan() && (min.is_some() || max.is_some()) {
        return None;
    }
    Some(clamp(value, min, max))
}

/// Signed 32-bit option. Payload: 4 bytes, little-endian.
#[derive(Debug)]
pub struct IntOption {
    core: OptionCore<i32>,
    min: Option<i32>,
    max: Option<i32>,
}

impl IntOption {
    pub fn new(key: impl Into<String>, default: i32) -> Self {
        Self {
            core: OptionCore::new(key, default, |a, b| a == b),
            min: None,
            max: None,
        }
    }

    pub fn with_range(self, min: i32, max: i32) -> Self {
        self.with_min(min).with_max(max)
    }

    pub fn with_min(mut self, min: i32) -> Self {
        self.min = Some(min);
        self.reclamp();
        self
    }

    pub fn with_max(mut self, max: i32) -> Self {
        self.max = Some(max);
        self.reclamp();
        self
    }

    fn reclamp(&mut self) {
        let (min, max) = (self.min, self.max);
        self.core.constrain_in_place(|v| clamp(v, min, max));
    }

    pub fn min(&self) -> Option<i32> {
        self.min
    }

    pub fn max(&self) -> Option<i32> {
        self.max
    }

    /// Clamp and store. Returns whether the stored value changed.
    pub fn set_value(&self, value: i32) -> bool {
        self.core.replace(clamp(value, self.min, self.max))
    }

    typed_option_accessors!(i32);
}

impl GameOption for IntOption {
    forward_game_option!();

    fn kind(&self) -> OptionKind {
        OptionKind::Int
    }

    fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
        wire::write_i32(out, self.value())
    }

    fn decode(&self, input: &mut dyn Read) -> Result<(), DecodeError> {
        let value = wire::read_i32(input)?;
        self.set_value(value);
        Ok(())
    }

    fn snapshot(&self) -> OptionValue {
        OptionValue::Int(self.value())
    }

    fn apply(&self, value: OptionValue) -> OptionsResult<bool> {
        match value {
            OptionValue::Int(v) => Ok(self.set_value(v)),
            other => Err(kind_mismatch(self.key(), OptionKind::Int, &other)),
        }
    }
}

/// Single-precision option. Payload: 4-byte IEEE-754, little-endian.
#[derive(Debug)]
pub struct FloatOption {
    core: OptionCore<f32>,
    min: Option<f32>,
    max: Option<f32>,
}

impl FloatOption {
    pub fn new(key: impl Into<String>, default: f32) -> Self {
        Self {
            core: OptionCore::new(key, default, |a, b| float_eq(*a, *b)),
            min: None,
            max: None,
        }
    }

    pub fn with_range(self, min: f32, max: f32) -> Self {
        self.with_min(min).with_max(max)
    }

    pub fn with_min(mut self, min: f32) -> Self {
        self.min = Some(min);
        self.reclamp();
        self
    }

    pub fn with_max(mut self, max: f32) -> Self {
        self.max = Some(max);
        self.reclamp();
        self
    }

    fn reclamp(&mut self) {
        let (min, max) = (self.min, self.max);
        self.core
            .constrain_in_place(|v| clamp_float(v, min, max).or(min).or(max).unwrap_or(v));
    }

    pub fn min(&self) -> Option<f32> {
        self.min
    }

    pub fn max(&self) -> Option<f32> {
        self.max
    }

    /// Clamp and store. NaN leaves a ranged option unchanged.
    pub fn set_value(&self, value: f32) -> bool {
        match clamp_float(value, self.min, self.max) {
            Some(value) => self.core.replace(value),
            None => false,
        }
    }

    typed_option_accessors!(f32);
}

impl GameOption for FloatOption {
    forward_game_option!();

    fn kind(&self) -> OptionKind {
        OptionKind::Float
    }

    fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
        wire::write_f32(out, self.value())
    }

    fn decode(&self, input: &mut dyn Read) -> Result<(), DecodeError> {
        let value = wire::read_f32(input)?;
        if let Some(value) = clamp_float(value, self.min, self.max) {
            self.core.replace_exact(value);
        }
        Ok(())
    }

    fn snapshot(&self) -> OptionValue {
        OptionValue::Float(self.value())
    }

    fn apply(&self, value: OptionValue) -> OptionsResult<bool> {
        match value {
            OptionValue::Float(v) => Ok(self.set_value(v)),
            // Integers are accepted for convenience
            OptionValue::Int(v) => Ok(self.set_value(v as f32)),
            other => Err(kind_mismatch(self.key(), OptionKind::Float, &other)),
        }
    }
}
