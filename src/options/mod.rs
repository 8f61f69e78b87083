//! Typed options
//!
//! Every option is a named value of one [`OptionKind`] with a default,
//! kind-specific constraints, presentation flags and change notification.
//! Options are shared as `Arc`s: the owning code keeps the concrete type
//! (`Arc<IntOption>`), the registry sees them as `Arc<dyn GameOption>`.

pub mod core;
pub mod wire;

mod boolean;
mod color;
mod enumeration;
mod numeric;
mod string;
mod vector;

pub use self::boolean::BoolOption;
pub use self::color::{Color, ColorOption};
pub use self::core::{float_eq, OptionCore, OPTION_DEBOUNCE_DELAY};
pub use self::enumeration::{EnumOption, OptionEnum};
pub use self::numeric::{FloatOption, IntOption};
pub use self::string::StringOption;
pub use self::vector::Vector2Option;

use crate::error::{DecodeError, OptionsError, OptionsResult};
use crate::event::SubscriptionId;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// Concrete kind of an option.
///
/// The tags written to disk are part of the file format; renaming one makes
/// older files treat that option as an unknown kind and keep its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    Bool,
    Int,
    Float,
    String,
    Enum,
    Color,
    Vector2,
}

impl OptionKind {
    pub const ALL: [OptionKind; 7] = [
        OptionKind::Bool,
        OptionKind::Int,
        OptionKind::Float,
        OptionKind::String,
        OptionKind::Enum,
        OptionKind::Color,
        OptionKind::Vector2,
    ];

    /// Stable on-disk tag
    pub fn tag(self) -> &'static str {
        match self {
            OptionKind::Bool => "BoolOption",
            OptionKind::Int => "IntOption",
            OptionKind::Float => "FloatOption",
            OptionKind::String => "StringOption",
            OptionKind::Enum => "EnumOption",
            OptionKind::Color => "ColorOption",
            OptionKind::Vector2 => "Vector2Option",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Kind-erased copy of an option's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum OptionValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    /// Underlying numeric value of the enum variant
    Enum(i32),
    Color(Color),
    Vector2(Vec2),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::Int(_) => OptionKind::Int,
            OptionValue::Float(_) => OptionKind::Float,
            OptionValue::String(_) => OptionKind::String,
            OptionValue::Enum(_) => OptionKind::Enum,
            OptionValue::Color(_) => OptionKind::Color,
            OptionValue::Vector2(_) => OptionKind::Vector2,
        }
    }

    /// Parse user text as a value of `kind`.
    ///
    /// Colors and vectors are comma separated (`r,g,b,a` / `x,y`). Enum text
    /// that is not a number is kept as a string so the option can resolve it
    /// by variant name.
    pub fn parse(kind: OptionKind, text: &str) -> Result<OptionValue, String> {
        let text = text.trim();
        let floats = |expected: usize| -> Result<Vec<f32>, String> {
            let parts = text
                .split(',')
                .map(|part| part.trim().parse::<f32>().map_err(|e| e.to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            if parts.len() != expected {
                return Err(format!("expected {} comma separated numbers", expected));
            }
            Ok(parts)
        };

        match kind {
            OptionKind::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(OptionValue::Bool(true)),
                "false" | "off" | "no" | "0" => Ok(OptionValue::Bool(false)),
                other => Err(format!("not a boolean: {}", other)),
            },
            OptionKind::Int => text
                .parse()
                .map(OptionValue::Int)
                .map_err(|e| e.to_string()),
            OptionKind::Float => text
                .parse()
                .map(OptionValue::Float)
                .map_err(|e| e.to_string()),
            OptionKind::String => Ok(OptionValue::String(text.to_string())),
            OptionKind::Enum => Ok(text
                .parse()
                .map(OptionValue::Enum)
                .unwrap_or_else(|_| OptionValue::String(text.to_string()))),
            OptionKind::Color => {
                let c = floats(4)?;
                Ok(OptionValue::Color(Color::new(c[0], c[1], c[2], c[3])))
            }
            OptionKind::Vector2 => {
                let v = floats(2)?;
                Ok(OptionValue::Vector2(Vec2::new(v[0], v[1])))
            }
        }
    }
}

/// Kind-erased view of an option, as held by the registry.
///
/// `encode` writes only the value payload; the registry codec frames it with
/// the key, kind tag and payload length. `decode` either commits the whole
/// decoded value through the normal mutation path or leaves the option
/// untouched and returns an error.
pub trait GameOption: Send + Sync + 'static {
    fn key(&self) -> &str;

    fn kind(&self) -> OptionKind;

    fn kind_tag(&self) -> &'static str {
        self.kind().tag()
    }

    fn encode(&self, out: &mut dyn Write) -> io::Result<()>;

    fn decode(&self, input: &mut dyn Read) -> Result<(), DecodeError>;

    /// Set the value back to the default through the normal mutation path
    fn reset(&self);

    fn is_default(&self) -> bool;

    fn snapshot(&self) -> OptionValue;

    /// Set from a kind-erased value. Returns whether the value changed.
    fn apply(&self, value: OptionValue) -> OptionsResult<bool>;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&self, enabled: bool) -> bool;

    fn is_visible(&self) -> bool;

    fn set_visible(&self, visible: bool) -> bool;

    /// Subscribe to value changes without caring about the value type
    fn on_change(&self, handler: Box<dyn Fn() + Send + Sync>) -> SubscriptionId;

    fn remove_change_handler(&self, id: SubscriptionId) -> bool;

    /// Subscribe to the option's own debounced hook
    fn on_debounced(&self, handler: Box<dyn Fn() + Send + Sync>) -> SubscriptionId;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl fmt::Debug for dyn GameOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameOption")
            .field("key", &self.key())
            .field("kind", &self.kind())
            .field("value", &self.snapshot())
            .finish()
    }
}

pub(crate) fn kind_mismatch(key: &str, expected: OptionKind, found: &OptionValue) -> OptionsError {
    OptionsError::KindMismatch {
        key: key.to_string(),
        expected: expected.tag(),
        found: found.kind().tag(),
    }
}
