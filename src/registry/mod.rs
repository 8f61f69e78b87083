//! The ordered, fixed set of options that persist together.
//!
//! A registry is assembled once through [`RegistryBuilder`] and never grows
//! afterwards; its enumeration order is the order records are written in.

mod codec;

pub use codec::{read_raw_records, LoadReport, RawRecord};

use crate::error::{OptionsError, OptionsResult};
use crate::options::{GameOption, OptionValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Collects options before the registry is sealed
#[derive(Default)]
pub struct RegistryBuilder {
    options: Vec<Arc<dyn GameOption>>,
    index: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option and hand back a typed, shared handle to it
    pub fn register<O: GameOption>(&mut self, option: O) -> OptionsResult<Arc<O>> {
        let option = Arc::new(option);
        self.register_shared(Arc::clone(&option) as Arc<dyn GameOption>)?;
        Ok(option)
    }

    /// Add an option that is already shared elsewhere
    pub fn register_shared(&mut self, option: Arc<dyn GameOption>) -> OptionsResult<()> {
        let key = option.key().to_string();
        if self.index.contains_key(&key) {
            return Err(OptionsError::DuplicateKey(key));
        }
        self.index.insert(key, self.options.len());
        self.options.push(option);
        Ok(())
    }

    pub fn build(self) -> OptionRegistry {
        debug!("Option registry sealed with {} options", self.options.len());
        OptionRegistry {
            options: self.options,
            index: self.index,
        }
    }
}

/// Serializable view of one option, as produced by [`OptionRegistry::snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub key: String,
    pub value: OptionValue,
    pub is_default: bool,
}

pub struct OptionRegistry {
    options: Vec<Arc<dyn GameOption>>,
    index: HashMap<String, usize>,
}

impl OptionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn GameOption>> {
        self.index.get(key).map(|&i| &self.options[i])
    }

    /// Typed handle to an option, if it exists and is an `O`
    pub fn get_as<O: GameOption>(&self, key: &str) -> Option<Arc<O>> {
        let option = Arc::clone(self.get(key)?);
        option.into_any().downcast::<O>().ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Options in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn GameOption>> {
        self.options.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|option| option.key())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn snapshot(&self) -> Vec<OptionEntry> {
        self.options
            .iter()
            .map(|option| OptionEntry {
                key: option.key().to_string(),
                value: option.snapshot(),
                is_default: option.is_default(),
            })
            .collect()
    }

    /// Write a kind-erased value into the named option
    pub fn set_from_value(&self, key: &str, value: OptionValue) -> OptionsResult<bool> {
        let option = self
            .get(key)
            .ok_or_else(|| OptionsError::UnknownKey(key.to_string()))?;
        option.apply(value)
    }

    /// Parse `text` as the named option's kind and write it
    pub fn set_from_text(&self, key: &str, text: &str) -> OptionsResult<bool> {
        let option = self
            .get(key)
            .ok_or_else(|| OptionsError::UnknownKey(key.to_string()))?;
        let value = OptionValue::parse(option.kind(), text).map_err(|reason| {
            OptionsError::InvalidValue {
                key: key.to_string(),
                reason,
            }
        })?;
        option.apply(value)
    }

    /// Reset every option through its normal mutation path
    pub fn reset_all(&self) {
        for option in &self.options {
            option.reset();
        }
        info!("Reset {} options to defaults", self.options.len());
    }

    pub fn encode_all(&self) -> OptionsResult<Vec<u8>> {
        let mut out = Vec::with_capacity(32 * self.options.len() + 4);
        self.encode_all_into(&mut out)?;
        Ok(out)
    }

    pub fn encode_all_into(&self, out: &mut dyn std::io::Write) -> OptionsResult<()> {
        codec::encode_into(self, out)?;
        Ok(())
    }

    /// Load encoded records into the live options.
    ///
    /// Per-record problems are absorbed and listed in the report. An error
    /// means the framing itself is broken; options decoded before the break
    /// keep their new values, so callers normally follow up with
    /// [`reset_all`](Self::reset_all) or use
    /// [`decode_all_from_bytes`](Self::decode_all_from_bytes).
    pub fn decode_all(&self, bytes: &[u8]) -> OptionsResult<LoadReport> {
        Ok(codec::decode_from(self, bytes)?)
    }

    /// [`decode_all`](Self::decode_all) with the whole-registry fallback:
    /// broken framing resets every option to its default.
    pub fn decode_all_from_bytes(&self, bytes: &[u8]) -> crate::persistence::LoadOutcome {
        crate::persistence::recovery::load_bytes(self, bytes)
    }
}

impl std::fmt::Debug for OptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.options.iter()).finish()
    }
}
