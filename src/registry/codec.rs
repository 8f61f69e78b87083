//! Whole-registry binary codec
//!
//! ```text
//! File   := count:i32 Record{count}
//! Record := key:Str kind_tag:Str payload_length:i32 payload:byte[payload_length]
//! ```
//!
//! Loading tolerates schema drift record by record: unknown keys and kind
//! mismatches are skipped, a payload that fails to decode resets only its own
//! option. Anything that breaks the framing itself (bad count, truncated
//! header, payload running past the end of the input) is returned as an error
//! for the caller's whole-registry fallback.

use super::OptionRegistry;
use crate::error::DecodeError;
use crate::options::{wire, Color, OptionKind, OptionValue};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::io::{self, Cursor, Write};
use tracing::{debug, warn};

/// What happened to each record of a load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Records decoded into a live option
    pub applied: usize,
    /// Keys present in the input but not declared in the registry
    pub unknown_keys: Vec<String>,
    /// Keys whose stored kind tag differs from the declared kind
    pub kind_mismatches: Vec<String>,
    /// Keys whose payload failed to decode; those options were reset
    pub decode_failures: Vec<String>,
}

impl LoadReport {
    /// Records that did not end up in a live option
    pub fn skipped(&self) -> usize {
        self.unknown_keys.len() + self.kind_mismatches.len() + self.decode_failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped() == 0
    }
}

pub(crate) fn encode_into(registry: &OptionRegistry, out: &mut dyn Write) -> io::Result<()> {
    wire::write_len(out, registry.len())?;

    let mut payload = Vec::with_capacity(64);
    for option in registry.iter() {
        payload.clear();
        option.encode(&mut payload)?;

        wire::write_str(out, option.key())?;
        wire::write_str(out, option.kind_tag())?;
        wire::write_len(out, payload.len())?;
        out.write_all(&payload)?;
    }
    Ok(())
}

/// Record framing shared by the schema-aware and schema-less readers.
/// Yields `(key, kind_tag, payload)` and leaves the cursor past the payload.
fn read_record<'a>(
    cursor: &mut Cursor<&'a [u8]>,
) -> Result<(String, String, &'a [u8]), DecodeError> {
    let key = wire::read_str(cursor)?;
    let kind_tag = wire::read_str(cursor)?;
    let len = wire::read_len(cursor)?;

    let bytes: &'a [u8] = *cursor.get_ref();
    let start = (cursor.position() as usize).min(bytes.len());
    let available = bytes.len() - start;
    if len > available {
        return Err(DecodeError::RecordOverrun {
            needed: len,
            available,
        });
    }

    cursor.set_position((start + len) as u64);
    Ok((key, kind_tag, &bytes[start..start + len]))
}

pub(crate) fn decode_from(
    registry: &OptionRegistry,
    bytes: &[u8],
) -> Result<LoadReport, DecodeError> {
    let mut cursor = Cursor::new(bytes);
    let count = wire::read_len(&mut cursor)?;
    let mut report = LoadReport::default();

    for _ in 0..count {
        let (key, kind_tag, payload) = read_record(&mut cursor)?;

        let Some(option) = registry.get(&key) else {
            debug!("Skipping stored option {} no longer declared", key);
            report.unknown_keys.push(key);
            continue;
        };

        if option.kind_tag() != kind_tag {
            warn!(
                "Stored option {} is a {}, declared as {}; keeping default",
                key,
                kind_tag,
                option.kind_tag()
            );
            report.kind_mismatches.push(key);
            continue;
        }

        // Decode against the bounded payload so a short read can never
        // consume the next record's header
        let mut input = payload;
        match option.decode(&mut input) {
            Ok(()) => report.applied += 1,
            Err(e) => {
                warn!("Stored value of {} is unreadable ({}), resetting it", key, e);
                option.reset();
                report.decode_failures.push(key);
            }
        }
    }

    if (cursor.position() as usize) < bytes.len() {
        debug!(
            "Ignoring {} trailing bytes after {} records",
            bytes.len() - cursor.position() as usize,
            count
        );
    }

    Ok(report)
}

/// One record read without consulting any registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub key: String,
    pub kind_tag: String,
    pub payload: Vec<u8>,
}

impl RawRecord {
    pub fn kind(&self) -> Option<OptionKind> {
        OptionKind::from_tag(&self.kind_tag)
    }

    /// Best-effort interpretation of the payload according to its kind tag.
    /// Enum payloads come back as their raw numeric value.
    pub fn value(&self) -> Option<OptionValue> {
        let mut input = self.payload.as_slice();
        let value = match self.kind()? {
            OptionKind::Bool => OptionValue::Bool(wire::read_bool(&mut input).ok()?),
            OptionKind::Int => OptionValue::Int(wire::read_i32(&mut input).ok()?),
            OptionKind::Float => OptionValue::Float(wire::read_f32(&mut input).ok()?),
            OptionKind::String => OptionValue::String(wire::read_str(&mut input).ok()?),
            OptionKind::Enum => OptionValue::Enum(wire::read_i32(&mut input).ok()?),
            OptionKind::Color => {
                let mut c = [0.0f32; 4];
                for channel in &mut c {
                    *channel = wire::read_f32(&mut input).ok()?;
                }
                OptionValue::Color(Color::new(c[0], c[1], c[2], c[3]))
            }
            OptionKind::Vector2 => {
                let x = wire::read_f32(&mut input).ok()?;
                let y = wire::read_f32(&mut input).ok()?;
                OptionValue::Vector2(Vec2::new(x, y))
            }
        };
        Some(value)
    }
}

/// Parse the record framing of an encoded registry without a schema
pub fn read_raw_records(bytes: &[u8]) -> Result<Vec<RawRecord>, DecodeError> {
    let mut cursor = Cursor::new(bytes);
    let count = wire::read_len(&mut cursor)?;
    // Every record takes at least six bytes
    let mut records = Vec::with_capacity(count.min(bytes.len() / 6));

    for _ in 0..count {
        let (key, kind_tag, payload) = read_record(&mut cursor)?;
        records.push(RawRecord {
            key,
            kind_tag,
            payload: payload.to_vec(),
        });
    }
    Ok(records)
}
