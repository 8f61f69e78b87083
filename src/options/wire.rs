//! Primitive encodings shared by every option kind and the registry codec.
//!
//! All fixed-width values are little-endian. Strings are a 7-bit varint byte
//! length followed by UTF-8 bytes.

use crate::error::DecodeError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Write an unsigned LEB128 varint (7 payload bits per byte, high bit = more)
pub fn write_varint(out: &mut dyn Write, mut value: u32) -> io::Result<()> {
    while value >= 0x80 {
        out.write_u8((value as u8 & 0x7F) | 0x80)?;
        value >>= 7;
    }
    out.write_u8(value as u8)
}

pub fn read_varint(input: &mut dyn Read) -> Result<u32, DecodeError> {
    let mut result = 0u32;
    let mut shift = 0u32;
    loop {
        let byte = input.read_u8()?;
        // Fifth byte may only carry the top four bits of a u32
        if shift == 28 && byte & 0xF0 != 0 {
            return Err(DecodeError::VarintOverflow);
        }
        result |= u32::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

pub fn write_str(out: &mut dyn Write, value: &str) -> io::Result<()> {
    let len = u32::try_from(value.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string too long to encode"))?;
    write_varint(out, len)?;
    out.write_all(value.as_bytes())
}

pub fn read_str(input: &mut dyn Read) -> Result<String, DecodeError> {
    let len = read_varint(input)? as usize;
    // Never trust the prefix for an up-front allocation
    let mut bytes = Vec::with_capacity(len.min(4096));
    (&mut *input).take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(DecodeError::UnexpectedEof);
    }
    Ok(String::from_utf8(bytes)?)
}

pub fn write_i32(out: &mut dyn Write, value: i32) -> io::Result<()> {
    out.write_i32::<LittleEndian>(value)
}

pub fn read_i32(input: &mut dyn Read) -> Result<i32, DecodeError> {
    Ok(input.read_i32::<LittleEndian>()?)
}

pub fn write_f32(out: &mut dyn Write, value: f32) -> io::Result<()> {
    out.write_f32::<LittleEndian>(value)
}

pub fn read_f32(input: &mut dyn Read) -> Result<f32, DecodeError> {
    Ok(input.read_f32::<LittleEndian>()?)
}

pub fn write_bool(out: &mut dyn Write, value: bool) -> io::Result<()> {
    out.write_u8(u8::from(value))
}

pub fn read_bool(input: &mut dyn Read) -> Result<bool, DecodeError> {
    match input.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(DecodeError::InvalidBool(other)),
    }
}

/// Write a length or count prefix as a little-endian i32
pub fn write_len(out: &mut dyn Write, len: usize) -> io::Result<()> {
    let len = i32::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length does not fit in i32"))?;
    write_i32(out, len)
}

/// Read a non-negative i32 length or count prefix
pub fn read_len(input: &mut dyn Read) -> Result<usize, DecodeError> {
    let raw = read_i32(input)?;
    usize::try_from(raw).map_err(|_| DecodeError::NegativeLength(raw))
}
