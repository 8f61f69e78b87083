//! Integration tests for the XREAL option store
//!
//! Codec and schema-evolution behavior lives under `options`, file handling,
//! recovery and the debounced save pipeline under `persistence`.

pub mod options;
