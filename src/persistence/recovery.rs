//! Load recovery
//!
//! Two tiers: the registry codec absorbs per-record damage (unknown key, kind
//! mismatch, unreadable payload). Anything that escapes it, including I/O
//! failures, resets the whole registry so a bad file never blocks startup.

use crate::error::OptionsError;
use crate::registry::{LoadReport, OptionRegistry};
use std::path::Path;
use tracing::{debug, warn};

/// Result of loading persisted options into a registry
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing persisted yet; every option keeps its default
    Missing,
    /// Records were applied; the report lists per-record recoveries
    Loaded(LoadReport),
    /// The input was unusable and every option was reset to its default
    Reset(OptionsError),
}

impl LoadOutcome {
    pub fn is_reset(&self) -> bool {
        matches!(self, LoadOutcome::Reset(_))
    }

    pub fn report(&self) -> Option<&LoadReport> {
        match self {
            LoadOutcome::Loaded(report) => Some(report),
            _ => None,
        }
    }
}

pub fn load_bytes(registry: &OptionRegistry, bytes: &[u8]) -> LoadOutcome {
    match registry.decode_all(bytes) {
        Ok(report) => {
            if report.is_clean() {
                debug!("Loaded {} options", report.applied);
            } else {
                warn!(
                    "Loaded {} options, skipped {} ({} unknown, {} kind changes, {} reset)",
                    report.applied,
                    report.skipped(),
                    report.unknown_keys.len(),
                    report.kind_mismatches.len(),
                    report.decode_failures.len()
                );
            }
            LoadOutcome::Loaded(report)
        }
        Err(e) => reset(registry, e),
    }
}

pub fn load_file(registry: &OptionRegistry, path: &Path) -> LoadOutcome {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No options file at {:?}, keeping defaults", path);
            return LoadOutcome::Missing;
        }
        Err(e) => return reset(registry, e.into()),
    };

    debug!("Read {} bytes from {:?}", bytes.len(), path);
    load_bytes(registry, &bytes)
}

fn reset(registry: &OptionRegistry, error: OptionsError) -> LoadOutcome {
    warn!("🔄 Options unreadable ({}), falling back to defaults", error);
    registry.reset_all();
    LoadOutcome::Reset(error)
}
