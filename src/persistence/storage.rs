//! File adapter for the registry codec
//!
//! Saves overwrite the target in place. A crash mid-write can leave a
//! truncated file; the next load detects the broken framing and falls back
//! to defaults.

use super::recovery::{self, LoadOutcome};
use crate::error::OptionsResult;
use crate::registry::OptionRegistry;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load `path` into `registry`. Never fails: a missing file keeps the
/// defaults, an unusable one resets the registry.
pub fn load_from_file(path: &Path, registry: &OptionRegistry) -> LoadOutcome {
    recovery::load_file(registry, path)
}

/// Encode `registry` and write it to `path`, creating parent directories
pub fn save_to_file(path: &Path, registry: &OptionRegistry) -> OptionsResult<()> {
    let bytes = registry.encode_all()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;

    debug!("Saved {} options ({} bytes) to {:?}", registry.len(), bytes.len(), path);
    Ok(())
}
