//! XREAL Virtual Desktop option store
//!
//! Typed, validated options that persist across restarts in a compact binary
//! file. Files written by older or newer builds load without error: options
//! the file does not know keep their defaults, records the build does not know
//! are skipped, and a damaged file falls back to defaults instead of blocking
//! startup.
//!
//! ```no_run
//! use std::time::Duration;
//! use xreal_options::{DesktopOptions, PersistenceManager};
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = DesktopOptions::new()?;
//! let manager = PersistenceManager::new(
//!     "/tmp/xreal/options.dat",
//!     options.registry().clone(),
//!     Duration::from_secs(1),
//! );
//!
//! options.brightness.set_value(6);
//! manager.flush()?;
//! # Ok(())
//! # }
//! ```

pub mod debounce;
pub mod error;
pub mod event;
pub mod options;
pub mod persistence;
pub mod registry;
pub mod schema;

pub use debounce::{DebounceTrigger, Debouncer};
pub use error::{DecodeError, OptionsError, OptionsResult};
pub use event::{Event, SubscriptionId};
pub use options::{
    BoolOption, Color, ColorOption, EnumOption, FloatOption, GameOption, IntOption, OptionEnum,
    OptionKind, OptionValue, StringOption, Vector2Option,
};
pub use persistence::{LoadOutcome, PersistenceConfig, PersistenceManager};
pub use registry::{LoadReport, OptionEntry, OptionRegistry, RawRecord, RegistryBuilder};
pub use schema::DesktopOptions;
