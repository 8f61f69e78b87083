//! Option persistence for the XREAL virtual desktop
//!
//! [`PersistenceManager`] ties one registry to one file:
//! - loads synchronously on construction with two-tier recovery
//! - batches value changes through a debouncer into a single save
//! - serializes saves so overlapping writes never interleave
//! - flushes unsaved changes on drop when configured

pub mod config;
pub mod recovery;
pub mod storage;

pub use config::{AutoSaveConfig, PersistenceConfig, StorageConfig};
pub use recovery::LoadOutcome;
pub use storage::{load_from_file, save_to_file};

use crate::debounce::Debouncer;
use crate::error::OptionsResult;
use crate::event::SubscriptionId;
use crate::registry::OptionRegistry;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

struct Shared {
    path: PathBuf,
    registry: Arc<OptionRegistry>,
    save_lock: Mutex<()>,
}

impl Shared {
    fn save(&self) -> OptionsResult<()> {
        let _guard = self.save_lock.lock();
        save_to_file(&self.path, &self.registry)
    }
}

/// Keeps one registry in sync with one file
pub struct PersistenceManager {
    shared: Arc<Shared>,
    debouncer: Debouncer,
    /// Change listeners, in registry order
    listeners: Vec<SubscriptionId>,
    flush_on_drop: bool,
    load_outcome: LoadOutcome,
}

impl PersistenceManager {
    /// Load `path` into `registry` and save `save_delay` after changes settle
    pub fn new(path: impl Into<PathBuf>, registry: Arc<OptionRegistry>, save_delay: Duration) -> Self {
        Self::build(path.into(), registry, &AutoSaveConfig::default(), save_delay)
    }

    pub fn with_config(config: &PersistenceConfig, registry: Arc<OptionRegistry>) -> Self {
        Self::build(
            config.storage.file_path(),
            registry,
            &config.auto_save,
            config.auto_save.debounce_delay(),
        )
    }

    fn build(
        path: PathBuf,
        registry: Arc<OptionRegistry>,
        auto_save: &AutoSaveConfig,
        save_delay: Duration,
    ) -> Self {
        let load_outcome = load_from_file(&path, &registry);

        let shared = Arc::new(Shared {
            path,
            registry,
            save_lock: Mutex::new(()),
        });
        let debouncer = Debouncer::new(save_delay);

        // Subscribed after the load so restoring values never schedules a save
        let mut listeners = Vec::new();
        if auto_save.enabled {
            let saver = Arc::clone(&shared);
            debouncer.on_fire(move || {
                if let Err(e) = saver.save() {
                    error!("Failed to save options to {:?}: {}", saver.path, e);
                }
            });

            let trigger = debouncer.trigger_handle();
            listeners = shared
                .registry
                .iter()
                .map(|option| {
                    let trigger = trigger.clone();
                    option.on_change(Box::new(move || {
                        trigger.trigger();
                    }))
                })
                .collect();
        }

        info!(
            "Option persistence ready at {:?} (auto-save: {})",
            shared.path, auto_save.enabled
        );

        Self {
            shared,
            debouncer,
            listeners,
            flush_on_drop: auto_save.flush_on_drop,
            load_outcome,
        }
    }

    pub fn registry(&self) -> &Arc<OptionRegistry> {
        &self.shared.registry
    }

    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// How the initial load went
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn save_delay(&self) -> Duration {
        self.debouncer.delay()
    }

    /// Whether changes are waiting for the debounce window to close
    pub fn save_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Save now, replacing any pending debounced save
    pub fn flush(&self) -> OptionsResult<()> {
        if self.debouncer.cancel() {
            debug!("Flushing pending option changes");
        }
        self.shared.save()
    }

    /// Reset every option; the resulting changes are saved like any other
    pub fn reset_all(&self) {
        self.shared.registry.reset_all();
    }
}

impl Drop for PersistenceManager {
    fn drop(&mut self) {
        if self.debouncer.cancel() && self.flush_on_drop {
            if let Err(e) = self.shared.save() {
                error!("Failed to save options on shutdown: {}", e);
            }
        }

        for (option, id) in self.shared.registry.iter().zip(self.listeners.drain(..)) {
            option.remove_change_handler(id);
        }
    }
}

impl std::fmt::Debug for PersistenceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceManager")
            .field("path", &self.shared.path)
            .field("options", &self.shared.registry.len())
            .field("save_pending", &self.save_pending())
            .finish()
    }
}
