//! Storage shared by every option kind.
//!
//! The current value sits behind a reader/writer lock so that a background
//! save always encodes a self-consistent snapshot, even for multi-channel
//! kinds, while the owning thread keeps mutating.

use crate::debounce::Debouncer;
use crate::event::Event;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Quiet period of each option's own debounced hook
pub const OPTION_DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Two floats are the same value if bit-identical or within machine epsilon
pub fn float_eq(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits() || (a - b).abs() <= f32::EPSILON
}

/// Typed value cell with default, presentation flags and change events
pub struct OptionCore<T> {
    key: String,
    default: T,
    value: RwLock<T>,
    equals: fn(&T, &T) -> bool,
    enabled: AtomicBool,
    visible: AtomicBool,
    value_changed: Event<T>,
    enabled_changed: Event<bool>,
    visible_changed: Event<bool>,
    debouncer: Debouncer,
}

impl<T: Clone + Send + Sync + 'static> OptionCore<T> {
    pub fn new(key: impl Into<String>, default: T, equals: fn(&T, &T) -> bool) -> Self {
        Self {
            key: key.into(),
            value: RwLock::new(default.clone()),
            default,
            equals,
            enabled: AtomicBool::new(true),
            visible: AtomicBool::new(true),
            value_changed: Event::new(),
            enabled_changed: Event::new(),
            visible_changed: Event::new(),
            debouncer: Debouncer::new(OPTION_DEBOUNCE_DELAY),
        }
    }

    /// Re-apply a constraint to the default and current value while the
    /// option is still being built. Raises no events.
    pub(crate) fn constrain_in_place(&mut self, constrain: impl Fn(T) -> T) {
        self.default = constrain(self.default.clone());
        *self.value.get_mut() = self.default.clone();
    }

    pub(crate) fn set_debounce_delay(&mut self, delay: Duration) {
        self.debouncer = Debouncer::new(delay);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Clone of the current value, taken under the read lock
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    pub fn is_default(&self) -> bool {
        (self.equals)(&self.value.read(), &self.default)
    }

    /// Store an already-constrained value. Notifies and retriggers the
    /// debounced hook only when the value actually changed.
    pub fn replace(&self, value: T) -> bool {
        {
            let mut current = self.value.write();
            if (self.equals)(&current, &value) {
                return false;
            }
            *current = value.clone();
        }

        self.value_changed.emit(&value);
        self.debouncer.trigger();
        true
    }

    /// Store `value` as given, even when it compares equal to the current
    /// one. Loaded values keep their exact bits; notification still only
    /// happens for a change under the option's equality.
    pub fn replace_exact(&self, value: T) -> bool {
        let changed = {
            let mut current = self.value.write();
            let changed = !(self.equals)(&current, &value);
            *current = value.clone();
            changed
        };

        if changed {
            self.value_changed.emit(&value);
            self.debouncer.trigger();
        }
        changed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) -> bool {
        let changed = self.enabled.swap(enabled, Ordering::AcqRel) != enabled;
        if changed {
            self.enabled_changed.emit(&enabled);
        }
        changed
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub fn set_visible(&self, visible: bool) -> bool {
        let changed = self.visible.swap(visible, Ordering::AcqRel) != visible;
        if changed {
            self.visible_changed.emit(&visible);
        }
        changed
    }

    pub fn value_changed(&self) -> &Event<T> {
        &self.value_changed
    }

    pub fn enabled_changed(&self) -> &Event<bool> {
        &self.enabled_changed
    }

    pub fn visible_changed(&self) -> &Event<bool> {
        &self.visible_changed
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}

impl<T: fmt::Debug> fmt::Debug for OptionCore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionCore")
            .field("key", &self.key)
            .field("value", &*self.value.read())
            .field("default", &self.default)
            .finish()
    }
}

/// Typed accessors every option kind exposes as inherent methods
macro_rules! typed_option_accessors {
    ($value:ty) => {
        pub fn key(&self) -> &str {
            self.core.key()
        }

        pub fn value(&self) -> $value {
            self.core.get()
        }

        pub fn default_value(&self) -> &$value {
            self.core.default_value()
        }

        pub fn reset(&self) -> bool {
            self.set_value(self.core.default_value().clone())
        }

        pub fn on_value_changed<F>(&self, handler: F) -> $crate::event::SubscriptionId
        where
            F: Fn(&$value) + Send + Sync + 'static,
        {
            self.core.value_changed().subscribe(handler)
        }

        pub fn on_enabled_changed<F>(&self, handler: F) -> $crate::event::SubscriptionId
        where
            F: Fn(&bool) + Send + Sync + 'static,
        {
            self.core.enabled_changed().subscribe(handler)
        }

        pub fn on_visible_changed<F>(&self, handler: F) -> $crate::event::SubscriptionId
        where
            F: Fn(&bool) + Send + Sync + 'static,
        {
            self.core.visible_changed().subscribe(handler)
        }

        /// Shorten or lengthen this option's debounced hook
        pub fn with_debounce(mut self, delay: ::std::time::Duration) -> Self {
            self.core.set_debounce_delay(delay);
            self
        }

        pub fn core(&self) -> &$crate::options::core::OptionCore<$value> {
            &self.core
        }
    };
}

/// `GameOption` items that only forward to the option's core
macro_rules! forward_game_option {
    () => {
        fn key(&self) -> &str {
            self.core.key()
        }

        fn reset(&self) {
            self.set_value(self.core.default_value().clone());
        }

        fn is_default(&self) -> bool {
            self.core.is_default()
        }

        fn is_enabled(&self) -> bool {
            self.core.is_enabled()
        }

        fn set_enabled(&self, enabled: bool) -> bool {
            self.core.set_enabled(enabled)
        }

        fn is_visible(&self) -> bool {
            self.core.is_visible()
        }

        fn set_visible(&self, visible: bool) -> bool {
            self.core.set_visible(visible)
        }

        fn on_change(
            &self,
            handler: Box<dyn Fn() + Send + Sync>,
        ) -> $crate::event::SubscriptionId {
            self.core.value_changed().subscribe(move |_| handler())
        }

        fn remove_change_handler(&self, id: $crate::event::SubscriptionId) -> bool {
            self.core.value_changed().unsubscribe(id)
        }

        fn on_debounced(
            &self,
            handler: Box<dyn Fn() + Send + Sync>,
        ) -> $crate::event::SubscriptionId {
            self.core.debouncer().on_fire(move || handler())
        }

        fn into_any(
            self: ::std::sync::Arc<Self>,
        ) -> ::std::sync::Arc<dyn ::std::any::Any + Send + Sync> {
            self
        }
    };
}

pub(crate) use forward_game_option;
pub(crate) use typed_option_accessors;

